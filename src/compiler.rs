// SPDX-License-Identifier: MPL-2.0

//! The constraint compiler: lowers the catalog, initial state, and user
//! constraints into a conjunction of independent sub-formulas plus an
//! integer cost expression.
//!
//! Each `f_*` builder is a pure function of its inputs, independently
//! testable without constructing a real optimizer.

use std::collections::HashSet;

use crate::catalog::{Catalog, Constraint, ConstraintKind};
use crate::config::ResolverConfig;
use crate::expr::{BoolExpr, IntExpr};

/// The `ref0(P)` variable name for a given `ref(P)` encoding.
pub fn ref0_name(encoding: &str) -> String {
    format!("{encoding}_init")
}

/// `AtMost({ref(P_1),...,ref(P_k)}, 1)` for every package name, keeping the
/// formula linear in the bucket size via the `AtMostK` primitive.
pub fn f_versions(catalog: &Catalog) -> Vec<BoolExpr> {
    let mut by_name: Vec<(String, Vec<String>)> = Vec::new();
    for p in catalog.packages() {
        match by_name.iter_mut().find(|(name, _)| *name == p.name) {
            Some((_, vars)) => vars.push(p.encoding()),
            None => by_name.push((p.name.clone(), vec![p.encoding()])),
        }
    }
    by_name
        .into_iter()
        .filter(|(_, vars)| vars.len() > 1)
        .map(|(_, vars)| BoolExpr::AtMostK { vars, k: 1 })
        .collect()
}

/// `ref(P) ⇒ ¬(C_1 ∨ ... ∨ C_m)` for every package with non-empty
/// conflicts, dropping any conflict reference whose match set is empty.
pub fn f_conflicts(catalog: &Catalog) -> Vec<BoolExpr> {
    let mut out = Vec::new();
    for p in catalog.packages() {
        let disjuncts: Vec<BoolExpr> = p
            .conflicts
            .iter()
            .map(|c| catalog.match_encodings(c))
            .filter(|matches| !matches.is_empty())
            .map(|matches| BoolExpr::Or(matches.into_iter().map(BoolExpr::Var).collect()))
            .collect();
        if disjuncts.is_empty() {
            continue;
        }
        let conflict_present = BoolExpr::Or(disjuncts);
        out.push(BoolExpr::var(p.encoding()).implies(conflict_present.not()));
    }
    out
}

/// `ref(P) ⇒ (d_1 ∧ ... ∧ d_n)` for every package with non-empty `depends`.
///
/// Alternatives whose match set is empty are dropped from their clause; a
/// clause that becomes entirely empty is dropped from the conjunction
/// (`spec.md` §4.3: the dependency is unsatisfiable, so the package is
/// simply uninstallable rather than the solver choking on it — an
/// unconditional `false` antecedent would still be sound, but dropping the
/// clause keeps the formula exactly as small as the set of resolvable
/// alternatives).
pub fn f_depends(catalog: &Catalog) -> Vec<BoolExpr> {
    let mut out = Vec::new();
    for p in catalog.packages() {
        let clauses: Vec<BoolExpr> = p
            .depends
            .iter()
            .map(|clause| {
                let alts: Vec<String> = clause
                    .iter()
                    .flat_map(|alt| catalog.match_encodings(alt))
                    .collect::<HashSet<_>>()
                    .into_iter()
                    .collect();
                alts
            })
            .filter(|alts| !alts.is_empty())
            .map(|alts| BoolExpr::Or(alts.into_iter().map(BoolExpr::Var).collect()))
            .collect();
        if clauses.is_empty() {
            continue;
        }
        out.push(BoolExpr::var(p.encoding()).implies(BoolExpr::And(clauses)));
    }
    out
}

/// `M = ⋁{ref(Q) : Q ∈ match(r)}`; `INSTALL` asserts `M`, `UNINSTALL`
/// asserts `¬M`. A reference matching nothing compiles to `Or([])` =
/// `false`, so an `INSTALL` of a non-existent reference is unsatisfiable
/// and an `UNINSTALL` of one is trivially satisfied — exactly the
/// "unresolved references contribute no clauses" invariant.
pub fn f_goal(catalog: &Catalog, constraints: &[Constraint]) -> Vec<BoolExpr> {
    constraints
        .iter()
        .map(|c| {
            let m = BoolExpr::Or(
                catalog
                    .match_encodings(&c.reference)
                    .into_iter()
                    .map(BoolExpr::Var)
                    .collect(),
            );
            match c.kind {
                ConstraintKind::Install => m,
                ConstraintKind::Uninstall => m.not(),
            }
        })
        .collect()
}

/// `ref0(P) = (encoding(P) ∈ initial)` for every catalog entry.
pub fn f_init(catalog: &Catalog, initial: &HashSet<String>) -> Vec<BoolExpr> {
    catalog
        .packages()
        .iter()
        .map(|p| {
            let encoding = p.encoding();
            let truth = if initial.contains(&encoding) {
                BoolExpr::True
            } else {
                BoolExpr::False
            };
            BoolExpr::var(ref0_name(&encoding)).iff(truth)
        })
        .collect()
}

/// The piecewise cost sum from §4.3: `size(P)` for a newly-installed
/// package, `uninstall_weight` for a removed one, `0` for everything else.
pub fn f_cost(catalog: &Catalog, config: &ResolverConfig) -> IntExpr {
    let terms = catalog
        .packages()
        .iter()
        .map(|p| {
            let encoding = p.encoding();
            let ref_var = BoolExpr::var(encoding.clone());
            let ref0_var = BoolExpr::var(ref0_name(&encoding));
            let newly_installed = BoolExpr::And(vec![ref0_var.clone().not(), ref_var.clone()]);
            let removed = BoolExpr::And(vec![ref0_var, ref_var.not()]);
            IntExpr::if_then_else(
                newly_installed,
                IntExpr::Const(p.size as i64 * config.install_weight as i64),
                IntExpr::if_then_else(
                    removed,
                    IntExpr::Const(config.uninstall_weight as i64),
                    IntExpr::Const(0),
                ),
            )
        })
        .collect();
    IntExpr::Sum(terms)
}

/// The compiled formula: every clause plus the cost expression, ready to be
/// asserted against a concrete [`crate::Optimizer`].
#[derive(Debug, Clone)]
pub struct CompiledFormula {
    /// Every Boolean clause of `F_versions ∧ F_conflicts ∧ F_depends ∧
    /// F_goal ∧ F_init`.
    pub clauses: Vec<BoolExpr>,
    /// The cost expression to minimize.
    pub cost: IntExpr,
}

/// Compiles the catalog, initial state, and constraints into a
/// [`CompiledFormula`].
pub fn compile(
    catalog: &Catalog,
    initial: &HashSet<String>,
    constraints: &[Constraint],
    config: &ResolverConfig,
) -> CompiledFormula {
    let mut clauses = Vec::new();
    clauses.extend(f_versions(catalog));
    clauses.extend(f_conflicts(catalog));
    clauses.extend(f_depends(catalog));
    clauses.extend(f_goal(catalog, constraints));
    clauses.extend(f_init(catalog, initial));
    log::debug!(
        "compiled formula: {} clauses over {} catalog entries",
        clauses.len(),
        catalog.packages().len()
    );
    CompiledFormula {
        clauses,
        cost: f_cost(catalog, config),
    }
}
