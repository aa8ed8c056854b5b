// SPDX-License-Identifier: MPL-2.0

//! The top-level entry point: wires the catalog, constraint compiler,
//! optimizer driver, and linearizer together, retrying the optimizer when
//! the linearizer reports an unlinearizable cycle.

use std::collections::HashSet;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use z3::Context;

use crate::catalog::{Catalog, Constraint, PackageRecord};
use crate::command::Command;
use crate::compiler;
use crate::config::ResolverConfig;
use crate::error::{ReferenceParseError, ResolveError};
use crate::expr::BoolExpr;
use crate::linearize::{LinearizeError, ResolutionContext};
use crate::optimizer::{CheckOutcome, Optimizer, Z3Optimizer};
use crate::reference::PackageReference;

/// Computes a minimum-cost sequence of `+name=version` / `-name=version`
/// commands transforming `initial_state` into a final state that satisfies
/// every constraint, respects the repository's dependency and conflict
/// metadata, and minimizes the weighted cost function in [`ResolverConfig`].
///
/// Returns the empty plan — never an `Err` — on infeasibility, optimizer
/// timeout, or exhausted linearization retries; only a malformed reference
/// string anywhere in the three inputs escapes as [`ResolveError`].
pub fn resolve(
    repository: &[PackageRecord],
    initial_state: &[String],
    constraints: &[String],
    config: &ResolverConfig,
) -> Result<Vec<Command>, ResolveError> {
    let catalog = Catalog::build(repository)?;
    let initial = parse_initial_state(initial_state)?;
    let constraints = constraints
        .iter()
        .map(|s| Constraint::from_str(s))
        .collect::<Result<Vec<_>, _>>()?;

    let compiled = compiler::compile(&catalog, &initial, &constraints, config);

    let z3_config = z3::Config::new();
    let ctx = Context::new(&z3_config);

    let mut pins: Vec<BoolExpr> = Vec::new();
    for attempt in 0..=config.max_linearize_retries {
        let opt = Z3Optimizer::new(&ctx);
        for clause in &compiled.clauses {
            opt.assert_bool(clause);
        }
        for pin in &pins {
            opt.assert_bool(pin);
        }
        opt.bind_int("cost", &compiled.cost);
        opt.minimize("cost");

        match opt.check(config.timeout) {
            CheckOutcome::Unsat => {
                log::warn!("resolver formula is unsatisfiable; returning the empty plan");
                return Ok(Vec::new());
            }
            CheckOutcome::Unknown => {
                log::warn!("optimizer did not decide within {:?}; returning the empty plan", config.timeout);
                return Ok(Vec::new());
            }
            CheckOutcome::Sat => {}
        }

        let mut model = FxHashMap::default();
        let mut to_remove = Vec::new();
        let mut to_install = Vec::new();
        for p in catalog.packages() {
            let encoding = p.encoding();
            let selected = opt.model_value(&encoding).unwrap_or(false);
            model.insert(encoding.clone(), selected);
            let was_initial = initial.contains(&encoding);
            if selected && !was_initial {
                to_install.push(encoding);
            } else if !selected && was_initial {
                to_remove.push(encoding);
            }
        }

        let linearizer = ResolutionContext::new(&catalog, &model, initial.iter().cloned());
        match linearizer.linearize(&to_remove, &to_install) {
            Ok(plan) => return Ok(plan),
            Err(LinearizeError::Cycle { encoding }) => {
                log::warn!(
                    "linearization cycle through {encoding} on attempt {attempt}; pinning and retrying"
                );
                let current = model.get(&encoding).copied().unwrap_or(false);
                let pin = if current {
                    BoolExpr::var(encoding).not()
                } else {
                    BoolExpr::var(encoding)
                };
                pins.push(pin);
            }
        }
    }

    log::warn!("linearize retries exhausted; returning the empty plan");
    Ok(Vec::new())
}

/// Parses the *Initial state* document: a sequence of fully-qualified
/// `name=version` reference strings.
fn parse_initial_state(initial_state: &[String]) -> Result<HashSet<String>, ReferenceParseError> {
    initial_state
        .iter()
        .map(|s| {
            let reference = PackageReference::from_str(s)?;
            reference
                .resolved_encoding()
                .ok_or_else(|| ReferenceParseError::UnversionedInitialEntry(s.clone()))
        })
        .collect()
}
