// SPDX-License-Identifier: MPL-2.0

//! A solver-agnostic Boolean/integer expression algebra.
//!
//! The constraint compiler builds [`BoolExpr`]/[`IntExpr`] trees as pure
//! data, independent of any particular optimizer backend — analogous to how
//! a version-range algebra represents version sets independently of any
//! particular comparison backend. A concrete [`crate::Optimizer`]
//! implementation (e.g. [`crate::Z3Optimizer`]) lowers these trees to its
//! own native representation.

/// A Boolean formula over named variables.
///
/// Variable names are `name@version` catalog encodings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoolExpr {
    /// The constant `true`.
    True,
    /// The constant `false`.
    False,
    /// A named Boolean variable, e.g. a package's `ref` or `ref0`.
    Var(String),
    /// Logical negation.
    Not(Box<BoolExpr>),
    /// Conjunction of zero or more sub-formulas (`true` when empty).
    And(Vec<BoolExpr>),
    /// Disjunction of zero or more sub-formulas (`false` when empty).
    Or(Vec<BoolExpr>),
    /// Material implication.
    Implies(Box<BoolExpr>, Box<BoolExpr>),
    /// Biconditional, used to pin `ref0` variables to the initial state.
    Iff(Box<BoolExpr>, Box<BoolExpr>),
    /// At most `k` of the given variables may be true simultaneously.
    ///
    /// Kept as its own cardinality primitive — rather than expanded into
    /// pairwise `¬(a ∧ b)` clauses — to stay linear in the number of
    /// variables, per the version-exclusivity requirement.
    AtMostK {
        /// The variables under the cardinality bound.
        vars: Vec<String>,
        /// The bound itself.
        k: u32,
    },
}

impl BoolExpr {
    /// Shorthand for [`BoolExpr::Var`].
    pub fn var(name: impl Into<String>) -> BoolExpr {
        BoolExpr::Var(name.into())
    }

    /// Shorthand for [`BoolExpr::Not`].
    pub fn not(self) -> BoolExpr {
        BoolExpr::Not(Box::new(self))
    }

    /// Shorthand for [`BoolExpr::Implies`].
    pub fn implies(self, then: BoolExpr) -> BoolExpr {
        BoolExpr::Implies(Box::new(self), Box::new(then))
    }

    /// Shorthand for [`BoolExpr::Iff`].
    pub fn iff(self, other: BoolExpr) -> BoolExpr {
        BoolExpr::Iff(Box::new(self), Box::new(other))
    }
}

/// An integer expression, used for the cost function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntExpr {
    /// A constant integer.
    Const(i64),
    /// A sum of sub-expressions.
    Sum(Vec<IntExpr>),
    /// `if cond { then } else { otherwise }`, used to make a package's cost
    /// contribution conditional on its install/uninstall transition.
    IfThenElse {
        /// The condition.
        cond: Box<BoolExpr>,
        /// Value when `cond` holds.
        then: Box<IntExpr>,
        /// Value when `cond` doesn't hold.
        otherwise: Box<IntExpr>,
    },
}

impl IntExpr {
    /// An `if`/`else` term, conditional on a [`BoolExpr`].
    pub fn if_then_else(cond: BoolExpr, then: IntExpr, otherwise: IntExpr) -> IntExpr {
        IntExpr::IfThenElse {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }
}
