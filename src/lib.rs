// SPDX-License-Identifier: MPL-2.0

//! `pkgsolve` is a package dependency resolver and minimum-cost transition
//! planner.
//!
//! Given a repository catalog of versioned packages, an initial installed
//! state, and a list of user constraints (install / uninstall requests),
//! [`resolve`] computes a sequence of `+name=version` / `-name=version`
//! operations that transforms the initial state into a final state which
//! satisfies every constraint, respects the repository's dependency and
//! conflict metadata, and minimizes a weighted cost metric (prefer keeping
//! existing installs and adding cheap new ones over removing anything).
//!
//! # Pipeline
//!
//! The crate is organized as the five stages described by its design:
//!
//! 1. [`version`] — a version algebra and the `(name, op, version)`
//!    reference grammar.
//! 2. [`catalog`] — a name-indexed, version-sorted view of the repository
//!    that answers "which catalog entries match this reference".
//! 3. [`compiler`] — lowers the catalog, initial state, and constraints into
//!    a solver-agnostic [`BoolExpr`](expr::BoolExpr) / [`IntExpr`](expr::IntExpr)
//!    formula plus a cost expression.
//! 4. [`optimizer`] — drives a concrete pseudo-boolean optimizer
//!    ([`Z3Optimizer`](optimizer::Z3Optimizer)) to a minimal-cost model.
//! 5. [`linearize`] — turns the delta between initial and chosen final state
//!    into an ordered, step-by-step valid install/uninstall script.
//!
//! [`resolve`] ties these together, retrying the optimizer when the
//! linearizer discovers a dependency cycle it cannot order.
//!
//! # Basic example
//!
//! ```
//! use pkgsolve::{resolve, PackageRecord, ResolverConfig};
//!
//! let repository = vec![
//!     PackageRecord {
//!         name: "A".into(),
//!         version: "1".into(),
//!         size: 10,
//!         depends: vec![vec!["B".into()]],
//!         conflicts: vec![],
//!     },
//!     PackageRecord {
//!         name: "B".into(),
//!         version: "1".into(),
//!         size: 5,
//!         depends: vec![],
//!         conflicts: vec![],
//!     },
//! ];
//!
//! let plan = resolve(&repository, &[], &["+A".to_string()], &ResolverConfig::default()).unwrap();
//! assert_eq!(
//!     plan.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
//!     vec!["+B=1".to_string(), "+A=1".to_string()]
//! );
//! ```

#![warn(missing_docs)]

mod catalog;
mod command;
mod compiler;
mod config;
mod error;
mod expr;
mod linearize;
mod optimizer;
mod reference;
mod resolve;
mod version;

pub use catalog::{Catalog, Constraint, ConstraintKind, PackageRecord, RepoPackage};
pub use command::Command;
pub use config::ResolverConfig;
pub use error::{ReferenceParseError, ResolveError};
pub use expr::{BoolExpr, IntExpr};
pub use optimizer::{CheckOutcome, Optimizer, Z3Optimizer};
pub use reference::{Op, PackageReference};
pub use resolve::resolve;
pub use version::{Version, VersionParseError};

pub mod internal {
    //! Implementation details exposed for integration tests and benches.
    //!
    //! Nothing in this module is part of the crate's semver contract.
    pub use crate::linearize::{LinearizeError, ResolutionContext};
}
