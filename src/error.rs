// SPDX-License-Identifier: MPL-2.0

//! Error taxonomy.
//!
//! Per the error handling design, only [`ResolveError::BadReference`]
//! escapes [`resolve`](crate::resolve::resolve) as an `Err`; every other
//! non-fatal condition (unresolvable clause, UNSAT, optimizer timeout,
//! exhausted linearization retries) degrades to the empty plan and is only
//! observable through the `log` facade.

use thiserror::Error;

use crate::version::VersionParseError;

/// Errors that may occur while parsing a reference string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceParseError {
    /// The reference had no package name before its operator run.
    #[error("reference '{0}' has no package name")]
    EmptyName(String),

    /// The reference contained two separate runs of `{<, =, >}` characters,
    /// e.g. `a<1=2`. Per the resolved open question in the design notes,
    /// this is rejected rather than silently treated as unversioned.
    #[error("reference '{0}' has more than one operator cluster")]
    MultipleOperatorClusters(String),

    /// The reference ended in an operator with no version to bind it to,
    /// e.g. `a=`.
    #[error("reference '{0}' has an operator but no version")]
    DanglingOperator(String),

    /// The version suffix of the reference was non-empty but unparseable.
    #[error("reference '{reference}' has a malformed version: {source}")]
    BadVersion {
        /// The full reference string.
        reference: String,
        /// Why the version suffix failed to parse.
        #[source]
        source: VersionParseError,
    },

    /// An initial-state entry must be a fully-qualified `name=version`
    /// reference; this one had no version bound.
    #[error("initial-state entry '{0}' is not a fully-qualified name=version reference")]
    UnversionedInitialEntry(String),
}

/// Errors that may escape [`resolve`](crate::resolve::resolve).
///
/// This is the only error type visible at the crate's public boundary.
/// Infeasibility, timeouts, and exhausted cycle-escape retries are not
/// represented here — they produce `Ok(vec![])`, the empty plan.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A reference string anywhere in the repository, initial state, or
    /// constraints was malformed.
    #[error("malformed reference: {0}")]
    BadReference(#[from] ReferenceParseError),
}
