// SPDX-License-Identifier: MPL-2.0

//! Caller-supplied resolver configuration.

use std::time::Duration;

/// Tunables for [`resolve`](crate::resolve::resolve).
///
/// The cost coefficients and solver timeout are policy, not universal
/// constants, so they are threaded through explicitly rather than baked in
/// as magic numbers. The [`Default`] impl reproduces the coefficients
/// exactly: installing is priced at `size(P)` and uninstalling at a flat
/// `1_000_000`, so the optimizer strongly prefers keeping existing installs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Multiplier applied to `size(P)` for a newly-installed package.
    pub install_weight: u64,
    /// Flat penalty charged per removed package.
    pub uninstall_weight: u64,
    /// Wall-clock bound on a single optimizer invocation.
    pub timeout: Duration,
    /// Maximum number of times the driver re-invokes the optimizer after
    /// the linearizer reports an unlinearizable cycle, before giving up and
    /// returning the empty plan.
    pub max_linearize_retries: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            install_weight: 1,
            uninstall_weight: 1_000_000,
            timeout: Duration::from_secs(30),
            max_linearize_retries: 8,
        }
    }
}
