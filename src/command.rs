// SPDX-License-Identifier: MPL-2.0

//! The plan's output type: a single install/uninstall operation.

use std::fmt::{self, Display};

use crate::version::Version;

/// One step of a resolved transition plan.
///
/// [`Display`] renders exactly `+name=version` or `-name=version`, per the
/// external interface's output grammar; the internal `name@version` encoding
/// never leaks into this representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Install `name` at `version`.
    Install {
        /// Package name.
        name: String,
        /// Package version.
        version: Version,
    },
    /// Uninstall `name` at `version`.
    Uninstall {
        /// Package name.
        name: String,
        /// Package version.
        version: Version,
    },
}

impl Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Install { name, version } => write!(f, "+{name}={version}"),
            Command::Uninstall { name, version } => write!(f, "-{name}={version}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_install_and_uninstall() {
        let install = Command::Install {
            name: "a".into(),
            version: "1".parse().unwrap(),
        };
        let uninstall = Command::Uninstall {
            name: "a".into(),
            version: "1".parse().unwrap(),
        };
        assert_eq!(install.to_string(), "+a=1");
        assert_eq!(uninstall.to_string(), "-a=1");
    }
}
