// SPDX-License-Identifier: MPL-2.0

//! Parsing and matching of package references: `name`, `name=version`,
//! `name>=version`, etc.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::ReferenceParseError;
use crate::version::Version;

/// The relational operator of a versioned reference.
///
/// `op` is a non-empty subset of `{<, =, >}`: membership in the set means
/// that relation alone satisfies the reference, so `>=` (encoded as the set
/// `{>, =}`) matches a catalog version that is either strictly greater than
/// or equal to the reference's version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Op {
    less: bool,
    equal: bool,
    greater: bool,
}

impl Op {
    fn from_chars(chars: &str) -> Self {
        let mut op = Op::default();
        for c in chars.chars() {
            match c {
                '<' => op.less = true,
                '=' => op.equal = true,
                '>' => op.greater = true,
                _ => unreachable!("operator run must only contain '<', '=', '>'"),
            }
        }
        op
    }

    /// Does this operator admit a catalog version related to the reference
    /// version by `ordering` (`catalog_version.cmp(&reference_version)`)?
    fn admits(&self, ordering: Ordering) -> bool {
        match ordering {
            Ordering::Less => self.less,
            Ordering::Equal => self.equal,
            Ordering::Greater => self.greater,
        }
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.greater {
            f.write_str(">")?;
        }
        if self.less {
            f.write_str("<")?;
        }
        if self.equal {
            f.write_str("=")?;
        }
        Ok(())
    }
}

/// A `(name, op?, version?)` triple matching zero or more catalog entries.
///
/// When `op` and `version` are both absent, the reference matches every
/// version of `name`. Otherwise it matches every catalog entry `(name, v)`
/// such that `v` is related to `version` by any relation in `op`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference {
    /// The package name this reference is about.
    pub name: String,
    /// The relational operator, or `None` for an unversioned reference.
    pub op: Option<Op>,
    /// The version bound, or `None` for an unversioned reference.
    pub version: Option<Version>,
}

impl PackageReference {
    /// Does `candidate_version` satisfy this reference?
    pub fn matches_version(&self, candidate_version: &Version) -> bool {
        match (&self.op, &self.version) {
            (Some(op), Some(version)) => op.admits(candidate_version.cmp(version)),
            _ => true,
        }
    }

    /// The resolved encoding `name@version` this reference denotes when
    /// unversioned bounds aren't in play (used for fully-qualified
    /// `name=version` initial-state entries).
    pub fn resolved_encoding(&self) -> Option<String> {
        let version = self.version.as_ref()?;
        Some(format!("{}@{}", self.name, version))
    }
}

/// Splits a reference string into its name / operator / version parts per
/// the grammar in the data model: `name (op version)?`, where `op` is a
/// maximal run of characters from `{<, =, >}` and the name must not itself
/// contain one of those characters.
///
/// A second, separate run of operator characters later in the string (e.g.
/// `a<1=2`) is rejected as malformed rather than silently treated as an
/// unversioned reference.
fn split(s: &str) -> Result<(&str, Option<&str>, Option<&str>), ReferenceParseError> {
    let is_op_char = |c: char| matches!(c, '<' | '=' | '>');
    let Some(start) = s.find(is_op_char) else {
        return Ok((s, None, None));
    };
    let end = s[start..]
        .find(|c| !is_op_char(c))
        .map(|offset| start + offset)
        .unwrap_or(s.len());
    let name = &s[..start];
    let op = &s[start..end];
    let version = &s[end..];
    if version.contains(is_op_char) {
        return Err(ReferenceParseError::MultipleOperatorClusters(s.to_string()));
    }
    if version.is_empty() {
        return Err(ReferenceParseError::DanglingOperator(s.to_string()));
    }
    Ok((name, Some(op), Some(version)))
}

impl FromStr for PackageReference {
    type Err = ReferenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, op, version) = split(s)?;
        if name.is_empty() {
            return Err(ReferenceParseError::EmptyName(s.to_string()));
        }
        let (op, version) = match (op, version) {
            (Some(op), Some(version)) => {
                let version = version
                    .parse()
                    .map_err(|source| ReferenceParseError::BadVersion {
                        reference: s.to_string(),
                        source,
                    })?;
                (Some(Op::from_chars(op)), Some(version))
            }
            _ => (None, None),
        };
        Ok(PackageReference {
            name: name.to_string(),
            op,
            version,
        })
    }
}

impl Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let (Some(op), Some(version)) = (&self.op, &self.version) {
            write!(f, "{op}{version}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unversioned_reference_has_no_op_or_version() {
        let r: PackageReference = "foo".parse().unwrap();
        assert_eq!(r.name, "foo");
        assert!(r.op.is_none());
        assert!(r.version.is_none());
    }

    #[test]
    fn single_operator_parses() {
        let r: PackageReference = "foo>=2.0".parse().unwrap();
        assert_eq!(r.name, "foo");
        assert_eq!(r.version.unwrap().to_string(), "2.0");
        let v1: Version = "1.0".parse().unwrap();
        let v2: Version = "2.0".parse().unwrap();
        let v3: Version = "3.0".parse().unwrap();
        let r: PackageReference = "foo>=2.0".parse().unwrap();
        assert!(!r.matches_version(&v1));
        assert!(r.matches_version(&v2));
        assert!(r.matches_version(&v3));
    }

    #[test]
    fn equality_only_matches_equal() {
        let r: PackageReference = "foo=2.0".parse().unwrap();
        let v2: Version = "2.0".parse().unwrap();
        let v3: Version = "3.0".parse().unwrap();
        assert!(r.matches_version(&v2));
        assert!(!r.matches_version(&v3));
    }

    #[test]
    fn two_operator_clusters_are_rejected() {
        assert!(matches!(
            "foo<1=2".parse::<PackageReference>(),
            Err(ReferenceParseError::MultipleOperatorClusters(_))
        ));
    }

    #[test]
    fn bad_version_is_rejected() {
        assert!(matches!(
            "foo=".parse::<PackageReference>(),
            Err(ReferenceParseError::DanglingOperator(_))
        ));
        assert!(matches!(
            "foo=1..2".parse::<PackageReference>(),
            Err(ReferenceParseError::BadVersion { .. })
        ));
    }

    #[test]
    fn parse_then_display_round_trips() {
        for s in ["foo", "foo=1.2.3", "foo>=2.0", "foo<3", "foo<=4.5"] {
            let r: PackageReference = s.parse().unwrap();
            assert_eq!(r.to_string(), s);
        }
    }
}
