// SPDX-License-Identifier: MPL-2.0

//! The catalog index: a name-indexed, version-sorted view of the
//! repository, plus the `RepoPackage` and `Constraint` data model and the
//! reverse-dependency index the linearizer relies on.

use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};

use crate::error::ReferenceParseError;
use crate::reference::PackageReference;
use crate::version::Version;

/// The repository-entry shape of the external *Repository* input document:
/// one package record with its declared dependency/conflict reference
/// strings, before they are resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackageRecord {
    /// Package name.
    pub name: String,
    /// Package version, in the dotted format [`crate::Version`] parses.
    pub version: String,
    /// Installed byte cost.
    pub size: u64,
    /// CNF dependency clauses: outer list is conjunction, each inner list a
    /// disjunction of alternative reference strings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub depends: Vec<Vec<String>>,
    /// Reference strings whose matching installed version forbids this
    /// package.
    #[cfg_attr(feature = "serde", serde(default))]
    pub conflicts: Vec<String>,
}

/// A repository package with its references resolved into
/// [`PackageReference`] values, ready for catalog matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPackage {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: Version,
    /// Installed byte cost, used by the install side of the cost function.
    pub size: u64,
    /// CNF dependency clauses: outer is conjunction, inner is disjunction of
    /// alternatives.
    pub depends: Vec<Vec<PackageReference>>,
    /// References whose matching installed version conflicts with this
    /// package.
    pub conflicts: Vec<PackageReference>,
}

impl RepoPackage {
    /// The canonical `name@version` identity string for this entry, used as
    /// both the `ref` Boolean variable name and the linearizer's command
    /// operand (after replacing `@` with `=` on emission).
    pub fn encoding(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    fn from_record(record: &PackageRecord) -> Result<Self, ReferenceParseError> {
        let version = record
            .version
            .parse()
            .map_err(|source| ReferenceParseError::BadVersion {
                reference: format!("{}@{}", record.name, record.version),
                source,
            })?;
        let depends = record
            .depends
            .iter()
            .map(|clause| {
                clause
                    .iter()
                    .map(|r| PackageReference::from_str(r))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let conflicts = record
            .conflicts
            .iter()
            .map(|r| PackageReference::from_str(r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RepoPackage {
            name: record.name.clone(),
            version,
            size: record.size,
            depends,
            conflicts,
        })
    }
}

/// A user constraint: a request to install or uninstall packages matching a
/// reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Whether this is an install or uninstall request.
    pub kind: ConstraintKind,
    /// The reference the constraint is about.
    pub reference: PackageReference,
}

/// The tag of a [`Constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// At least one catalog entry matching the reference must be installed.
    Install,
    /// No catalog entry matching the reference may be installed.
    Uninstall,
}

impl FromStr for Constraint {
    type Err = ReferenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = match s.split_at(1.min(s.len())) {
            ("+", rest) => (ConstraintKind::Install, rest),
            ("-", rest) => (ConstraintKind::Uninstall, rest),
            _ => (ConstraintKind::Install, s),
        };
        Ok(Constraint {
            kind,
            reference: rest.parse()?,
        })
    }
}

/// Name-indexed, version-sorted view of the repository.
///
/// Construction resolves every reference appearing in `depends` and
/// `conflicts` against the catalog itself, and builds the reverse-dependency
/// index the linearizer needs, in one pass.
#[derive(Debug, Clone)]
pub struct Catalog {
    packages: Vec<RepoPackage>,
    by_name: IndexMap<String, Vec<usize>>,
    by_encoding: IndexMap<String, usize>,
    /// `encoding -> set of encodings of packages that directly depend on it`.
    reverse_depends: IndexMap<String, IndexSet<String>>,
}

impl Catalog {
    /// Parses and indexes a repository's package records.
    ///
    /// Bails out with the first [`ReferenceParseError`] encountered while
    /// resolving a package's own `name@version`, or any of its `depends` /
    /// `conflicts` reference strings.
    pub fn build(records: &[PackageRecord]) -> Result<Catalog, ReferenceParseError> {
        let mut packages = Vec::with_capacity(records.len());
        for record in records {
            packages.push(RepoPackage::from_record(record)?);
        }

        let mut by_name: IndexMap<String, Vec<usize>> = IndexMap::new();
        let mut by_encoding = IndexMap::new();
        for (i, p) in packages.iter().enumerate() {
            let encoding = p.encoding();
            if by_encoding.insert(encoding.clone(), i).is_some() {
                log::warn!(
                    "duplicate catalog entry for {encoding}; keeping the later one as authoritative"
                );
            }
            by_name.entry(p.name.clone()).or_default().push(i);
        }
        for indices in by_name.values_mut() {
            indices.sort_by(|&a, &b| packages[a].version.cmp(&packages[b].version));
        }

        let mut catalog = Catalog {
            packages,
            by_name,
            by_encoding,
            reverse_depends: IndexMap::new(),
        };

        let mut edges = Vec::new();
        for p in &catalog.packages {
            let dependent = p.encoding();
            for clause in &p.depends {
                for alt in clause {
                    for matched in catalog.match_reference(alt) {
                        edges.push((matched.encoding(), dependent.clone()));
                    }
                }
            }
        }
        for (matched_encoding, dependent) in edges {
            catalog
                .reverse_depends
                .entry(matched_encoding)
                .or_default()
                .insert(dependent);
        }

        log::debug!(
            "catalog built: {} packages across {} names, {} reverse-dependency edges",
            catalog.packages.len(),
            catalog.by_name.len(),
            catalog.reverse_depends.values().map(IndexSet::len).sum::<usize>()
        );

        Ok(catalog)
    }

    /// All catalog entries whose `(name, version)` satisfies `reference`,
    /// in ascending-version bucket order.
    ///
    /// An unversioned reference returns the whole name bucket. A reference
    /// whose name is absent from the catalog returns an empty list; this
    /// never fails.
    pub fn match_reference(&self, reference: &PackageReference) -> Vec<&RepoPackage> {
        let Some(indices) = self.by_name.get(&reference.name) else {
            return Vec::new();
        };
        indices
            .iter()
            .map(|&i| &self.packages[i])
            .filter(|p| reference.matches_version(&p.version))
            .collect()
    }

    /// Same as [`Catalog::match_reference`], projected to `ref` variable /
    /// encoding strings (identical, since the encoding string is the
    /// variable name).
    pub fn match_encodings(&self, reference: &PackageReference) -> Vec<String> {
        self.match_reference(reference)
            .into_iter()
            .map(RepoPackage::encoding)
            .collect()
    }

    /// The full set of catalog entries, in no particular cross-name order.
    pub fn packages(&self) -> &[RepoPackage] {
        &self.packages
    }

    /// Look up a single entry by its exact `name@version` encoding.
    pub fn get(&self, encoding: &str) -> Option<&RepoPackage> {
        self.by_encoding.get(encoding).map(|&i| &self.packages[i])
    }

    /// Packages that directly depend on `encoding` via some clause.
    pub fn reverse_depends_on(&self, encoding: &str) -> impl Iterator<Item = &str> {
        self.reverse_depends
            .get(encoding)
            .into_iter()
            .flat_map(|set| set.iter())
            .map(String::as_str)
    }

    /// Number of distinct package names in the catalog, for diagnostics.
    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, version: &str) -> PackageRecord {
        PackageRecord {
            name: name.into(),
            version: version.into(),
            size: 1,
            depends: vec![],
            conflicts: vec![],
        }
    }

    #[test]
    fn buckets_are_sorted_ascending() {
        let records = vec![record("a", "3"), record("a", "1"), record("a", "2")];
        let catalog = Catalog::build(&records).unwrap();
        let reference: PackageReference = "a".parse().unwrap();
        let versions: Vec<_> = catalog
            .match_reference(&reference)
            .into_iter()
            .map(|p| p.version.to_string())
            .collect();
        assert_eq!(versions, vec!["1", "2", "3"]);
    }

    #[test]
    fn missing_name_returns_empty_never_fails() {
        let catalog = Catalog::build(&[]).unwrap();
        let reference: PackageReference = "nonexistent".parse().unwrap();
        assert!(catalog.match_reference(&reference).is_empty());
    }

    #[test]
    fn ranged_reference_filters_bucket() {
        let records = vec![record("l", "1"), record("l", "2"), record("l", "3")];
        let catalog = Catalog::build(&records).unwrap();
        let reference: PackageReference = "l>=2".parse().unwrap();
        let versions: Vec<_> = catalog
            .match_reference(&reference)
            .into_iter()
            .map(|p| p.version.to_string())
            .collect();
        assert_eq!(versions, vec!["2", "3"]);
    }

    #[test]
    fn reverse_depends_indexes_direct_dependents() {
        let mut b = record("b", "1");
        b.depends = vec![vec!["a=1".to_string()]];
        let records = vec![record("a", "1"), b];
        let catalog = Catalog::build(&records).unwrap();
        let dependents: Vec<_> = catalog.reverse_depends_on("a@1").collect();
        assert_eq!(dependents, vec!["b@1"]);
    }

    #[test]
    fn constraint_parses_install_and_uninstall_prefixes() {
        let install: Constraint = "+A=1".parse().unwrap();
        assert_eq!(install.kind, ConstraintKind::Install);
        let uninstall: Constraint = "-A=1".parse().unwrap();
        assert_eq!(uninstall.kind, ConstraintKind::Uninstall);
    }
}
