// SPDX-License-Identifier: MPL-2.0

//! The action linearizer: turns the delta between the initial and chosen
//! final state into an ordered, step-by-step valid install/uninstall
//! script.
//!
//! Two mutually recursive procedures, [`ResolutionContext::uninstall`] and
//! [`ResolutionContext::install`], share a command buffer and an `installed`
//! set. Per the design notes, cycle detection is structural rather than a
//! caught stack overflow: each procedure carries an explicit "on the current
//! DFS path" set and returns a typed [`LinearizeError::Cycle`] the moment it
//! would revisit an encoding still on that path.

use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::command::Command;
use crate::version::Version;

/// A structural cycle the linearizer could not order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinearizeError {
    /// `encoding` was reached twice on the same DFS path.
    #[error("dependency cycle through {encoding}")]
    Cycle {
        /// The encoding that would have been visited twice.
        encoding: String,
    },
}

/// The linearizer's mutable state for a single resolution: the ordered
/// command buffer and the `installed` set, both owned by one call and never
/// shared across threads or resolutions.
pub struct ResolutionContext<'a> {
    catalog: &'a Catalog,
    model: &'a FxHashMap<String, bool>,
    installed: IndexSet<String>,
    commands: Vec<Command>,
    on_path: IndexSet<String>,
}

impl<'a> ResolutionContext<'a> {
    /// Creates a fresh linearization context seeded with the initial
    /// installed set.
    pub fn new(
        catalog: &'a Catalog,
        model: &'a FxHashMap<String, bool>,
        initial: impl IntoIterator<Item = String>,
    ) -> Self {
        ResolutionContext {
            catalog,
            model,
            installed: initial.into_iter().collect(),
            commands: Vec::new(),
            on_path: IndexSet::new(),
        }
    }

    /// Runs the delta, removals first then installs, per the driver order,
    /// and returns the resulting command buffer.
    pub fn linearize(
        mut self,
        to_remove: &[String],
        to_install: &[String],
    ) -> Result<Vec<Command>, LinearizeError> {
        for e in to_remove {
            self.uninstall(e)?;
        }
        for e in to_install {
            self.install(e)?;
        }
        Ok(self.commands)
    }

    fn command_for(&self, encoding: &str) -> (String, Version) {
        let package = self
            .catalog
            .get(encoding)
            .expect("encoding originates from the catalog");
        (package.name.clone(), package.version.clone())
    }

    /// Removes `e` and, first, every dependent of `e` that the model also
    /// selected for removal — so no prefix ever leaves a dangling
    /// dependency.
    fn uninstall(&mut self, e: &str) -> Result<(), LinearizeError> {
        if !self.installed.contains(e) {
            return Ok(());
        }
        if !self.on_path.insert(e.to_string()) {
            return Err(LinearizeError::Cycle { encoding: e.to_string() });
        }
        let dependents: Vec<String> = self.catalog.reverse_depends_on(e).map(String::from).collect();
        for r in dependents {
            let selected = self.model.get(&r).copied().unwrap_or(false);
            if !selected && self.installed.contains(&r) {
                self.uninstall(&r)?;
            }
        }
        self.on_path.shift_remove(e);
        self.installed.shift_remove(e);
        let (name, version) = self.command_for(e);
        self.commands.push(Command::Uninstall { name, version });
        Ok(())
    }

    /// Installs `e` and, first, every selected alternative of every
    /// dependency clause that isn't installed yet — so no prefix ever
    /// installs a package before its dependencies.
    fn install(&mut self, e: &str) -> Result<(), LinearizeError> {
        if self.installed.contains(e) {
            return Ok(());
        }
        if !self.on_path.insert(e.to_string()) {
            return Err(LinearizeError::Cycle { encoding: e.to_string() });
        }
        let Some(package) = self.catalog.get(e) else {
            self.on_path.shift_remove(e);
            return Ok(());
        };
        let clauses = package.depends.clone();
        for clause in &clauses {
            for alt in clause {
                for matched in self.catalog.match_reference(alt) {
                    let matched_encoding = matched.encoding();
                    let selected = self.model.get(&matched_encoding).copied().unwrap_or(false);
                    if selected && !self.installed.contains(&matched_encoding) {
                        self.install(&matched_encoding)?;
                    }
                }
            }
        }
        self.on_path.shift_remove(e);
        self.installed.insert(e.to_string());
        let (name, version) = self.command_for(e);
        self.commands.push(Command::Install { name, version });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PackageRecord;

    fn record(name: &str, version: &str, depends: Vec<Vec<&str>>) -> PackageRecord {
        PackageRecord {
            name: name.into(),
            version: version.into(),
            size: 1,
            depends: depends
                .into_iter()
                .map(|c| c.into_iter().map(String::from).collect())
                .collect(),
            conflicts: vec![],
        }
    }

    #[test]
    fn dependency_precedes_dependent_on_install() {
        let records = vec![record("a", "1", vec![vec!["b"]]), record("b", "1", vec![])];
        let catalog = Catalog::build(&records).unwrap();
        let mut model = FxHashMap::default();
        model.insert("a@1".to_string(), true);
        model.insert("b@1".to_string(), true);
        let ctx = ResolutionContext::new(&catalog, &model, []);
        let plan = ctx.linearize(&[], &["a@1".to_string()]).unwrap();
        let rendered: Vec<String> = plan.iter().map(|c| c.to_string()).collect();
        assert_eq!(rendered, vec!["+b=1".to_string(), "+a=1".to_string()]);
    }

    #[test]
    fn dependent_precedes_dependency_on_uninstall() {
        let records = vec![record("a", "1", vec![]), record("b", "1", vec![vec!["a=1"]])];
        let catalog = Catalog::build(&records).unwrap();
        let mut model = FxHashMap::default();
        model.insert("a@1".to_string(), false);
        model.insert("b@1".to_string(), false);
        let ctx = ResolutionContext::new(&catalog, &model, ["a@1".to_string(), "b@1".to_string()]);
        let plan = ctx
            .linearize(&["a@1".to_string(), "b@1".to_string()], &[])
            .unwrap();
        let rendered: Vec<String> = plan.iter().map(|c| c.to_string()).collect();
        assert_eq!(rendered, vec!["-b=1".to_string(), "-a=1".to_string()]);
    }

    #[test]
    fn mutual_install_dependency_is_reported_as_a_cycle() {
        let records = vec![
            record("a", "1", vec![vec!["b=1"]]),
            record("b", "1", vec![vec!["a=1"]]),
        ];
        let catalog = Catalog::build(&records).unwrap();
        let mut model = FxHashMap::default();
        model.insert("a@1".to_string(), true);
        model.insert("b@1".to_string(), true);
        let ctx = ResolutionContext::new(&catalog, &model, []);
        let err = ctx.linearize(&[], &["a@1".to_string()]).unwrap_err();
        assert!(matches!(err, LinearizeError::Cycle { .. }));
    }
}
