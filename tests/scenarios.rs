// SPDX-License-Identifier: MPL-2.0

//! Declarative resolution scenarios, loaded from `ron`-encoded fixtures
//! under `tests/fixtures/`, mirroring §8 of the design's concrete scenarios
//! and boundary behaviors.

#![cfg(feature = "serde")]

use std::io::Write;

use log::LevelFilter;

use pkgsolve::{resolve, PackageRecord, ResolverConfig};

fn init_log() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Debug)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .is_test(true)
        .try_init();
}

#[derive(serde::Deserialize)]
struct Scenario {
    repository: Vec<PackageRecord>,
    initial: Vec<String>,
    constraints: Vec<String>,
    expected: Vec<String>,
}

fn run_fixture(name: &str) {
    init_log();
    let path = format!("{}/tests/fixtures/{name}.ron", env!("CARGO_MANIFEST_DIR"));
    let data = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {path}: {e}"));
    let scenario: Scenario = ron::de::from_str(&data).unwrap_or_else(|e| panic!("parsing {path}: {e}"));

    let plan = resolve(
        &scenario.repository,
        &scenario.initial,
        &scenario.constraints,
        &ResolverConfig::default(),
    )
    .unwrap();
    let rendered: Vec<String> = plan.iter().map(|c| c.to_string()).collect();
    assert_eq!(rendered, scenario.expected, "fixture {name}");
}

#[test]
fn s1_fresh_install() {
    run_fixture("s1_fresh_install");
}

#[test]
fn s2_upgrade_with_conflict() {
    run_fixture("s2_upgrade_with_conflict");
}

#[test]
fn s3_disjunctive_dependency() {
    run_fixture("s3_disjunctive_dependency");
}

#[test]
fn s4_remove_with_reverse_dependency() {
    run_fixture("s4_remove_with_reverse_dependency");
}

#[test]
fn s5_unsatisfiable() {
    run_fixture("s5_unsatisfiable");
}

#[test]
fn boundary_empty_everything() {
    run_fixture("boundary_empty_everything");
}

#[test]
fn boundary_nonexistent_constraint() {
    run_fixture("boundary_nonexistent_constraint");
}
