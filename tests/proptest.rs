// SPDX-License-Identifier: MPL-2.0

//! Property 6 of §8: parsing a reference is a total function over
//! well-formed reference strings, and `parse(unparse(ref)) == ref`.

use proptest::prelude::*;
use proptest::string::string_regex;

use pkgsolve::PackageReference;

fn op_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("<"),
        Just("="),
        Just(">"),
        Just("<="),
        Just(">="),
        Just("<>"),
        Just("<=>"),
    ]
}

fn name_strategy() -> impl Strategy<Value = String> {
    string_regex("[a-zA-Z][a-zA-Z0-9_-]{0,8}").unwrap()
}

fn version_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(string_regex("[0-9]{1,3}").unwrap(), 1..=3)
        .prop_map(|segments| segments.join("."))
}

fn reference_string_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        name_strategy(),
        (name_strategy(), op_strategy(), version_strategy())
            .prop_map(|(name, op, version)| format!("{name}{op}{version}")),
    ]
}

proptest! {
    #[test]
    fn parse_unparse_round_trips(s in reference_string_strategy()) {
        let reference: PackageReference = s.parse().expect("well-formed reference must parse");
        let unparsed = reference.to_string();
        let reparsed: PackageReference = unparsed.parse().expect("unparsed reference must reparse");
        prop_assert_eq!(reference, reparsed);
    }

    #[test]
    fn matching_is_consistent_with_operator_semantics(
        name in name_strategy(),
        op in op_strategy(),
        bound in 0u32..50,
        candidate in 0u32..50,
    ) {
        let reference: PackageReference = format!("{name}{op}{bound}").parse().unwrap();
        let candidate_version = candidate.to_string().parse().unwrap();

        let expect_lt = op.contains('<') && candidate < bound;
        let expect_eq = op.contains('=') && candidate == bound;
        let expect_gt = op.contains('>') && candidate > bound;

        prop_assert_eq!(
            reference.matches_version(&candidate_version),
            expect_lt || expect_eq || expect_gt
        );
    }
}
