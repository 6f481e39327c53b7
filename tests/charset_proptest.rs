//! Property-based tests for the interval and charset algebra

use jsre_parser::jsre::charset::{CharRange, Charset, Difference, MAX_CODE_POINT};
use proptest::prelude::*;

/// Intervals biased toward small code points so that overlaps and adjacency happen
fn range_strategy() -> impl Strategy<Value = CharRange> {
    prop_oneof![
        3 => (0u32..0x200, 0u32..0x40),
        1 => (0u32..MAX_CODE_POINT, 0u32..0x1000),
    ]
    .prop_map(|(begin, len)| CharRange::new(begin, (begin + len).min(MAX_CODE_POINT)))
}

fn charset_strategy() -> impl Strategy<Value = Charset> {
    prop::collection::vec(range_strategy(), 0..8).prop_map(Charset::from_ranges)
}

fn covers(ranges: &[CharRange], code_point: u32) -> bool {
    ranges.iter().any(|r| r.contains(code_point))
}

proptest! {
    #[test]
    fn subtract_self_is_empty(a in range_strategy()) {
        prop_assert_eq!(a.subtract(a), Difference::Empty);
    }

    #[test]
    fn join_self_is_self(a in range_strategy()) {
        prop_assert_eq!(a.join(a), Some(a));
    }

    #[test]
    fn coalesce_is_canonical(ranges in prop::collection::vec(range_strategy(), 0..10)) {
        let merged = CharRange::coalesce(ranges.clone());
        for pair in merged.windows(2) {
            // sorted, disjoint and not adjacent
            prop_assert!(pair[0].end() + 1 < pair[1].begin());
        }
        for r in &ranges {
            for cp in [r.begin(), r.end()] {
                prop_assert!(covers(&merged, cp));
            }
        }
        for r in &merged {
            for cp in [r.begin(), r.end()] {
                prop_assert!(covers(&ranges, cp));
            }
        }
    }

    #[test]
    fn pattern_round_trip(set in charset_strategy()) {
        let pattern = set.to_pattern();
        prop_assert_eq!(Charset::from_pattern(&pattern).unwrap(), set);
    }

    #[test]
    fn double_invert_is_identity(set in charset_strategy()) {
        prop_assert_eq!(set.invert().invert(), set);
    }

    #[test]
    fn union_with_complement_is_full(set in charset_strategy()) {
        prop_assert_eq!(set.union(&set.invert()), Charset::full());
    }

    #[test]
    fn intersect_with_complement_is_empty(set in charset_strategy()) {
        prop_assert!(set.intersect(&set.invert()).is_empty());
    }

    #[test]
    fn subtract_is_intersect_with_complement(a in charset_strategy(), b in charset_strategy()) {
        prop_assert_eq!(a.subtract(&b), a.intersect(&b.invert()));
    }

    #[test]
    fn membership_follows_union(a in charset_strategy(), b in charset_strategy(), cp in 0u32..0x300) {
        let union = a.union(&b);
        prop_assert_eq!(
            union.include_code_point(cp),
            a.include_code_point(cp) || b.include_code_point(cp)
        );
    }
}

#[test]
fn test_pattern_example() {
    let set = Charset::from_pattern("a-z0-9").unwrap();
    assert_eq!(set.to_pattern(), "0-9a-z");
    assert!(set.include_char('5'));
    assert!(!set.include_char('!'));
}
