//! Property-based round trip: rendering a tree and parsing the text gives the tree back

use jsre_parser::jsre::ast::{
    normalize_ranges, renumber_groups, AssertionKind, BaseClass, GroupBehavior, LookDirection,
    Lookaround, Node, Quantifier, RegexFlags,
};
use jsre_parser::jsre::grammar::{parse, to_source, to_source_with};
use jsre_parser::jsre::testing::factories::*;
use proptest::prelude::*;

fn char_strategy() -> impl Strategy<Value = char> {
    prop_oneof![
        4 => (0x20u8..0x7f).prop_map(char::from),
        1 => prop::sample::select(vec!['\0', '\t', '\n', '\r', '\u{0B}', '\u{0C}', '\u{2028}', '\u{2029}']),
        1 => any::<char>(),
    ]
}

/// Lone surrogates, which only an escape can spell
fn surrogate_strategy() -> impl Strategy<Value = Node> {
    (0xD800u32..0xE000).prop_map(code_point)
}

fn base_class_strategy() -> impl Strategy<Value = BaseClass> {
    prop::sample::select(vec![
        BaseClass::Digit,
        BaseClass::NonDigit,
        BaseClass::Word,
        BaseClass::NonWord,
        BaseClass::Space,
        BaseClass::NonSpace,
    ])
}

/// Property escapes in canonical spelling, as the parser resolves them
fn property_strategy() -> impl Strategy<Value = Node> {
    let properties = vec![
        ("General_Category", Some("Letter")),
        ("General_Category", Some("Decimal_Number")),
        ("Script", Some("Greek")),
        ("Script_Extensions", Some("Latin")),
        ("ASCII_Hex_Digit", None),
        ("Alphabetic", None),
    ];
    (prop::sample::select(properties), any::<bool>())
        .prop_map(|((name, value), invert)| property(name, value, invert))
}

fn class_item_strategy() -> impl Strategy<Value = Node> {
    prop_oneof![
        3 => char_strategy().prop_map(ch),
        2 => (char_strategy(), char_strategy()).prop_map(|(a, b)| char_range(a.min(b), a.max(b))),
        1 => base_class_strategy().prop_map(class_escape),
        1 => property_strategy(),
        1 => surrogate_strategy(),
    ]
}

fn char_class_strategy() -> impl Strategy<Value = Node> {
    (any::<bool>(), prop::collection::vec(class_item_strategy(), 0..5))
        .prop_map(|(invert, body)| char_class(invert, body))
}

fn assertion_strategy() -> impl Strategy<Value = Node> {
    prop::sample::select(vec![
        AssertionKind::Begin,
        AssertionKind::End,
        AssertionKind::WordBoundary,
        AssertionKind::NonWordBoundary,
    ])
    .prop_map(assertion)
}

fn quantifier_strategy() -> impl Strategy<Value = Quantifier> {
    (0u32..4, prop::option::of(0u32..3), any::<bool>())
        .prop_map(|(min, extra, greedy)| quantifier(min, extra.map(|e| min + e), greedy))
}

fn behavior_strategy() -> impl Strategy<Value = GroupBehavior> {
    prop_oneof![
        Just(GroupBehavior::NonCapturing),
        prop::option::of("[a-z_$][a-z0-9_$]{0,4}")
            .prop_map(|name| GroupBehavior::Capturing { index: 0, name }),
    ]
}

fn look_strategy() -> impl Strategy<Value = Lookaround> {
    (any::<bool>(), any::<bool>()).prop_map(|(behind, negative)| {
        let direction = if behind {
            LookDirection::Behind
        } else {
            LookDirection::Ahead
        };
        Lookaround::new(direction, negative)
    })
}

/// Nodes a quantifier may follow
fn is_quantifiable(node: &Node) -> bool {
    matches!(
        node,
        Node::Char(_)
            | Node::Dot(_)
            | Node::ClassEscape(_)
            | Node::PropertyEscape(_)
            | Node::CharClass(_)
            | Node::Group(_)
            | Node::Backref(_)
    )
}

/// Terms in the canonical shape: zero terms is the empty list, one term stands alone
fn sequence(terms: Vec<Node>) -> Node {
    match terms.len() {
        0 => empty(),
        1 => terms.into_iter().next().unwrap_or_else(empty),
        _ => list(terms),
    }
}

fn alternatives(term: BoxedStrategy<Node>) -> BoxedStrategy<Node> {
    let seq = prop::collection::vec(term, 0..4).prop_map(sequence);
    prop_oneof![
        3 => seq.clone(),
        1 => prop::collection::vec(seq, 2..4).prop_map(disjunction),
    ]
    .boxed()
}

fn term_strategy() -> BoxedStrategy<Node> {
    let leaf = prop_oneof![
        4 => char_strategy().prop_map(ch),
        1 => surrogate_strategy(),
        1 => Just(dot()),
        1 => base_class_strategy().prop_map(class_escape),
        1 => property_strategy(),
        1 => char_class_strategy(),
        1 => assertion_strategy(),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        let body = alternatives(inner.clone());
        let atom = inner.prop_map(|node| {
            if is_quantifiable(&node) {
                node
            } else {
                non_capturing(node)
            }
        });
        prop_oneof![
            (behavior_strategy(), body.clone()).prop_map(|(behavior, body)| group(behavior, body)),
            (look_strategy(), body).prop_map(|(look, body)| lookaround(look, body)),
            (atom, quantifier_strategy()).prop_map(|(atom, q)| repeat(atom, q)),
        ]
    })
    .boxed()
}

/// A whole pattern. The second shape puts a digit after a backreference.
fn pattern_strategy() -> impl Strategy<Value = Node> {
    let body = alternatives(term_strategy());
    prop_oneof![
        body.clone(),
        (body, 0u32..10).prop_map(|(body, digit)| {
            let digit = char::from_digit(digit, 10).unwrap_or('0');
            list(vec![capturing(0, body), backref(1), ch(digit)])
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn parse_of_rendered_tree_is_the_tree(tree in pattern_strategy()) {
        let mut expected = tree;
        renumber_groups(&mut expected);
        let source = to_source(&expected);
        let parsed = parse(source.as_str(), Some(RegexFlags::parse("u")), false);
        prop_assert!(parsed.is_ok(), "/{}/ failed: {:?}", source, parsed.err());
        let mut actual = parsed.unwrap().tree;
        normalize_ranges(&mut actual);
        prop_assert_eq!(actual, expected, "source /{}/", source);
    }

    #[test]
    fn rendering_is_stable(tree in pattern_strategy()) {
        let mut tree = tree;
        renumber_groups(&mut tree);
        let source = to_source(&tree);
        let parsed = parse(source.as_str(), Some(RegexFlags::parse("u")), false).unwrap();
        prop_assert_eq!(parsed.to_source(), source);
    }
}

#[test]
fn test_digit_after_backref_survives() {
    let tree = list(vec![capturing(1, ch('a')), backref(1), ch('0')]);
    let source = to_source(&tree);
    assert_eq!(source, "(a)\\1\\x30");
    let mut parsed = parse(source.as_str(), None, false).unwrap().tree;
    normalize_ranges(&mut parsed);
    assert_eq!(parsed, tree);
}

#[test]
fn test_lone_surrogates_stay_apart() {
    let tree = list(vec![code_point(0xD83D), code_point(0xDE00)]);
    let source = to_source(&tree);
    assert_eq!(source, "\\uD83D\\u{DE00}");
    let mut parsed = parse(source.as_str(), Some(RegexFlags::parse("u")), false)
        .unwrap()
        .tree;
    normalize_ranges(&mut parsed);
    assert_eq!(parsed, tree);

    let legacy = to_source_with(&tree, RegexFlags::default());
    assert_eq!(legacy, "\\uD83D\\uDE00");
    let mut parsed = parse(legacy.as_str(), None, false).unwrap().tree;
    normalize_ranges(&mut parsed);
    assert_eq!(parsed, tree);
}
