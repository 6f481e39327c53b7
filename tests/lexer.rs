//! Best-effort tokenization, one token per construct

use jsre_parser::jsre::ast::RegexFlags;
use jsre_parser::jsre::grammar::{lex, Token};

/// One `Kind@start..end` entry per token
fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| format!("{}@{}..{}", t.kind_name(), t.range().start, t.range().end))
        .collect::<Vec<_>>()
        .join(" ")
}

fn lex_render(source: &str) -> String {
    render(&lex(source, RegexFlags::parse("u")))
}

#[test]
fn test_group_alternative_and_quantifier() {
    insta::assert_snapshot!(
        lex_render("(?:a)|b*"),
        @"Paren@0..1 GroupBehavior@1..3 Char@3..4 Paren@4..5 VBar@5..6 Char@6..7 Quantifier@7..8"
    );
}

#[test]
fn test_named_group() {
    insta::assert_snapshot!(
        lex_render("(?<n>a)"),
        @"Paren@0..1 GroupBehavior@1..5 Char@5..6 Paren@6..7"
    );
}

#[test]
fn test_lookbehind_and_class_escape() {
    insta::assert_snapshot!(
        lex_render("(?<=x)\\d+"),
        @"Paren@0..1 GroupAssertionBehavior@1..4 Char@4..5 Paren@5..6 ClassEscape@6..8 Quantifier@8..9"
    );
}

#[test]
fn test_class_ranges() {
    insta::assert_snapshot!(
        lex_render("[a-z]"),
        @"CharClassBracket@0..1 CharRange@1..4 CharClassBracket@4..5"
    );
}

#[test]
fn test_parens_need_not_balance() {
    insta::assert_snapshot!(lex_render("a)("), @"Char@0..1 Paren@1..2 Paren@2..3");
}

#[test]
fn test_unclosed_class() {
    insta::assert_snapshot!(lex_render("[ab"), @"CharClassBracket@0..1 Char@1..2 Char@2..3");
}

#[test]
fn test_loose_syntax_is_tokenized() {
    insta::assert_snapshot!(
        lex_render("[z-a]{3,1}"),
        @"CharClassBracket@0..1 Char@1..2 Char@2..3 Char@3..4 CharClassBracket@4..5 Quantifier@5..10"
    );
}

#[test]
fn test_stops_at_unusable_input() {
    insta::assert_snapshot!(lex_render("ab{"), @"Char@0..1 Char@1..2");
}

#[test]
fn test_hard_error_gives_no_tokens() {
    assert!(lex("a[\\u{110000}]", RegexFlags::parse("u")).is_empty());
}

#[test]
fn test_tokens_as_json() {
    let tokens = lex("a|", RegexFlags::default());
    let json = serde_json::to_string(&tokens).unwrap();
    insta::assert_snapshot!(
        json,
        @r#"[{"type":"Char","value":97,"range":{"start":0,"end":1}},{"type":"VBar","range":{"start":1,"end":2}}]"#
    );
}
