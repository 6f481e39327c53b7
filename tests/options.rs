//! Parse options loaded from configuration text, and error rendering

use jsre_parser::jsre::grammar::{
    format_source_context, parse_with, ErrorKind, Legacy, ParseOptions, Pattern,
};

#[test]
fn test_options_from_yaml() {
    let options = ParseOptions::from_yaml(
        "flags: u\nloose: true\nlegacy:\n  octal_escape: true\n",
    )
    .unwrap();
    assert_eq!(options.flags, "u");
    assert!(options.loose);
    assert!(!options.partial);
    assert!(options.legacy.octal_escape);
    assert!(!options.legacy.identity_escape);

    let parsed = parse_with("\\012[z-a]", &options).unwrap();
    assert_eq!(parsed.to_source(), "\\n[z\\-a]");
}

#[test]
fn test_options_from_json() {
    let options = ParseOptions::from_json(r#"{"flags": "u", "partial": true}"#).unwrap();
    assert!(options.partial);
    let parsed = parse_with("ab)c", &options).unwrap();
    assert_eq!(parsed.source, "ab");
}

#[test]
fn test_empty_document_is_default() {
    let options = ParseOptions::from_json("{}").unwrap();
    assert_eq!(options, ParseOptions::default());
    assert_eq!(options.legacy, Legacy::default());
}

#[test]
fn test_unknown_field_is_ignored_but_bad_type_is_not() {
    assert!(ParseOptions::from_yaml("flags: u\ncolour: red\n").is_ok());
    assert!(ParseOptions::from_yaml("loose: sometimes\n").is_err());
}

#[test]
fn test_pattern_flags_apply_when_options_have_none() {
    let pattern = Pattern::new("\\u{61}", "u").unwrap();
    let parsed = parse_with(pattern, &ParseOptions::default()).unwrap();
    assert!(parsed.flags.unicode);
    assert_eq!(parsed.to_source(), "a");
}

#[test]
fn test_rendered_error() {
    let source = "a{2,1}";
    let err = parse_with(source, &ParseOptions::new("u")).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Numbers out of order in quantifier at 1..6");
    assert_eq!(
        format_source_context(source, &err.range),
        ">> a{2,1}\n    ^^^^^\n"
    );
}

#[test]
fn test_rendered_flags_error() {
    let err = Pattern::new("a", "gz").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Flags);
    insta::assert_snapshot!(err.to_string(), @"Invalid regular expression flags 'z'");
}
