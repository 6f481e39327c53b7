//! Pattern text from a tree
//!
//! [to_source] renders a tree back to dialect text such that parsing the text gives
//! the same tree up to source ranges. Literal chars are escaped where the grammar
//! would otherwise read them as syntax, and a digit that follows a decimal escape is
//! written as `\x3N` so the two cannot merge into one escape.
//!
//! Lone surrogates are written `\uHHHH`. In unicode mode a lead surrogate escape
//! followed by a trail surrogate escape reads as one astral char, so there the trail
//! half is written `\u{HHHH}`, which never pairs. [to_source] renders for unicode
//! mode; [to_source_with] renders for the given flags.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::jsre::ast::{BackrefTarget, GroupBehavior, Node, NodeF, Quantifier, RegexFlags};
use crate::jsre::charset::chars::{escape_regex, hex_escape, is_surrogate};

static OPEN_DECIMAL_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\d*$").expect("decimal escape pattern is valid"));

static LEAD_SURROGATE_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\u[Dd][89ABab][0-9A-Fa-f]{2}$").expect("lead surrogate pattern is valid")
});

static TRAIL_SURROGATE_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\\u([Dd][C-Fc-f][0-9A-Fa-f]{2})").expect("trail surrogate pattern is valid")
});

/// `*`, `+`, `?`, `{m}`, `{m,}` or `{m,n}`, with a trailing `?` when lazy
pub fn show_quantifier(quantifier: &Quantifier) -> String {
    let base = match (quantifier.min, quantifier.max) {
        (0, Some(1)) => "?".to_string(),
        (0, None) => "*".to_string(),
        (1, None) => "+".to_string(),
        (min, None) => format!("{{{},}}", min),
        (min, Some(max)) if min == max => format!("{{{}}}", min),
        (min, Some(max)) => format!("{{{},{}}}", min, max),
    };
    if quantifier.greedy {
        base
    } else {
        base + "?"
    }
}

fn show_char(value: u32, in_class: bool) -> String {
    if is_surrogate(value) {
        return format!("\\u{:04X}", value);
    }
    match char::from_u32(value) {
        Some('\u{0C}') => "\\f".to_string(),
        Some('\n') => "\\n".to_string(),
        Some('\r') => "\\r".to_string(),
        Some('\t') => "\\t".to_string(),
        Some('\u{2028}') => "\\u2028".to_string(),
        Some('\u{2029}') => "\\u2029".to_string(),
        Some(c) => escape_regex(c.encode_utf8(&mut [0; 4]), in_class),
        None => format!("\\u{{{:X}}}", value),
    }
}

/// Concatenate pieces, escaping a leading digit that would extend a preceding `\N`,
/// and in unicode mode a trail surrogate that would pair with a preceding lead.
fn fix_sticky(pieces: Vec<String>, unicode: bool) -> String {
    let mut out = String::new();
    let mut previous = String::new();
    for piece in pieces {
        let mut rest = piece.as_str();
        if OPEN_DECIMAL_ESCAPE.is_match(&previous) {
            if let Some(digit) = rest.chars().next().filter(char::is_ascii_digit) {
                out.push_str(&hex_escape(digit as u32));
                rest = &rest[1..];
            }
        }
        if unicode && LEAD_SURROGATE_ESCAPE.is_match(&previous) {
            if let Some(trail) = TRAIL_SURROGATE_ESCAPE.captures(rest) {
                let consumed = trail.get(0).map_or(0, |m| m.end());
                let hex = trail.get(1).map_or("", |m| m.as_str());
                out.push_str(&format!("\\u{{{}}}", hex));
                rest = &rest[consumed..];
            }
        }
        out.push_str(rest);
        previous = piece;
    }
    out
}

/// Render a tree as pattern text for unicode mode.
pub fn to_source(tree: &Node) -> String {
    render(tree, true)
}

/// Render a tree as pattern text for a pattern parsed with `flags`.
pub fn to_source_with(tree: &Node, flags: RegexFlags) -> String {
    render(tree, flags.unicode)
}

fn render(tree: &Node, unicode: bool) -> String {
    tree.bottom_up(|layer, parent| match layer {
        NodeF::Char(c) => {
            let in_class = matches!(parent, Some(Node::CharClass(_) | Node::CharRange(_)));
            show_char(c.value, in_class)
        }
        NodeF::Dot(_) => ".".to_string(),
        NodeF::ClassEscape(escape) => format!("\\{}", escape.class.letter()),
        NodeF::PropertyEscape(escape) => {
            let letter = if escape.invert { 'P' } else { 'p' };
            match &escape.property.value {
                Some(value) => format!("\\{}{{{}={}}}", letter, escape.property.name, value),
                None => format!("\\{}{{{}}}", letter, escape.property.name),
            }
        }
        NodeF::Backref(backref) => match &backref.target {
            BackrefTarget::Index(index) => format!("\\{}", index),
            BackrefTarget::Name(name) => format!("\\k<{}>", name),
        },
        NodeF::BaseAssertion(assertion) => assertion.kind.source().to_string(),
        NodeF::Quantifier(quantifier) => show_quantifier(quantifier),
        NodeF::CharRange { begin, end, .. } => format!("{}-{}", begin, end),
        NodeF::CharClass { node, body } => {
            let caret = if node.invert { "^" } else { "" };
            format!("[{}{}]", caret, fix_sticky(body, unicode))
        }
        NodeF::GroupAssertion { node, body } => format!("({}{})", node.look.prefix(), body),
        NodeF::Group { node, body } => {
            let behavior = match &node.behavior {
                GroupBehavior::NonCapturing => "?:".to_string(),
                GroupBehavior::Capturing {
                    name: Some(name), ..
                } => format!("?<{}>", name),
                GroupBehavior::Capturing { name: None, .. } => String::new(),
            };
            format!("({}{})", behavior, body)
        }
        NodeF::Repeat {
            body, quantifier, ..
        } => body + &quantifier,
        NodeF::List { body, .. } => fix_sticky(body, unicode),
        NodeF::Disjunction { body, .. } => body.join("|"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsre::ast::{Backref, Char, List};

    fn quantifier(min: u32, max: Option<u32>, greedy: bool) -> Quantifier {
        Quantifier {
            min,
            max,
            greedy,
            range: 0..0,
        }
    }

    #[test]
    fn test_show_quantifier() {
        assert_eq!(show_quantifier(&quantifier(0, Some(1), true)), "?");
        assert_eq!(show_quantifier(&quantifier(0, None, false)), "*?");
        assert_eq!(show_quantifier(&quantifier(1, None, true)), "+");
        assert_eq!(show_quantifier(&quantifier(2, None, true)), "{2,}");
        assert_eq!(show_quantifier(&quantifier(3, Some(3), true)), "{3}");
        assert_eq!(show_quantifier(&quantifier(1, Some(4), false)), "{1,4}?");
    }

    #[test]
    fn test_show_char() {
        assert_eq!(show_char('a' as u32, false), "a");
        assert_eq!(show_char('.' as u32, false), "\\.");
        assert_eq!(show_char('-' as u32, false), "-");
        assert_eq!(show_char('-' as u32, true), "\\-");
        assert_eq!(show_char('\n' as u32, false), "\\n");
        assert_eq!(show_char(0xD83D, false), "\\uD83D");
    }

    #[test]
    fn test_digit_after_backref() {
        let tree = Node::List(List {
            body: vec![
                Node::Backref(Backref {
                    target: BackrefTarget::Index(1),
                    range: 0..2,
                }),
                Node::Char(Char::new('0' as u32, 2..3)),
            ],
            range: 0..3,
        });
        assert_eq!(to_source(&tree), "\\1\\x30");
    }

    #[test]
    fn test_fix_sticky_only_after_escape() {
        let pieces = vec!["a1".to_string(), "2".to_string()];
        assert_eq!(fix_sticky(pieces, true), "a12");
    }

    fn surrogates() -> Node {
        Node::List(List {
            body: vec![
                Node::Char(Char::new(0xD83D, 0..6)),
                Node::Char(Char::new(0xDE00, 6..12)),
            ],
            range: 0..12,
        })
    }

    #[test]
    fn test_trail_surrogate_after_lead_uses_braces() {
        assert_eq!(to_source(&surrogates()), "\\uD83D\\u{DE00}");
        assert_eq!(
            to_source_with(&surrogates(), RegexFlags::default()),
            "\\uD83D\\uDE00"
        );
    }

    #[test]
    fn test_lone_trail_surrogate_keeps_short_form() {
        let tree = Node::List(List {
            body: vec![
                Node::Char(Char::new('a' as u32, 0..1)),
                Node::Char(Char::new(0xDE00, 1..7)),
            ],
            range: 0..7,
        });
        assert_eq!(to_source(&tree), "a\\uDE00");
    }
}
