//! Regex grammar
//!
//!     The dialect grammar is written with the [crate::jsre::parsec] combinators in two
//!     layers. The base layer (`base`) holds the dialect-agnostic rules: literal chars,
//!     escapes, character classes, quantifiers, assertions and the disjunction shape.
//!     The dialect layer (`dialect`) adds terms, atoms, groups, named groups and
//!     backreferences, and a best-effort tokenizer, and builds the grammar once for the
//!     whole process.
//!
//! Parse Pipeline
//!
//!     1. Flags and options become a [GrammarState].
//!     2. The `Main` rule parses the source into a [crate::jsre::ast::Node] tree.
//!     3. Unless a partial parse was asked for, all input must be consumed.
//!     4. Capturing groups are numbered and backreferences checked (`check`).
//!
//!     Every failure is a [RegexError] with a byte range into the source.
//!
//! Loose Mode
//!
//!     Loose mode and the legacy toggles are switches on the same grammar, read from the
//!     parse state. They turn a fixed set of validation errors into best-effort values.
//!     Backreference errors are never relaxed.

mod base;
pub mod check;
mod dialect;
pub mod error;
pub mod options;
pub mod source;
pub mod state;
pub mod token;
pub mod unicode_property;

pub use base::MAX_NESTING;
pub use check::check;
pub use dialect::{lex, parse, parse_with, ParsedRegex, Pattern};
pub use error::{format_source_context, ErrorKind, RegexError};
pub use options::ParseOptions;
pub use source::{show_quantifier, to_source, to_source_with};
pub use state::{GrammarState, Legacy};
pub use token::{LexemeKind, Token};

use crate::jsre::ast::{make_empty_node, GroupBehavior, Lookaround, Node, Quantifier};
use crate::jsre::parsec::{GrammarBuilder, Language, Span, Value};

/// Values the regex grammar passes between its rules
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Node(Node),
    Quantifier(Quantifier),
    /// An escape before it becomes a node or part of a group name
    CodePoint(u32),
    /// A group name
    Name(String),
    Behavior(GroupBehavior),
    Look(Lookaround),
    Tokens(Vec<Token>),
}

pub struct RegexLanguage;

impl Language for RegexLanguage {
    type Item = Item;
    type State = GrammarState;
    type Error = RegexError;
}

pub(crate) type Rules = GrammarBuilder<RegexLanguage>;
pub(crate) type RValue = Value<Item>;
pub(crate) type RSpan<'a> = Span<'a, GrammarState>;

pub(crate) fn node(node: Node) -> RValue {
    Value::Item(Item::Node(node))
}

pub(crate) fn code_point(value: u32) -> RValue {
    Value::Item(Item::CodePoint(value))
}

/// The node inside a value produced by a node rule. Any other value is a grammar
/// bug; release builds read it as the empty list.
pub(crate) fn into_node(value: RValue) -> Node {
    debug_assert!(
        matches!(value, Value::Item(Item::Node(_))),
        "node rule produced {:?}",
        value
    );
    try_into_node(value).unwrap_or_else(|| make_empty_node(0))
}

pub(crate) fn try_into_node(value: RValue) -> Option<Node> {
    match value {
        Value::Item(Item::Node(node)) => Some(node),
        _ => None,
    }
}

/// The code point inside a value produced by an escape rule, or the first char of a
/// matched text
pub(crate) fn into_code_point(value: RValue) -> u32 {
    let cp = match &value {
        Value::Item(Item::CodePoint(cp)) => Some(*cp),
        other => other.as_text().and_then(|text| text.chars().next()).map(u32::from),
    };
    debug_assert!(cp.is_some(), "escape rule produced {:?}", value);
    cp.unwrap_or_default()
}

/// First two elements of a sequence value, `Unit` where missing
pub(crate) fn pair(value: RValue) -> (RValue, RValue) {
    let mut parts = value.into_list().into_iter();
    let first = parts.next().unwrap_or(Value::Unit);
    let second = parts.next().unwrap_or(Value::Unit);
    (first, second)
}

pub(crate) fn triple(value: RValue) -> (RValue, RValue, RValue) {
    let mut parts = value.into_list().into_iter();
    let first = parts.next().unwrap_or(Value::Unit);
    let second = parts.next().unwrap_or(Value::Unit);
    let third = parts.next().unwrap_or(Value::Unit);
    (first, second, third)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_into_node_rejects_other_values() {
        assert_eq!(try_into_node(Value::Unit), None);
        assert_eq!(try_into_node(code_point(0x61)), None);
        let empty = make_empty_node(3);
        assert_eq!(try_into_node(node(empty.clone())), Some(empty));
    }

    #[test]
    fn test_into_code_point_reads_text() {
        assert_eq!(into_code_point(code_point(0x1F600)), 0x1F600);
        assert_eq!(into_code_point(Value::Text("éa".to_string())), 0xE9);
    }
}
