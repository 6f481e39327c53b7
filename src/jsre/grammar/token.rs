//! Tokens produced by the best-effort lexer
//!
//! A token is either a structural marker ([Lexeme]) or a node the lexer could parse
//! whole, such as a char, an escape, a class range or a quantifier.

use serde::Serialize;
use std::ops::Range;

use crate::jsre::ast::{Node, Quantifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LexemeKind {
    /// `|`
    VBar,
    /// `[` or `]`
    CharClassBracket,
    /// `(` or `)`
    Paren,
    /// `?:` or `?<name>`
    GroupBehavior,
    /// `?=`, `?!`, `?<=` or `?<!`
    GroupAssertionBehavior,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lexeme {
    #[serde(rename = "type")]
    pub kind: LexemeKind,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Token {
    Lexeme(Lexeme),
    Node(Node),
    Quantifier(Quantifier),
}

impl Token {
    pub fn lexeme(kind: LexemeKind, range: Range<usize>) -> Self {
        Token::Lexeme(Lexeme { kind, range })
    }

    pub fn range(&self) -> &Range<usize> {
        match self {
            Token::Lexeme(lexeme) => &lexeme.range,
            Token::Node(node) => node.range(),
            Token::Quantifier(quantifier) => &quantifier.range,
        }
    }

    /// Short name for listings: the lexeme kind, the node kind, or `Quantifier`
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Lexeme(lexeme) => match lexeme.kind {
                LexemeKind::VBar => "VBar",
                LexemeKind::CharClassBracket => "CharClassBracket",
                LexemeKind::Paren => "Paren",
                LexemeKind::GroupBehavior => "GroupBehavior",
                LexemeKind::GroupAssertionBehavior => "GroupAssertionBehavior",
            },
            Token::Node(node) => node.kind_name(),
            Token::Quantifier(_) => "Quantifier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsre::ast::Dot;

    #[test]
    fn test_range_and_name() {
        let bar = Token::lexeme(LexemeKind::VBar, 1..2);
        assert_eq!(bar.range(), &(1..2));
        assert_eq!(bar.kind_name(), "VBar");
        let dot = Token::Node(Node::Dot(Dot { range: 0..1 }));
        assert_eq!(dot.kind_name(), "Dot");
    }

    #[test]
    fn test_lexeme_json() {
        let paren = Token::lexeme(LexemeKind::Paren, 0..1);
        let json = serde_json::to_string(&paren).unwrap();
        assert_eq!(json, r#"{"type":"Paren","range":{"start":0,"end":1}}"#);
    }
}
