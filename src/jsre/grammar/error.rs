//! Error types for regex parsing and validation

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// What went wrong. Every kind except [ErrorKind::Flags] points into the pattern source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// The grammar could not continue at this position
    SyntaxError,
    UnicodePropertyName,
    UnicodePropertyValue,
    /// Legacy octal escape such as `\01` while octal escapes are disabled
    OctEscape,
    /// `\` before a char that has no escape meaning, in unicode mode
    IdentityEscape,
    /// `\u{...}` above U+10FFFF
    UnicodeEscape,
    /// Escaped char in a group name that is not an identifier char
    UnicodeIDEscape,
    QuantifierOutOfOrder,
    CharRangeOutOfOrder,
    /// `\d`, `\p{...}` and friends used as a range endpoint
    CharClassEscapeInRange,
    /// `\B` inside a character class
    CharClassEscapeB,
    NothingToRepeat,
    /// An opening parenthesis that is never closed. The range is the parenthesis.
    ParenMismatch,
    /// More parentheses open at once than [super::MAX_NESTING]
    NestingTooDeep,
    BackrefNotExist,
    /// A backreference to a group that cannot have matched yet
    BackrefEmpty,
    /// Unknown flag letters
    Flags,
}

impl ErrorKind {
    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::SyntaxError => "Syntax error",
            ErrorKind::UnicodePropertyName => "Invalid Unicode property name",
            ErrorKind::UnicodePropertyValue => "Invalid Unicode property value",
            ErrorKind::OctEscape => "Octal escape sequences are not allowed",
            ErrorKind::IdentityEscape => "Invalid escape",
            ErrorKind::UnicodeEscape => "Invalid Unicode escape",
            ErrorKind::UnicodeIDEscape => "Invalid Unicode escape in group name",
            ErrorKind::QuantifierOutOfOrder => "Numbers out of order in quantifier",
            ErrorKind::CharRangeOutOfOrder => "Range out of order in character class",
            ErrorKind::CharClassEscapeInRange => "Character class escape in character range",
            ErrorKind::CharClassEscapeB => "Invalid escape \\B in character class",
            ErrorKind::NothingToRepeat => "Nothing to repeat",
            ErrorKind::ParenMismatch => "Unterminated group",
            ErrorKind::NestingTooDeep => "Groups nested too deeply",
            ErrorKind::BackrefNotExist => "Backreference to a group that does not exist",
            ErrorKind::BackrefEmpty => "Backreference to a group that is always empty here",
            ErrorKind::Flags => "Invalid regular expression flags",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A parse or validation error with the byte range of the source it concerns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegexError {
    pub kind: ErrorKind,
    pub range: Range<usize>,
    /// Extra text, currently only the invalid letters of a [ErrorKind::Flags] error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RegexError {
    pub fn new(kind: ErrorKind, range: Range<usize>) -> Self {
        RegexError {
            kind,
            range,
            detail: None,
        }
    }

    /// An empty range at `position`
    pub fn at(kind: ErrorKind, position: usize) -> Self {
        Self::new(kind, position..position)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn is_backref_error(&self) -> bool {
        matches!(self.kind, ErrorKind::BackrefNotExist | ErrorKind::BackrefEmpty)
    }
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.description())?;
        if let Some(detail) = &self.detail {
            write!(f, " '{}'", detail)?;
        }
        if self.kind != ErrorKind::Flags {
            write!(f, " at {}..{}", self.range.start, self.range.end)?;
        }
        Ok(())
    }
}

impl std::error::Error for RegexError {}

/// Format the pattern with a caret line under the error range
///
/// ```text
/// >> a{2,1}
///     ^^^^^
/// ```
///
/// Empty ranges get a single caret. Ranges are clamped to the source.
pub fn format_source_context(source: &str, range: &Range<usize>) -> String {
    let start = floor_char_boundary(source, range.start.min(source.len()));
    let end = floor_char_boundary(source, range.end.min(source.len())).max(start);
    let pad = source[..start].chars().count();
    let width = source[start..end].chars().count().max(1);
    format!(">> {}\n   {}{}\n", source, " ".repeat(pad), "^".repeat(width))
}

fn floor_char_boundary(source: &str, mut index: usize) -> usize {
    while !source.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = RegexError::new(ErrorKind::QuantifierOutOfOrder, 1..6);
        assert_eq!(err.to_string(), "Numbers out of order in quantifier at 1..6");
        let flags = RegexError::at(ErrorKind::Flags, 0).with_detail("qz");
        assert_eq!(flags.to_string(), "Invalid regular expression flags 'qz'");
    }

    #[test]
    fn test_format_source_context() {
        let context = format_source_context("a{2,1}", &(1..6));
        assert_eq!(context, ">> a{2,1}\n    ^^^^^\n");
    }

    #[test]
    fn test_format_source_context_empty_range_at_end() {
        let context = format_source_context("(a", &(2..2));
        assert_eq!(context, ">> (a\n     ^\n");
    }
}
