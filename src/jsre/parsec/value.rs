//! Values produced by parsers, and the views handed to user callbacks

use std::ops::Range;

/// A parse result value.
///
/// Primitives produce [Value::Text] (literal and char matchers) or [Value::Captures]
/// (regex fragments, group 0 is the whole match). Sequences and repetitions produce
/// [Value::List]. Grammars put their own typed results in [Value::Item].
#[derive(Debug, Clone, PartialEq)]
pub enum Value<T> {
    Unit,
    Text(String),
    Captures(Vec<Option<String>>),
    List(Vec<Value<T>>),
    Item(T),
}

impl<T> Value<T> {
    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }

    /// Elements of a list. `Unit` is the empty list, any other value a singleton.
    pub fn into_list(self) -> Vec<Value<T>> {
        match self {
            Value::List(items) => items,
            Value::Unit => Vec::new(),
            other => vec![other],
        }
    }

    /// The matched text of a `Text` or `Captures` value.
    pub fn into_text(self) -> Option<String> {
        match self {
            Value::Text(text) => Some(text),
            Value::Captures(mut groups) if !groups.is_empty() => groups.swap_remove(0),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Captures(groups) => groups.first().and_then(|g| g.as_deref()),
            _ => None,
        }
    }

    /// Capture group `index` of a regex match.
    pub fn group(&self, index: usize) -> Option<&str> {
        match self {
            Value::Captures(groups) => groups.get(index).and_then(|g| g.as_deref()),
            _ => None,
        }
    }

    pub fn into_item(self) -> Option<T> {
        match self {
            Value::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<&T> {
        match self {
            Value::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Element `index` of a list value.
    pub fn nth(self, index: usize) -> Option<Value<T>> {
        match self {
            Value::List(mut items) if index < items.len() => Some(items.swap_remove(index)),
            _ => None,
        }
    }
}

/// What a mapping callback sees of the token it is mapping: the matched source range
/// and a read-only view of the parse state.
pub struct Span<'a, S> {
    pub input: &'a str,
    pub range: Range<usize>,
    pub state: &'a S,
}

impl<'a, S> Span<'a, S> {
    /// Source text covered by the token
    pub fn text(&self) -> &'a str {
        &self.input[self.range.clone()]
    }
}

/// Input handed to a custom scanning function.
pub struct ScanInput<'a, S> {
    pub input: &'a str,
    pub position: usize,
    pub state: &'a S,
}

impl<'a, S> ScanInput<'a, S> {
    /// Unconsumed input
    pub fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }
}

/// Result of a custom scanning function
#[derive(Debug, Clone, PartialEq)]
pub enum Scanned<T, E> {
    /// Matched, consuming the given number of bytes
    Match(Value<T>, usize),
    /// No match
    Miss,
    /// No match, with a grammar-level error attached
    Error(E),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_list() {
        let unit: Value<()> = Value::Unit;
        assert!(unit.into_list().is_empty());
        let text: Value<()> = Value::Text("a".into());
        assert_eq!(text.into_list(), vec![Value::Text("a".into())]);
    }

    #[test]
    fn test_captures_text() {
        let m: Value<()> = Value::Captures(vec![Some("ab".into()), None, Some("b".into())]);
        assert_eq!(m.as_text(), Some("ab"));
        assert_eq!(m.group(1), None);
        assert_eq!(m.group(2), Some("b"));
        assert_eq!(m.into_text(), Some("ab".to_string()));
    }

    #[test]
    fn test_span_text() {
        let span = Span {
            input: "hello",
            range: 1..3,
            state: &(),
        };
        assert_eq!(span.text(), "el");
    }
}
