//! Grammar construction errors and parse failures

use std::fmt;

use super::node::ParserId;

/// Mistakes in a grammar definition, reported by [super::GrammarBuilder::build]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A rule reference names a rule that was never defined
    UndefinedRule(String),
    /// A rule definition produced an id that does not belong to this builder
    InvalidParser { rule: String },
    /// A repetition over a parser that can succeed without consuming input
    NullableRepeat { parser: String },
    /// A left-recursive rule whose body can succeed without consuming input
    NullableLeftRecursion { rule: String },
    /// A rule defined as a bare reference chain that leads back to itself
    CyclicReference { rule: String },
    /// A regex fragment that does not compile
    InvalidRegex { pattern: String, message: String },
    /// A literal matcher over the empty string; use `empty` instead
    EmptyLiteral,
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::UndefinedRule(name) => {
                write!(f, "Referenced rule does not exist: {}", name)
            }
            GrammarError::InvalidParser { rule } => {
                write!(f, "Rule \"{}\" is not defined by a parser of this grammar", rule)
            }
            GrammarError::NullableRepeat { parser } => {
                write!(f, "Repeat on nullable parser: {}", parser)
            }
            GrammarError::NullableLeftRecursion { rule } => {
                write!(f, "Left recursion on nullable rule: {}", rule)
            }
            GrammarError::CyclicReference { rule } => {
                write!(f, "Rule \"{}\" only refers to itself", rule)
            }
            GrammarError::InvalidRegex { pattern, message } => {
                write!(f, "Invalid regex /{}/: {}", pattern, message)
            }
            GrammarError::EmptyLiteral => {
                write!(f, "Exact match on the empty string, use empty instead")
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// A failed parse attempt.
///
/// `error` carries the grammar's own error payload when a parser failed for a reason
/// the grammar knows about (see [super::GrammarBuilder::try_map]).
#[derive(Debug, Clone, PartialEq)]
pub struct Failure<E> {
    pub position: usize,
    pub parser: ParserId,
    pub message: Option<String>,
    pub error: Option<E>,
}

impl<E> Failure<E> {
    pub fn new(position: usize, parser: ParserId) -> Self {
        Failure {
            position,
            parser,
            message: None,
            error: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_error(mut self, error: E) -> Self {
        self.error = Some(error);
        self
    }
}

impl<E: fmt::Display> fmt::Display for Failure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, &self.message) {
            (Some(error), _) => write!(f, "{}", error),
            (None, Some(message)) => write!(f, "{} at {}", message, self.position),
            (None, None) => write!(f, "Parse failed at {}", self.position),
        }
    }
}
