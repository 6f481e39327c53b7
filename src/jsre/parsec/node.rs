//! The closed family of parser variants
//!
//! Parsers live in an arena owned by the builder (and later the grammar) and refer to
//! each other by [ParserId]. Rule references start out as [ParserNode::Ref]
//! placeholders and are linked to concrete parsers when the grammar is built.

use serde::Serialize;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use super::error::Failure;
use super::value::{ScanInput, Scanned, Span, Value};
use super::Language;
use crate::jsre::charset::Charset;

/// Index of a parser in its grammar's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ParserId(pub(crate) usize);

impl ParserId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type Item<L> = <L as Language>::Item;
type State<L> = <L as Language>::State;
type UserError<L> = <L as Language>::Error;

pub type MapFn<L> =
    Arc<dyn Fn(Value<Item<L>>, &Span<'_, State<L>>) -> Value<Item<L>> + Send + Sync>;
pub type TryMapFn<L> = Arc<
    dyn Fn(Value<Item<L>>, &Span<'_, State<L>>) -> Result<Value<Item<L>>, UserError<L>>
        + Send
        + Sync,
>;
pub type MapErrFn<L> = Arc<dyn Fn(UserError<L>) -> UserError<L> + Send + Sync>;
pub type StateFn<L> = Arc<dyn Fn(&mut State<L>, Range<usize>) + Send + Sync>;
pub type BindFn<L> = Arc<dyn Fn(&Value<Item<L>>, &Span<'_, State<L>>) -> ParserId + Send + Sync>;
pub type ScanFn<L> =
    Arc<dyn Fn(&ScanInput<'_, State<L>>) -> Scanned<Item<L>, UserError<L>> + Send + Sync>;
pub type PredicateFn = Arc<dyn Fn(char) -> bool + Send + Sync>;

pub(crate) type PResult<L> = Result<Value<Item<L>>, Failure<UserError<L>>>;

pub(crate) enum ParserNode<L: Language> {
    Exact(String),
    Charset(Charset),
    Satisfy(PredicateFn),
    AnyChar,
    /// Anchored with `^(?:...)`, matched against the unconsumed input
    Regex(regex::Regex),
    Scan(ScanFn<L>),
    Empty,
    Eof,
    Pure(Value<Item<L>>),
    Fail {
        message: String,
        error: Option<UserError<L>>,
    },
    Seq(Vec<ParserId>),
    Alt(Vec<ParserId>),
    Repeat {
        parser: ParserId,
        min: usize,
        max: Option<usize>,
    },
    Optional(ParserId),
    Try(ParserId),
    Lookahead {
        parser: ParserId,
        ahead: ParserId,
        negative: bool,
    },
    Map(ParserId, MapFn<L>),
    TryMap(ParserId, TryMapFn<L>),
    MapErr(ParserId, MapErrFn<L>),
    StateAfter(ParserId, StateFn<L>),
    Bind(ParserId, BindFn<L>),
    Slice(ParserId),
    /// Placeholder for a named rule
    Ref(String),
    /// Memoized fixed-point loop around a directly left-recursive rule body
    LeftRecur {
        rule: String,
        body: ParserId,
    },
}

impl<L: Language> ParserNode<L> {
    /// Direct sub-parsers, in evaluation order
    pub(crate) fn children(&self) -> Vec<ParserId> {
        match self {
            Self::Exact(_)
            | Self::Charset(_)
            | Self::Satisfy(_)
            | Self::AnyChar
            | Self::Regex(_)
            | Self::Scan(_)
            | Self::Empty
            | Self::Eof
            | Self::Pure(_)
            | Self::Fail { .. }
            | Self::Ref(_) => Vec::new(),
            Self::Seq(items) | Self::Alt(items) => items.clone(),
            Self::Lookahead { parser, ahead, .. } => vec![*parser, *ahead],
            Self::Repeat { parser, .. }
            | Self::Optional(parser)
            | Self::Try(parser)
            | Self::Map(parser, _)
            | Self::TryMap(parser, _)
            | Self::MapErr(parser, _)
            | Self::StateAfter(parser, _)
            | Self::Bind(parser, _)
            | Self::Slice(parser)
            | Self::LeftRecur { body: parser, .. } => vec![*parser],
        }
    }

    /// Rewrite every direct sub-parser id
    pub(crate) fn relink(&mut self, mut f: impl FnMut(ParserId) -> ParserId) {
        match self {
            Self::Exact(_)
            | Self::Charset(_)
            | Self::Satisfy(_)
            | Self::AnyChar
            | Self::Regex(_)
            | Self::Scan(_)
            | Self::Empty
            | Self::Eof
            | Self::Pure(_)
            | Self::Fail { .. }
            | Self::Ref(_) => {}
            Self::Seq(items) | Self::Alt(items) => {
                for item in items.iter_mut() {
                    *item = f(*item);
                }
            }
            Self::Lookahead { parser, ahead, .. } => {
                *parser = f(*parser);
                *ahead = f(*ahead);
            }
            Self::Repeat { parser, .. }
            | Self::Optional(parser)
            | Self::Try(parser)
            | Self::Map(parser, _)
            | Self::TryMap(parser, _)
            | Self::MapErr(parser, _)
            | Self::StateAfter(parser, _)
            | Self::Bind(parser, _)
            | Self::Slice(parser)
            | Self::LeftRecur { body: parser, .. } => *parser = f(*parser),
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Exact(_) => "Exact",
            Self::Charset(_) => "Charset",
            Self::Satisfy(_) => "Satisfy",
            Self::AnyChar => "AnyChar",
            Self::Regex(_) => "Regex",
            Self::Scan(_) => "Scan",
            Self::Empty => "Empty",
            Self::Eof => "Eof",
            Self::Pure(_) => "Pure",
            Self::Fail { .. } => "Fail",
            Self::Seq(_) => "Seq",
            Self::Alt(_) => "Alt",
            Self::Repeat { .. } => "Repeat",
            Self::Optional(_) => "Optional",
            Self::Try(_) => "Try",
            Self::Lookahead { .. } => "Lookahead",
            Self::Map(..) => "Map",
            Self::TryMap(..) => "TryMap",
            Self::MapErr(..) => "MapErr",
            Self::StateAfter(..) => "StateAfter",
            Self::Bind(..) => "Bind",
            Self::Slice(_) => "Slice",
            Self::Ref(_) => "Ref",
            Self::LeftRecur { .. } => "LeftRecur",
        }
    }

    /// Short description for diagnostics
    pub(crate) fn describe(&self) -> String {
        match self {
            ParserNode::Exact(s) => format!("Exact({:?})", s),
            ParserNode::Charset(set) => format!("Charset({:?})", set.to_pattern()),
            ParserNode::Regex(re) => format!("Regex(/{}/)", re.as_str()),
            ParserNode::Ref(name) => format!("Ref({})", name),
            ParserNode::LeftRecur { rule, .. } => format!("Recur({})", rule),
            other => other.kind_name().to_string(),
        }
    }
}
