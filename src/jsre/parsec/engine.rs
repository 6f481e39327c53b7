//! Parse execution
//!
//! A [Grammar] is immutable once built and can be shared between threads. Every call
//! to [Grammar::parse] creates its own [Context] holding the cursor, the user state and
//! the left-recursion memo table, and drops it when the call returns.

use log::trace;
use std::collections::HashMap;

use super::error::Failure;
use super::node::{PResult, ParserId, ParserNode};
use super::value::{ScanInput, Scanned, Span, Value};
use super::Language;

/// Remaining stack below which a nested parser call grows the stack
pub(crate) const RED_ZONE: usize = 64 * 1024;
/// Size of each newly allocated stack segment
pub(crate) const STACK_SEGMENT: usize = 4 * 1024 * 1024;

pub struct Grammar<L: Language> {
    nodes: Vec<ParserNode<L>>,
    rules: HashMap<String, ParserId>,
    left_recursive: Vec<String>,
}

/// Result of a top-level parse: the value or failure, the final state, and how far
/// the cursor got.
pub struct Outcome<L: Language> {
    pub result: Result<Value<L::Item>, Failure<L::Error>>,
    pub state: L::State,
    pub consumed: usize,
}

impl<L: Language> Outcome<L> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

struct Memo<L: Language> {
    position: usize,
    state: L::State,
    result: PResult<L>,
}

struct Context<'a, L: Language> {
    input: &'a str,
    position: usize,
    state: L::State,
    memo: HashMap<(ParserId, usize), Memo<L>>,
}

impl<'a, L: Language> Context<'a, L> {
    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn span(&self, start: usize) -> Span<'_, L::State> {
        Span {
            input: self.input,
            range: start..self.position,
            state: &self.state,
        }
    }
}

impl<L: Language> Grammar<L> {
    pub(crate) fn new(
        nodes: Vec<ParserNode<L>>,
        rules: HashMap<String, ParserId>,
        left_recursive: Vec<String>,
    ) -> Self {
        Grammar {
            nodes,
            rules,
            left_recursive,
        }
    }

    pub fn rule_id(&self, name: &str) -> Option<ParserId> {
        self.rules.get(name).copied()
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Whether the rule was wrapped in a left-recursion guard
    pub fn is_left_recursive(&self, name: &str) -> bool {
        self.left_recursive.iter().any(|rule| rule == name)
    }

    /// Parse `input` from its start with the named rule.
    pub fn parse(&self, rule: &str, input: &str, state: L::State) -> Outcome<L> {
        match self.rule_id(rule) {
            Some(id) => self.parse_with(id, input, state),
            None => Outcome {
                result: Err(Failure::new(0, ParserId(usize::MAX))
                    .with_message(format!("no rule named {}", rule))),
                state,
                consumed: 0,
            },
        }
    }

    /// Parse `input` from its start with any parser of this grammar.
    pub fn parse_with(&self, parser: ParserId, input: &str, state: L::State) -> Outcome<L> {
        let mut ctx = Context {
            input,
            position: 0,
            state,
            memo: HashMap::new(),
        };
        let result = self.run(parser, &mut ctx);
        trace!(
            "parse with {}: {} after {} of {} bytes",
            parser,
            if result.is_ok() { "ok" } else { "failed" },
            ctx.position,
            input.len()
        );
        Outcome {
            result,
            state: ctx.state,
            consumed: ctx.position,
        }
    }

    fn run(&self, id: ParserId, ctx: &mut Context<'_, L>) -> PResult<L> {
        stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || self.step(id, ctx))
    }

    fn fail(id: ParserId, position: usize) -> PResult<L> {
        Err(Failure::new(position, id))
    }

    fn step(&self, id: ParserId, ctx: &mut Context<'_, L>) -> PResult<L> {
        match &self.nodes[id.0] {
            ParserNode::Exact(literal) => {
                if ctx.rest().starts_with(literal.as_str()) {
                    ctx.position += literal.len();
                    Ok(Value::Text(literal.clone()))
                } else {
                    Self::fail(id, ctx.position)
                }
            }
            ParserNode::Charset(set) => self.match_char(id, ctx, |c| set.include_char(c)),
            ParserNode::Satisfy(predicate) => self.match_char(id, ctx, |c| predicate(c)),
            ParserNode::AnyChar => self.match_char(id, ctx, |_| true),
            ParserNode::Regex(re) => match re.captures(ctx.rest()) {
                Some(caps) => {
                    let groups = caps
                        .iter()
                        .map(|g| g.map(|m| m.as_str().to_string()))
                        .collect();
                    ctx.position += caps.get(0).map_or(0, |m| m.end());
                    Ok(Value::Captures(groups))
                }
                None => Self::fail(id, ctx.position),
            },
            ParserNode::Scan(scan) => {
                let input = ScanInput {
                    input: ctx.input,
                    position: ctx.position,
                    state: &ctx.state,
                };
                match scan(&input) {
                    Scanned::Match(value, consumed) => {
                        ctx.position += consumed;
                        Ok(value)
                    }
                    Scanned::Miss => Self::fail(id, ctx.position),
                    Scanned::Error(error) => Err(Failure::new(ctx.position, id).with_error(error)),
                }
            }
            ParserNode::Empty => Ok(Value::Unit),
            ParserNode::Pure(value) => Ok(value.clone()),
            ParserNode::Eof => {
                if ctx.position == ctx.input.len() {
                    Ok(Value::Unit)
                } else {
                    Self::fail(id, ctx.position)
                }
            }
            ParserNode::Fail { message, error } => {
                let mut failure = Failure::new(ctx.position, id).with_message(message.clone());
                failure.error = error.clone();
                Err(failure)
            }
            ParserNode::Seq(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.run(*item, ctx)?);
                }
                Ok(Value::List(values))
            }
            ParserNode::Alt(branches) => {
                let position = ctx.position;
                let state = ctx.state.clone();
                let mut last = None;
                for branch in branches {
                    match self.run(*branch, ctx) {
                        Ok(value) => return Ok(value),
                        Err(failure) if ctx.position != position => return Err(failure),
                        Err(failure) => {
                            ctx.state = state.clone();
                            last = Some(failure);
                        }
                    }
                }
                Err(last.unwrap_or_else(|| Failure::new(position, id)))
            }
            ParserNode::Repeat { parser, min, max } => {
                let mut values = Vec::new();
                while max.map_or(true, |max| values.len() < max) {
                    let position = ctx.position;
                    match self.run(*parser, ctx) {
                        Ok(value) => {
                            values.push(value);
                            // a scanner matched nothing, stop instead of looping
                            if ctx.position == position {
                                break;
                            }
                        }
                        Err(failure) => {
                            if ctx.position != position || values.len() < *min {
                                return Err(failure);
                            }
                            break;
                        }
                    }
                }
                Ok(Value::List(values))
            }
            ParserNode::Optional(parser) => {
                let position = ctx.position;
                let state = ctx.state.clone();
                match self.run(*parser, ctx) {
                    Err(_) if ctx.position == position => {
                        ctx.state = state;
                        Ok(Value::Unit)
                    }
                    result => result,
                }
            }
            ParserNode::Try(parser) => {
                let position = ctx.position;
                let state = ctx.state.clone();
                let result = self.run(*parser, ctx);
                if result.is_err() {
                    ctx.position = position;
                    ctx.state = state;
                }
                result
            }
            ParserNode::Lookahead {
                parser,
                ahead,
                negative,
            } => {
                let value = self.run(*parser, ctx)?;
                let position = ctx.position;
                let state = ctx.state.clone();
                let looked = self.run(*ahead, ctx);
                ctx.position = position;
                ctx.state = state;
                match (looked, *negative) {
                    (Ok(_), false) | (Err(_), true) => Ok(value),
                    (Ok(_), true) => Self::fail(id, position),
                    (Err(failure), false) => Err(failure),
                }
            }
            ParserNode::Map(parser, f) => {
                let start = ctx.position;
                let value = self.run(*parser, ctx)?;
                Ok(f(value, &ctx.span(start)))
            }
            ParserNode::TryMap(parser, f) => {
                let start = ctx.position;
                let value = self.run(*parser, ctx)?;
                f(value, &ctx.span(start)).map_err(|error| Failure::new(start, id).with_error(error))
            }
            ParserNode::MapErr(parser, f) => self.run(*parser, ctx).map_err(|mut failure| {
                failure.error = failure.error.take().map(|error| f(error));
                failure
            }),
            ParserNode::StateAfter(parser, f) => {
                let start = ctx.position;
                let value = self.run(*parser, ctx)?;
                f(&mut ctx.state, start..ctx.position);
                Ok(value)
            }
            ParserNode::Bind(parser, f) => {
                let start = ctx.position;
                let value = self.run(*parser, ctx)?;
                let next = f(&value, &ctx.span(start));
                match self.nodes.get(next.0) {
                    Some(ParserNode::Ref(name)) => Err(Failure::new(ctx.position, id)
                        .with_message(format!("continuation returned rule reference {}", name))),
                    Some(_) => self.run(next, ctx),
                    None => Err(Failure::new(ctx.position, id)
                        .with_message("continuation returned an unknown parser")),
                }
            }
            ParserNode::Slice(parser) => {
                let start = ctx.position;
                self.run(*parser, ctx)?;
                Ok(Value::Text(ctx.input[start..ctx.position].to_string()))
            }
            ParserNode::Ref(name) => Err(Failure::new(ctx.position, id)
                .with_message(format!("unresolved rule reference {}", name))),
            ParserNode::LeftRecur { body, .. } => self.left_recur(id, *body, ctx),
        }
    }

    fn match_char(
        &self,
        id: ParserId,
        ctx: &mut Context<'_, L>,
        accept: impl Fn(char) -> bool,
    ) -> PResult<L> {
        match ctx.rest().chars().next() {
            Some(c) if accept(c) => {
                ctx.position += c.len_utf8();
                Ok(Value::Text(c.to_string()))
            }
            Some(_) => Self::fail(id, ctx.position),
            None => Err(Failure::new(ctx.position, id).with_message("EOF")),
        }
    }

    /// Grow a left-recursive parse one iteration at a time. The memo entry for this
    /// (rule, position) starts as a failure, so the rule's own reference fails on the
    /// first pass and returns the best result so far on later passes.
    fn left_recur(&self, id: ParserId, body: ParserId, ctx: &mut Context<'_, L>) -> PResult<L> {
        let start = ctx.position;
        let key = (id, start);
        if let Some(memo) = ctx.memo.get(&key) {
            ctx.position = memo.position;
            ctx.state = memo.state.clone();
            return memo.result.clone();
        }

        let state = ctx.state.clone();
        ctx.memo.insert(
            key,
            Memo {
                position: start,
                state: state.clone(),
                result: Self::fail(id, start),
            },
        );

        let mut grown = false;
        loop {
            ctx.position = start;
            ctx.state = state.clone();
            let result = self.run(body, ctx);
            let Some(best) = ctx.memo.get_mut(&key) else {
                return result;
            };
            if result.is_err() {
                if grown && ctx.position <= best.position {
                    ctx.position = best.position;
                    ctx.state = best.state.clone();
                    return best.result.clone();
                }
                return result;
            }
            if ctx.position <= best.position {
                ctx.position = best.position;
                ctx.state = best.state.clone();
                return best.result.clone();
            }
            best.position = ctx.position;
            best.state = ctx.state.clone();
            best.result = result;
            grown = true;
        }
    }
}
