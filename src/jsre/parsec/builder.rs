//! Grammar builder: parser construction, rule placeholders and the link pass
//!
//! Building happens in two phases. While defining rules, every parser is pushed into
//! an arena and rule references are [ParserNode::Ref] placeholders obtained from
//! [GrammarBuilder::rule]. [GrammarBuilder::build] then:
//!
//!     1. creates a placeholder for every defined rule,
//!     2. evaluates each deferred rule definition once,
//!     3. resolves placeholders and wraps every rule whose first set contains its own
//!        placeholder in a left-recursion guard,
//!     4. resolves placeholders again so they point at the wrapped rules,
//!     5. relinks every parser so no placeholder is reachable at parse time, rejecting
//!        repetitions over nullable parsers.

use log::debug;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use super::engine::Grammar;
use super::error::GrammarError;
use super::node::{ParserId, ParserNode};
use super::value::{ScanInput, Scanned, Span, Value};
use super::Language;
use crate::jsre::charset::Charset;

type Thunk<L> = Box<dyn FnOnce(&mut GrammarBuilder<L>) -> ParserId>;

enum RuleDef<L: Language> {
    Parser(ParserId),
    Thunk(Thunk<L>),
}

pub struct GrammarBuilder<L: Language> {
    nodes: Vec<ParserNode<L>>,
    placeholders: HashMap<String, ParserId>,
    rules: Vec<(String, RuleDef<L>)>,
    errors: Vec<GrammarError>,
}

impl<L: Language> Default for GrammarBuilder<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Language> GrammarBuilder<L> {
    pub fn new() -> Self {
        GrammarBuilder {
            nodes: Vec::new(),
            placeholders: HashMap::new(),
            rules: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn push(&mut self, node: ParserNode<L>) -> ParserId {
        self.nodes.push(node);
        ParserId(self.nodes.len() - 1)
    }

    // ------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------

    /// Placeholder for the rule `name`, usable before the rule is defined.
    pub fn rule(&mut self, name: &str) -> ParserId {
        if let Some(id) = self.placeholders.get(name) {
            return *id;
        }
        let id = self.push(ParserNode::Ref(name.to_string()));
        self.placeholders.insert(name.to_string(), id);
        id
    }

    /// Define `name` as an already built parser.
    pub fn define(&mut self, name: &str, parser: ParserId) {
        self.rules.push((name.to_string(), RuleDef::Parser(parser)));
    }

    /// Define `name` lazily. The closure runs once during [GrammarBuilder::build], after
    /// every rule has a placeholder, so it may refer to any rule by name.
    pub fn define_with(
        &mut self,
        name: &str,
        thunk: impl FnOnce(&mut GrammarBuilder<L>) -> ParserId + 'static,
    ) {
        self.rules
            .push((name.to_string(), RuleDef::Thunk(Box::new(thunk))));
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    /// Match a literal string. Produces `Value::Text`.
    pub fn exact(&mut self, literal: &str) -> ParserId {
        if literal.is_empty() {
            self.errors.push(GrammarError::EmptyLiteral);
        }
        self.push(ParserNode::Exact(literal.to_string()))
    }

    /// One char from `chars`
    pub fn one_of(&mut self, chars: &str) -> ParserId {
        self.charset(Charset::from_chars(chars))
    }

    /// One char not in `chars`
    pub fn none_of(&mut self, chars: &str) -> ParserId {
        self.charset(Charset::from_chars(chars).invert())
    }

    pub fn charset(&mut self, set: Charset) -> ParserId {
        self.push(ParserNode::Charset(set))
    }

    pub fn satisfy(&mut self, predicate: impl Fn(char) -> bool + Send + Sync + 'static) -> ParserId {
        self.push(ParserNode::Satisfy(Arc::new(predicate)))
    }

    pub fn any_char(&mut self) -> ParserId {
        self.push(ParserNode::AnyChar)
    }

    /// Match a regex fragment at the cursor. Produces `Value::Captures`.
    pub fn regex(&mut self, pattern: &str) -> ParserId {
        match regex::Regex::new(&format!("^(?:{})", pattern)) {
            Ok(re) => self.push(ParserNode::Regex(re)),
            Err(err) => {
                self.errors.push(GrammarError::InvalidRegex {
                    pattern: pattern.to_string(),
                    message: err.to_string(),
                });
                self.push(ParserNode::Fail {
                    message: "invalid regex".to_string(),
                    error: None,
                })
            }
        }
    }

    /// Parse with a custom function. The function reports how many bytes it consumed;
    /// a scanner is assumed never to match the empty string.
    pub fn scan(
        &mut self,
        f: impl Fn(&ScanInput<'_, L::State>) -> Scanned<L::Item, L::Error> + Send + Sync + 'static,
    ) -> ParserId {
        self.push(ParserNode::Scan(Arc::new(f)))
    }

    /// Always succeeds with `Value::Unit`, consuming nothing
    pub fn empty(&mut self) -> ParserId {
        self.push(ParserNode::Empty)
    }

    /// Always succeeds with `value`, consuming nothing
    pub fn pure(&mut self, value: Value<L::Item>) -> ParserId {
        self.push(ParserNode::Pure(value))
    }

    pub fn eof(&mut self) -> ParserId {
        self.push(ParserNode::Eof)
    }

    pub fn fail(&mut self, message: &str) -> ParserId {
        self.push(ParserNode::Fail {
            message: message.to_string(),
            error: None,
        })
    }

    pub fn fail_with(&mut self, message: &str, error: L::Error) -> ParserId {
        self.push(ParserNode::Fail {
            message: message.to_string(),
            error: Some(error),
        })
    }

    // ------------------------------------------------------------------
    // Combinators
    // ------------------------------------------------------------------

    /// Run parsers in order. Produces a `Value::List` of their values.
    pub fn seq(&mut self, parsers: &[ParserId]) -> ParserId {
        self.push(ParserNode::Seq(parsers.to_vec()))
    }

    /// Ordered choice. The next branch is tried only if the previous one failed
    /// without consuming input.
    pub fn alt(&mut self, parsers: &[ParserId]) -> ParserId {
        self.push(ParserNode::Alt(parsers.to_vec()))
    }

    /// Between `min` and `max` (unbounded when `None`) occurrences.
    pub fn repeat(&mut self, parser: ParserId, min: usize, max: Option<usize>) -> ParserId {
        self.push(ParserNode::Repeat { parser, min, max })
    }

    pub fn many(&mut self, parser: ParserId) -> ParserId {
        self.repeat(parser, 0, None)
    }

    pub fn some(&mut self, parser: ParserId) -> ParserId {
        self.repeat(parser, 1, None)
    }

    pub fn count(&mut self, parser: ParserId, n: usize) -> ParserId {
        self.repeat(parser, n, Some(n))
    }

    /// Produces `Value::Unit` when the parser fails without consuming input.
    pub fn opt(&mut self, parser: ParserId) -> ParserId {
        self.push(ParserNode::Optional(parser))
    }

    /// Restore cursor and state when the parser fails, however much it consumed.
    pub fn attempt(&mut self, parser: ParserId) -> ParserId {
        self.push(ParserNode::Try(parser))
    }

    pub fn followed_by(&mut self, parser: ParserId, ahead: ParserId) -> ParserId {
        self.push(ParserNode::Lookahead {
            parser,
            ahead,
            negative: false,
        })
    }

    pub fn not_followed_by(&mut self, parser: ParserId, ahead: ParserId) -> ParserId {
        self.push(ParserNode::Lookahead {
            parser,
            ahead,
            negative: true,
        })
    }

    pub fn map(
        &mut self,
        parser: ParserId,
        f: impl Fn(Value<L::Item>, &Span<'_, L::State>) -> Value<L::Item> + Send + Sync + 'static,
    ) -> ParserId {
        self.push(ParserNode::Map(parser, Arc::new(f)))
    }

    /// Map with a fallible function. An `Err` fails at the start of the token with the
    /// cursor left after it, so an enclosing choice does not try other branches.
    pub fn try_map(
        &mut self,
        parser: ParserId,
        f: impl Fn(Value<L::Item>, &Span<'_, L::State>) -> Result<Value<L::Item>, L::Error>
            + Send
            + Sync
            + 'static,
    ) -> ParserId {
        self.push(ParserNode::TryMap(parser, Arc::new(f)))
    }

    /// Transform the grammar error carried by a failure, if any.
    pub fn map_err(
        &mut self,
        parser: ParserId,
        f: impl Fn(L::Error) -> L::Error + Send + Sync + 'static,
    ) -> ParserId {
        self.push(ParserNode::MapErr(parser, Arc::new(f)))
    }

    /// Update the parse state after the parser succeeds. This is the only way
    /// a grammar changes state; backtracking combinators restore it.
    pub fn state_after(
        &mut self,
        parser: ParserId,
        f: impl Fn(&mut L::State, Range<usize>) + Send + Sync + 'static,
    ) -> ParserId {
        self.push(ParserNode::StateAfter(parser, Arc::new(f)))
    }

    /// Choose the next parser from the value just parsed. The continuation must return
    /// a parser built by this builder and not a rule placeholder.
    pub fn bind(
        &mut self,
        parser: ParserId,
        f: impl Fn(&Value<L::Item>, &Span<'_, L::State>) -> ParserId + Send + Sync + 'static,
    ) -> ParserId {
        self.push(ParserNode::Bind(parser, Arc::new(f)))
    }

    /// Produce the matched source text instead of the parser's value.
    pub fn slice(&mut self, parser: ParserId) -> ParserId {
        self.push(ParserNode::Slice(parser))
    }

    /// Element `index` of a sequence value
    pub fn at(&mut self, parser: ParserId, index: usize) -> ParserId {
        self.map(parser, move |value, _| value.nth(index).unwrap_or(Value::Unit))
    }

    pub fn ignore_then(&mut self, first: ParserId, second: ParserId) -> ParserId {
        let both = self.seq(&[first, second]);
        self.at(both, 1)
    }

    pub fn then_ignore(&mut self, first: ParserId, second: ParserId) -> ParserId {
        let both = self.seq(&[first, second]);
        self.at(both, 0)
    }

    pub fn delimited_by(&mut self, parser: ParserId, left: ParserId, right: ParserId) -> ParserId {
        let all = self.seq(&[left, parser, right]);
        self.at(all, 1)
    }

    /// [GrammarBuilder::delimited_by] with literal delimiters
    pub fn between(&mut self, parser: ParserId, left: &str, right: &str) -> ParserId {
        let left = self.exact(left);
        let right = self.exact(right);
        self.delimited_by(parser, left, right)
    }

    // ------------------------------------------------------------------
    // Build
    // ------------------------------------------------------------------

    pub fn build(mut self) -> Result<Grammar<L>, GrammarError> {
        let mut order: Vec<String> = Vec::new();
        let mut bodies: HashMap<String, ParserId> = HashMap::new();

        // Definitions may add further definitions while running
        while !self.rules.is_empty() {
            let defs = std::mem::take(&mut self.rules);
            for (name, _) in &defs {
                self.rule(name);
            }
            for (name, def) in defs {
                let id = match def {
                    RuleDef::Parser(id) => id,
                    RuleDef::Thunk(thunk) => thunk(&mut self),
                };
                if id.0 >= self.nodes.len() {
                    return Err(GrammarError::InvalidParser { rule: name });
                }
                if !bodies.contains_key(&name) {
                    order.push(name.clone());
                }
                bodies.insert(name, id);
            }
        }
        if let Some(err) = self.errors.first() {
            return Err(err.clone());
        }

        let resolved = self.resolve(&bodies)?;
        let mut recursive = Vec::new();
        {
            let mut analysis = Analysis::new(&self.nodes, &resolved);
            for name in &order {
                let body = bodies[name];
                let own = self.placeholders[name];
                if analysis.first_set(body).contains(&own) {
                    if analysis.nullable(body) {
                        return Err(GrammarError::NullableLeftRecursion { rule: name.clone() });
                    }
                    recursive.push(name.clone());
                }
            }
        }
        for name in &recursive {
            let body = bodies[name];
            let guard = self.push(ParserNode::LeftRecur {
                rule: name.clone(),
                body,
            });
            bodies.insert(name.clone(), guard);
            debug!("rule {} is left recursive, wrapped as {}", name, guard);
        }

        let resolved = self.resolve(&bodies)?;
        for node in self.nodes.iter_mut() {
            node.relink(|id| resolved[id.0]);
        }

        let mut analysis = Analysis::new(&self.nodes, &resolved);
        for node in &self.nodes {
            if let ParserNode::Repeat { parser, .. } = node {
                if analysis.nullable(*parser) {
                    return Err(GrammarError::NullableRepeat {
                        parser: self.nodes[parser.0].describe(),
                    });
                }
            }
        }

        let rules: HashMap<String, ParserId> = order
            .iter()
            .map(|name| (name.clone(), resolved[bodies[name].0]))
            .collect();
        debug!(
            "built grammar: {} rules, {} parsers, {} left recursive",
            rules.len(),
            self.nodes.len(),
            recursive.len()
        );
        Ok(Grammar::new(self.nodes, rules, recursive))
    }

    /// Map every parser id to itself, or a placeholder to the parser its rule names.
    fn resolve(&self, bodies: &HashMap<String, ParserId>) -> Result<Vec<ParserId>, GrammarError> {
        let mut resolved = Vec::with_capacity(self.nodes.len());
        for (index, node) in self.nodes.iter().enumerate() {
            let ParserNode::Ref(name) = node else {
                resolved.push(ParserId(index));
                continue;
            };
            let mut target = *bodies
                .get(name)
                .ok_or_else(|| GrammarError::UndefinedRule(name.clone()))?;
            let mut hops = 0;
            while let ParserNode::Ref(next) = &self.nodes[target.0] {
                hops += 1;
                if hops > self.nodes.len() {
                    return Err(GrammarError::CyclicReference { rule: name.clone() });
                }
                target = *bodies
                    .get(next)
                    .ok_or_else(|| GrammarError::UndefinedRule(next.clone()))?;
            }
            resolved.push(target);
        }
        Ok(resolved)
    }
}

/// Nullability and first sets over the arena.
///
/// Nullability looks through placeholders. A parser whose nullability is asked for
/// while it is still being computed counts as nullable, which cuts recursion.
struct Analysis<'a, L: Language> {
    nodes: &'a [ParserNode<L>],
    resolved: &'a [ParserId],
    nullable: Vec<Option<bool>>,
    visiting: Vec<bool>,
}

impl<'a, L: Language> Analysis<'a, L> {
    fn new(nodes: &'a [ParserNode<L>], resolved: &'a [ParserId]) -> Self {
        Analysis {
            nodes,
            resolved,
            nullable: vec![None; nodes.len()],
            visiting: vec![false; nodes.len()],
        }
    }

    fn nullable(&mut self, id: ParserId) -> bool {
        let id = self.resolved[id.0];
        if let Some(known) = self.nullable[id.0] {
            return known;
        }
        if self.visiting[id.0] {
            return true;
        }
        self.visiting[id.0] = true;
        let nodes = self.nodes;
        let result = match &nodes[id.0] {
            ParserNode::Exact(s) => s.is_empty(),
            ParserNode::Charset(_)
            | ParserNode::Satisfy(_)
            | ParserNode::AnyChar
            | ParserNode::Scan(_)
            | ParserNode::Fail { .. }
            | ParserNode::LeftRecur { .. } => false,
            ParserNode::Regex(re) => re.is_match(""),
            ParserNode::Empty | ParserNode::Eof | ParserNode::Pure(_) | ParserNode::Optional(_) => {
                true
            }
            ParserNode::Seq(items) => items.iter().all(|p| self.nullable(*p)),
            ParserNode::Alt(items) => items.iter().any(|p| self.nullable(*p)),
            ParserNode::Repeat { parser, min, .. } => *min == 0 || self.nullable(*parser),
            ParserNode::Lookahead { parser, .. }
            | ParserNode::Try(parser)
            | ParserNode::Map(parser, _)
            | ParserNode::TryMap(parser, _)
            | ParserNode::MapErr(parser, _)
            | ParserNode::StateAfter(parser, _)
            | ParserNode::Bind(parser, _)
            | ParserNode::Slice(parser) => self.nullable(*parser),
            // unresolved placeholders are resolved above
            ParserNode::Ref(_) => true,
        };
        self.visiting[id.0] = false;
        self.nullable[id.0] = Some(result);
        result
    }

    /// Parsers reachable from `id` before any mandatory consumption. Placeholders are
    /// reported as themselves, not looked through.
    fn first_set(&mut self, id: ParserId) -> Vec<ParserId> {
        let nodes = self.nodes;
        match &nodes[id.0] {
            ParserNode::Seq(items) => {
                let mut all = Vec::new();
                for item in items {
                    all.extend(self.first_set(*item));
                    if !self.nullable(*item) {
                        break;
                    }
                }
                all
            }
            ParserNode::Alt(items) => items.iter().flat_map(|p| self.first_set(*p)).collect(),
            ParserNode::Bind(parser, _) => {
                if self.nullable(*parser) {
                    Vec::new()
                } else {
                    self.first_set(*parser)
                }
            }
            ParserNode::Repeat { parser, .. }
            | ParserNode::Optional(parser)
            | ParserNode::Try(parser)
            | ParserNode::Lookahead { parser, .. }
            | ParserNode::Map(parser, _)
            | ParserNode::TryMap(parser, _)
            | ParserNode::MapErr(parser, _)
            | ParserNode::StateAfter(parser, _)
            | ParserNode::Slice(parser)
            | ParserNode::LeftRecur { body: parser, .. } => self.first_set(*parser),
            _ => vec![id],
        }
    }
}
