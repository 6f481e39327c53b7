//! The JavaScript regex dialect: entry rules, parse and lex

use log::{debug, trace};
use once_cell::sync::Lazy;
use serde::Serialize;

use super::base::define_base_rules;
use super::check::check;
use super::error::{ErrorKind, RegexError};
use super::options::ParseOptions;
use super::source::to_source_with;
use super::state::GrammarState;
use super::token::{LexemeKind, Token};
use super::{into_node, node, pair, triple, try_into_node, Item, RValue, RegexLanguage, Rules};
use crate::jsre::ast::*;
use crate::jsre::parsec::{Grammar, ParserId, Value};

/// The built grammar and its two entry points
struct Dialect {
    grammar: Grammar<RegexLanguage>,
    main: ParserId,
    lexer: ParserId,
}

static DIALECT: Lazy<Dialect> = Lazy::new(|| {
    let mut g = Rules::new();
    define_base_rules(&mut g);
    define_dialect_rules(&mut g);
    let grammar = g.build().expect("regex grammar is well formed");
    let main = grammar.rule_id("Main").expect("Main rule is defined");
    let lexer = grammar.rule_id("Lexer").expect("Lexer rule is defined");
    debug!(
        "regex dialect ready: {} rules",
        grammar.rule_names().count()
    );
    Dialect {
        grammar,
        main,
        lexer,
    }
});

fn define_dialect_rules(g: &mut Rules) {
    g.define_with("Main", |g| g.rule("Disjunction"));

    // An assertion may not carry a quantifier; a quantifier on its own repeats nothing
    g.define_with("Term", |g| {
        let assertion = g.rule("Assertion");
        let quantifier = g.rule("Quantifier");
        let trailing = g.opt(quantifier);
        let assertion = g.seq(&[assertion, trailing]);
        let assertion = g.try_map(assertion, |value, _| {
            let (assertion, quantifier) = pair(value);
            match quantifier.into_item() {
                Some(Item::Quantifier(quantifier)) => {
                    Err(RegexError::new(ErrorKind::NothingToRepeat, quantifier.range))
                }
                _ => Ok(assertion),
            }
        });
        let repeat = g.rule("Repeat");
        let lone = g.rule("Quantifier");
        let lone = g.try_map(lone, |_, span| {
            Err(RegexError::new(ErrorKind::NothingToRepeat, span.range.clone()))
        });
        g.alt(&[assertion, repeat, lone])
    });

    g.define_with("Repeat", |g| {
        let atom = g.rule("Atom");
        let quantifier = g.rule("Quantifier");
        let quantifier = g.opt(quantifier);
        let repeat = g.seq(&[atom, quantifier]);
        g.map(repeat, |value, span| {
            let (atom, quantifier) = pair(value);
            match quantifier.into_item() {
                Some(Item::Quantifier(quantifier)) => node(Node::Repeat(Repeat {
                    body: Box::new(into_node(atom)),
                    quantifier,
                    range: span.range.clone(),
                })),
                _ => atom,
            }
        })
    });

    g.define_with("Assertion", |g| {
        let base = g.rule("BaseAssertion");
        let look = g.rule("GroupAssertionBehavior");
        let body = g.rule("Main");
        let close = g.rule("CloseParen");
        let group = g.seq(&[look, body, close]);
        let group = g.try_map(group, |value, span| {
            let (look, body, _) = triple(value);
            let look = look.into_item();
            debug_assert!(
                matches!(look, Some(Item::Look(_))),
                "lookaround prefix rule produces a Look item"
            );
            let Some(Item::Look(look)) = look else {
                return Err(RegexError::at(ErrorKind::SyntaxError, span.range.start));
            };
            Ok(node(Node::GroupAssertion(GroupAssertion {
                look,
                body: Box::new(into_node(body)),
                range: span.range.clone(),
            })))
        });
        g.alt(&[base, group])
    });

    g.define_with("Atom", |g| {
        let atoms = ["Char", "Dot", "AtomEscape", "CharClass", "Group"].map(|name| g.rule(name));
        g.alt(&atoms)
    });

    g.define_with("AtomEscape", |g| {
        let escapes = [
            "DecimalEscape",
            "GroupNameBackref",
            "CharClassEscape",
            "CharEscape",
        ]
        .map(|name| g.rule(name));
        g.alt(&escapes)
    });

    g.define_with("Group", |g| {
        let open = g.rule("OpenParen");
        let behavior = g.rule("GroupBehavior");
        let body = g.rule("Main");
        let close = g.rule("CloseParen");
        let group = g.seq(&[open, behavior, body, close]);
        g.map(group, |value, span| {
            let mut parts = value.into_list().into_iter().skip(1);
            let behavior = match parts.next().and_then(Value::into_item) {
                Some(Item::Behavior(behavior)) => behavior,
                _ => GroupBehavior::NonCapturing,
            };
            let body = parts.next().map_or_else(|| make_empty_node(span.range.start), into_node);
            node(Node::Group(Group {
                behavior,
                body: Box::new(body),
                range: span.range.clone(),
            }))
        })
    });

    g.define_with("GroupBehavior", |g| {
        let non_capturing = g.exact("?:");
        let non_capturing = g.map(non_capturing, |_, _| {
            Value::Item(Item::Behavior(GroupBehavior::NonCapturing))
        });
        let question = g.exact("?");
        let name = g.rule("GroupName");
        let named = g.ignore_then(question, name);
        let capturing = g.opt(named);
        let capturing = g.map(capturing, |value, _| {
            let name = match value.into_item() {
                Some(Item::Name(name)) => Some(name),
                _ => None,
            };
            Value::Item(Item::Behavior(GroupBehavior::Capturing { index: 0, name }))
        });
        g.alt(&[non_capturing, capturing])
    });

    g.define_with("GroupName", |g| {
        let name = g.rule("IdentifierName");
        g.between(name, "<", ">")
    });

    g.define_with("GroupNameBackref", |g| {
        let k = g.exact("\\k");
        let name = g.rule("GroupName");
        let backref = g.ignore_then(k, name);
        g.map(backref, |value, span| {
            let name = match value.into_item() {
                Some(Item::Name(name)) => name,
                _ => String::new(),
            };
            node(Node::Backref(Backref {
                target: BackrefTarget::Name(name),
                range: span.range.clone(),
            }))
        })
    });

    define_lexer(g);
}

fn tokens(tokens: Vec<Token>) -> RValue {
    Value::Item(Item::Tokens(tokens))
}

fn lexeme(g: &mut Rules, parser: ParserId, kind: LexemeKind) -> ParserId {
    g.map(parser, move |_, span| {
        tokens(vec![Token::lexeme(kind, span.range.clone())])
    })
}

/// Tokens of a lexer branch, in source order
fn into_tokens(value: RValue) -> Vec<Token> {
    match value {
        Value::Item(Item::Tokens(tokens)) => tokens,
        Value::Item(Item::Node(node)) => vec![Token::Node(node)],
        Value::Item(Item::Quantifier(quantifier)) => vec![Token::Quantifier(quantifier)],
        Value::List(values) => values.into_iter().flat_map(into_tokens).collect(),
        _ => Vec::new(),
    }
}

/// Flat tokens, one construct at a time, without matching brackets or parentheses
fn define_lexer(g: &mut Rules) {
    g.define_with("Lexer", |g| {
        let bar = g.exact("|");
        let bar = lexeme(g, bar, LexemeKind::VBar);
        let close_bracket = g.exact("]");
        let close_bracket = lexeme(g, close_bracket, LexemeKind::CharClassBracket);
        let close_paren = g.exact(")");
        let close_paren = lexeme(g, close_paren, LexemeKind::Paren);

        let escape = g.rule("AtomEscape");
        let escape = g.attempt(escape);
        let simple = ["Char", "Dot", "BaseAssertion"].map(|name| g.rule(name));
        let simple = g.alt(&[simple[0], simple[1], simple[2], escape]);

        let open_bracket = g.exact("[");
        let open_bracket = lexeme(g, open_bracket, LexemeKind::CharClassBracket);
        let ranges = g.rule("CharClassRanges");
        let class = g.seq(&[open_bracket, ranges]);

        let open_paren = g.exact("(");
        let open_paren = lexeme(g, open_paren, LexemeKind::Paren);
        let looks: Vec<_> = Lookaround::ALL
            .iter()
            .map(|look| g.exact(look.prefix()))
            .collect();
        let look = g.alt(&looks);
        let look = lexeme(g, look, LexemeKind::GroupAssertionBehavior);
        let behavior = g.regex(r"\?(?::|<[^<>]*>)");
        let behavior = g.slice(behavior);
        let behavior = lexeme(g, behavior, LexemeKind::GroupBehavior);
        let prefix = g.alt(&[look, behavior]);
        let prefix = g.opt(prefix);
        let group = g.seq(&[open_paren, prefix]);

        let quantifier = g.rule("Quantifier");
        let quantifier = g.attempt(quantifier);

        let token = g.alt(&[
            bar,
            close_bracket,
            close_paren,
            simple,
            class,
            group,
            quantifier,
        ]);
        let token = g.map(token, |value, _| tokens(into_tokens(value)));
        let all = g.many(token);
        g.map(all, |value, _| tokens(into_tokens(value)))
    });
}

/// A pattern source with its flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    pub source: String,
    pub flags: RegexFlags,
}

impl Pattern {
    /// Pair a source with a flag string. Unknown letters are a [ErrorKind::Flags] error.
    pub fn new(source: impl Into<String>, flags: &str) -> Result<Self, RegexError> {
        Ok(Pattern {
            source: source.into(),
            flags: RegexFlags::parse_strict(flags).map_err(flags_error)?,
        })
    }
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Pattern {
            source: source.to_string(),
            flags: RegexFlags::default(),
        }
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Pattern {
            source,
            flags: RegexFlags::default(),
        }
    }
}

fn flags_error(err: FlagsError) -> RegexError {
    RegexError::at(ErrorKind::Flags, 0).with_detail(err.invalid)
}

/// A successfully parsed and checked pattern
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRegex {
    pub tree: Node,
    /// The consumed source. Shorter than the input only for a partial parse.
    pub source: String,
    pub flags: RegexFlags,
    #[serde(skip)]
    pub groups: GroupsInfo,
}

impl ParsedRegex {
    pub fn to_source(&self) -> String {
        to_source_with(&self.tree, self.flags)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Parse a pattern in strict mode.
///
/// `flags` overrides the flags carried by the pattern. With `partial` set, parsing stops
/// at the first char the grammar cannot use and the result covers the consumed prefix.
pub fn parse(
    pattern: impl Into<Pattern>,
    flags: Option<RegexFlags>,
    partial: bool,
) -> Result<ParsedRegex, RegexError> {
    let pattern = pattern.into();
    let flags = flags.unwrap_or(pattern.flags);
    run(&pattern.source, GrammarState::strict(flags), partial)
}

/// Parse a pattern with the given options. A non-empty `options.flags` replaces the
/// pattern's own flags.
pub fn parse_with(
    pattern: impl Into<Pattern>,
    options: &ParseOptions,
) -> Result<ParsedRegex, RegexError> {
    let pattern = pattern.into();
    let flags = if options.flags.is_empty() {
        pattern.flags
    } else {
        options.regex_flags().map_err(flags_error)?
    };
    run(&pattern.source, options.state(flags), options.partial)
}

fn run(source: &str, state: GrammarState, partial: bool) -> Result<ParsedRegex, RegexError> {
    trace!("parse /{}/{} (partial: {})", source, state.flags, partial);
    let flags = state.flags;
    let dialect = &*DIALECT;
    let outcome = dialect.grammar.parse_with(dialect.main, source, state);
    let value = match outcome.result {
        Ok(value) => value,
        Err(failure) => {
            let error = failure
                .error
                .unwrap_or_else(|| RegexError::at(ErrorKind::SyntaxError, failure.position));
            trace!("parse /{}/ failed: {}", source, error);
            return Err(error);
        }
    };
    if !partial && outcome.consumed != source.len() {
        trace!("parse /{}/ stopped at {}", source, outcome.consumed);
        return Err(RegexError::at(ErrorKind::SyntaxError, outcome.consumed));
    }

    let Some(mut tree) = try_into_node(value) else {
        return Err(RegexError::at(ErrorKind::SyntaxError, 0));
    };
    let groups = check(&mut tree)?;
    Ok(ParsedRegex {
        tree,
        source: source[..outcome.consumed].to_string(),
        flags,
        groups,
    })
}

/// Tokenize a pattern as far as possible, accepting loose and legacy syntax.
/// Never fails: input the lexer cannot handle ends the token list, and a hard error
/// inside a token gives an empty list.
pub fn lex(source: &str, flags: RegexFlags) -> Vec<Token> {
    let dialect = &*DIALECT;
    let outcome = dialect
        .grammar
        .parse_with(dialect.lexer, source, GrammarState::permissive(flags));
    match outcome.result {
        Ok(value) => {
            let tokens = into_tokens(value);
            trace!(
                "lex /{}/: {} tokens over {} of {} bytes",
                source,
                tokens.len(),
                outcome.consumed,
                source.len()
            );
            tokens
        }
        Err(failure) => {
            trace!("lex /{}/ failed at {}", source, failure.position);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unicode() -> Option<RegexFlags> {
        Some(RegexFlags::parse("u"))
    }

    #[test]
    fn test_grammar_builds() {
        let dialect = &*DIALECT;
        assert!(dialect.grammar.rule_id("Term").is_some());
        assert!(!dialect.grammar.is_left_recursive("Main"));
    }

    #[test]
    fn test_single_char() {
        let parsed = parse("a", None, false).unwrap();
        assert_eq!(parsed.tree, Node::Char(Char::new('a' as u32, 0..1)));
        assert_eq!(parsed.source, "a");
    }

    #[test]
    fn test_empty_pattern() {
        let parsed = parse("", None, false).unwrap();
        assert!(parsed.tree.is_empty_node());
    }

    #[test]
    fn test_empty_alternative() {
        let parsed = parse("a|", None, false).unwrap();
        let Node::Disjunction(disjunction) = parsed.tree else {
            panic!("expected a disjunction");
        };
        assert_eq!(disjunction.body.len(), 2);
        assert!(disjunction.body[1].is_empty_node());
        assert_eq!(disjunction.body[1].range(), &(2..2));
    }

    #[test]
    fn test_disjunction_is_flat() {
        let parsed = parse("a|b|c", None, false).unwrap();
        let Node::Disjunction(disjunction) = parsed.tree else {
            panic!("expected a disjunction");
        };
        assert_eq!(disjunction.body.len(), 3);
        assert_eq!(disjunction.range, 0..5);
    }

    #[test]
    fn test_group_range_covers_parens() {
        let parsed = parse("(ab)", None, false).unwrap();
        let Node::Group(group) = parsed.tree else {
            panic!("expected a group");
        };
        assert_eq!(group.range, 0..4);
        assert_eq!(
            group.behavior,
            GroupBehavior::Capturing {
                index: 1,
                name: None
            }
        );
    }

    #[test]
    fn test_named_group() {
        let parsed = parse("(?<year>a)\\k<year>", unicode(), false).unwrap();
        assert_eq!(parsed.groups.count, 1);
        assert!(parsed.groups.names.contains("year"));
    }

    #[test]
    fn test_trailing_paren() {
        let err = parse("a)", None, false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SyntaxError);
        assert_eq!(err.range, 1..1);
    }

    #[test]
    fn test_unclosed_group() {
        let err = parse("a(b", None, false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParenMismatch);
        assert_eq!(err.range.start, 1);
    }

    #[test]
    fn test_partial() {
        let parsed = parse("ab)c", None, true).unwrap();
        assert_eq!(parsed.source, "ab");
    }

    #[test]
    fn test_quantified_assertion() {
        let err = parse("^*", None, false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NothingToRepeat);
        assert_eq!(err.range, 1..2);
    }

    #[test]
    fn test_lone_quantifier() {
        let err = parse("+a", None, false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NothingToRepeat);
    }

    #[test]
    fn test_pattern_flags() {
        let pattern = Pattern::new("\\u{1F600}", "u").unwrap();
        let parsed = parse(pattern, None, false).unwrap();
        assert_eq!(parsed.tree, Node::Char(Char::new(0x1F600, 0..9)));
        assert!(parsed.flags.unicode);
    }

    #[test]
    fn test_invalid_pattern_flags() {
        let err = Pattern::new("a", "gq").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Flags);
        assert_eq!(err.detail.as_deref(), Some("q"));
    }

    #[test]
    fn test_parse_with_loose() {
        let options = ParseOptions::new("u").loose(true);
        assert!(parse_with("[z-a]", &options).is_ok());
        assert!(parse("[z-a]", unicode(), false).is_err());
    }

    #[test]
    fn test_lex_unclosed() {
        let tokens = lex("(a", RegexFlags::default());
        let names: Vec<_> = tokens.iter().map(Token::kind_name).collect();
        assert_eq!(names, vec!["Paren", "Char"]);
    }

    #[test]
    fn test_to_json() {
        let parsed = parse("a", None, false).unwrap();
        let json = parsed.to_json().unwrap();
        assert!(json.contains("\"type\": \"Char\""));
        assert!(!json.contains("groups"));
    }
}
