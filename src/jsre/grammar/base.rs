//! Dialect-agnostic regex rules
//!
//! Rules defined here, by name:
//!
//!     Char, Dot, BaseCharClassEscape, UnicodeCharClassEscape, CharClassEscape,
//!     NullCharEscape, DecimalEscape, UnicodeEscape, IdentifierStart,
//!     IdentifierContinue, IdentifierName, CharEscape, Quantifier, BaseAssertion,
//!     GroupAssertionBehavior, OpenParen, CloseParen, CharClass, CharClassRanges,
//!     CharClassAtom, Disjunction
//!
//! `Disjunction` refers to a `Term` rule that the dialect layer provides.

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{ErrorKind, RegexError};
use super::unicode_property::{self, PropertyRejection};
use super::{code_point, into_code_point, into_node, node, pair, Item, RSpan, RValue, Rules};
use crate::jsre::ast::*;
use crate::jsre::charset::{chars, Charset, ID_CONTINUE, ID_START};
use crate::jsre::parsec::{Scanned, Value};

/// Chars that are never a literal outside a character class
const NON_LITERAL: &str = "$^\\.*+?()[{|";

/// Chars that may follow `\` as an identity escape in unicode mode
pub(crate) const SYNTAX_CHARS: &str = "^$\\.*+?()[]{}|/";

static UNICODE_MODE_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:\\u([Dd][89ABab][0-9A-Fa-f]{2})\\u([Dd][C-Fc-f][0-9A-Fa-f]{2})|\\u\{([0-9A-Fa-f]+)\}|\\u([0-9A-Fa-f]{4}))",
    )
    .expect("unicode escape pattern is valid")
});

static BMP_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\\u([0-9A-Fa-f]{4})").expect("bmp escape pattern is valid"));

pub(crate) fn define_base_rules(g: &mut Rules) {
    g.define_with("Char", |g| {
        g.scan(|input| match input.rest().chars().next() {
            Some(c) if !NON_LITERAL.contains(c) => {
                let range = input.position..input.position + c.len_utf8();
                Scanned::Match(node(Node::Char(Char::new(c as u32, range))), c.len_utf8())
            }
            _ => Scanned::Miss,
        })
    });

    g.define_with("Dot", |g| {
        let dot = g.exact(".");
        g.map(dot, |_, span| {
            node(Node::Dot(Dot {
                range: span.range.clone(),
            }))
        })
    });

    define_class_escapes(g);
    define_char_escapes(g);
    define_identifier(g);
    define_quantifier(g);
    define_assertions(g);
    define_parens(g);
    define_char_class(g);

    g.define_with("Disjunction", |g| {
        let term = g.rule("Term");
        let terms = g.many(term);
        let terms = g.map(terms, |terms, span| {
            let nodes = terms.into_list().into_iter().map(into_node).collect();
            node(to_node_list(nodes, span.range.start))
        });
        let bar = g.exact("|");
        let rest = g.rule("Disjunction");
        let alternative = g.seq(&[bar, rest]);
        let alternative = g.opt(alternative);
        let both = g.seq(&[terms, alternative]);
        g.map(both, |value, span| {
            let (left, alternative) = pair(value);
            let left = into_node(left);
            let Some(right) = alternative.nth(1) else {
                return node(left);
            };
            let body = match into_node(right) {
                Node::Disjunction(right) => {
                    let mut body = Vec::with_capacity(right.body.len() + 1);
                    body.push(left);
                    body.extend(right.body);
                    body
                }
                right => vec![left, right],
            };
            node(Node::Disjunction(Disjunction {
                body,
                range: span.range.clone(),
            }))
        })
    });
}

/// Terms as one node: nothing is the empty list, one term is itself.
fn to_node_list(mut nodes: Vec<Node>, position: usize) -> Node {
    match nodes.len() {
        0 => make_empty_node(position),
        1 => nodes.remove(0),
        _ => {
            let start = nodes[0].range().start;
            let end = nodes[nodes.len() - 1].range().end;
            Node::List(List {
                body: nodes,
                range: start..end,
            })
        }
    }
}

fn define_class_escapes(g: &mut Rules) {
    g.define_with("BaseCharClassEscape", |g| {
        let escape = g.regex(r"\\([dDsSwW])");
        g.map(escape, |m, span| {
            let class = m
                .group(1)
                .and_then(|letter| letter.chars().next())
                .and_then(BaseClass::from_letter)
                .unwrap_or(BaseClass::Digit);
            node(Node::ClassEscape(ClassEscape {
                class,
                range: span.range.clone(),
            }))
        })
    });

    g.define_with("UnicodeCharClassEscape", |g| {
        let escape = g.regex(r"\\([pP])\{([^{}=]*)(?:=([^{}]*))?\}");
        g.try_map(escape, |m, span| {
            let invert = m.group(1) == Some("P");
            let name = m.group(2).unwrap_or_default();
            let value = m.group(3).filter(|value| !value.is_empty());
            let property = match unicode_property::validate(name, value) {
                Ok(property) => property,
                Err(_) if span.state.loose => UnicodeProperty {
                    name: name.to_string(),
                    value: value.map(str::to_string),
                },
                Err(rejection) => {
                    return Err(property_error(rejection, name, span));
                }
            };
            Ok(node(Node::PropertyEscape(PropertyEscape {
                property,
                invert,
                range: span.range.clone(),
            })))
        })
    });

    g.define_with("CharClassEscape", |g| {
        let base = g.rule("BaseCharClassEscape");
        let property = g.rule("UnicodeCharClassEscape");
        g.alt(&[base, property])
    });
}

/// Error range of a rejected `\p{name=value}`: the name, the value, or everything
/// between the braces.
fn property_error(rejection: PropertyRejection, name: &str, span: &RSpan<'_>) -> RegexError {
    let inner = span.range.start + 3..span.range.end - 1;
    let range = match rejection {
        PropertyRejection::EmptyName | PropertyRejection::UnknownLone => inner,
        PropertyRejection::NotValued => inner.start..inner.start + name.len(),
        PropertyRejection::UnknownValue => inner.start + name.len() + 1..inner.end,
    };
    RegexError::new(rejection.kind(), range)
}

/// Value of a legacy octal escape, `\0` and at most two more octal digits. Later
/// digits are literal chars.
fn legacy_octal(digits: &str) -> u32 {
    digits
        .chars()
        .map_while(|c| c.to_digit(8))
        .fold(0, |value, digit| value * 8 + digit)
}

fn define_char_escapes(g: &mut Rules) {
    g.define_with("NullCharEscape", |g| {
        g.scan(|input| {
            let rest = input.rest();
            if rest.starts_with("\\0") && !rest[2..].starts_with(|c: char| c.is_ascii_digit()) {
                let range = input.position..input.position + 2;
                Scanned::Match(node(Node::Char(Char::new(0, range))), 2)
            } else {
                Scanned::Miss
            }
        })
    });

    g.define_with("DecimalEscape", |g| {
        let backref = g.regex(r"\\([1-9][0-9]*)");
        let backref = g.map(backref, |m, span| {
            let index = m
                .group(1)
                .and_then(|digits| digits.parse::<u32>().ok())
                .unwrap_or(u32::MAX);
            node(Node::Backref(Backref {
                target: BackrefTarget::Index(index),
                range: span.range.clone(),
            }))
        });
        let null = g.rule("NullCharEscape");
        let octal = g.regex(r"\\(0[0-7]{0,2})");
        let octal = g.try_map(octal, |m, span| {
            if !span.state.legacy.octal_escape {
                return Err(RegexError::new(ErrorKind::OctEscape, span.range.clone()));
            }
            let value = legacy_octal(m.group(1).unwrap_or_default());
            Ok(node(Node::Char(Char::new(value, span.range.clone()))))
        });
        g.alt(&[backref, null, octal])
    });

    // `\uXXXX`, plus `\u{X...}` and escaped surrogate pairs in unicode mode
    g.define_with("UnicodeEscape", |g| {
        let escape = g.scan(|input| {
            let re = if input.state.flags.unicode {
                &*UNICODE_MODE_ESCAPE
            } else {
                &*BMP_ESCAPE
            };
            match re.captures(input.rest()) {
                Some(caps) => {
                    let groups = caps
                        .iter()
                        .map(|g| g.map(|m| m.as_str().to_string()))
                        .collect();
                    let consumed = caps.get(0).map_or(0, |m| m.end());
                    Scanned::Match(Value::Captures(groups), consumed)
                }
                None => Scanned::Miss,
            }
        });
        g.try_map(escape, |m, span| {
            let hex: Vec<&str> = (1..=4).filter_map(|i| m.group(i)).collect();
            let parsed = match hex.as_slice() {
                [lead, trail] => {
                    let lead = u32::from_str_radix(lead, 16).unwrap_or_default();
                    let trail = u32::from_str_radix(trail, 16).unwrap_or_default();
                    Some(0x10000 + ((lead - 0xD800) << 10) + (trail - 0xDC00))
                }
                [single] => u32::from_str_radix(single, 16).ok(),
                _ => None,
            };
            match parsed {
                Some(value) if value <= crate::jsre::charset::MAX_CODE_POINT => Ok(code_point(value)),
                _ => Err(RegexError::new(ErrorKind::UnicodeEscape, span.range.clone())),
            }
        })
    });

    g.define_with("CharEscape", |g| {
        let control = g.regex(r"\\([fnrtv])");
        let control = g.map(control, |m, _| {
            code_point(match m.group(1) {
                Some("f") => 0x0C,
                Some("n") => 0x0A,
                Some("r") => 0x0D,
                Some("t") => 0x09,
                _ => 0x0B,
            })
        });
        let control_letter = g.regex(r"\\c([A-Za-z])");
        let control_letter = g.map(control_letter, |m, _| {
            code_point(m.group(1).and_then(|s| s.chars().next()).map_or(0, chars::ctrl))
        });
        let hex = g.regex(r"\\x([0-9A-Fa-f]{2})");
        let hex = g.map(hex, |m, _| {
            code_point(
                m.group(1)
                    .and_then(|digits| u32::from_str_radix(digits, 16).ok())
                    .unwrap_or_default(),
            )
        });
        let unicode = g.rule("UnicodeEscape");
        let identity = g.regex(r"(?s)\\(.)");
        let identity = g.try_map(identity, |m, span| {
            let c = m.group(1).and_then(|s| s.chars().next()).unwrap_or('\\');
            let state = span.state;
            if state.flags.unicode && !state.legacy.identity_escape && !SYNTAX_CHARS.contains(c) {
                return Err(RegexError::new(ErrorKind::IdentityEscape, span.range.clone()));
            }
            Ok(code_point(c as u32))
        });
        let escape = g.alt(&[control, control_letter, hex, unicode, identity]);
        g.map(escape, |value, span| {
            node(Node::Char(Char::new(into_code_point(value), span.range.clone())))
        })
    });
}

/// An escaped identifier char must belong to the same set as a literal one.
fn identifier_escape(value: RValue, set: &Charset, span: &RSpan<'_>) -> Result<RValue, RegexError> {
    let cp = into_code_point(value);
    if set.include_code_point(cp) {
        Ok(code_point(cp))
    } else {
        Err(RegexError::new(ErrorKind::UnicodeIDEscape, span.range.clone()))
    }
}

fn define_identifier(g: &mut Rules) {
    g.define_with("IdentifierStart", |g| {
        let literal = g.charset(ID_START.clone());
        let literal = g.map(literal, |value, _| code_point(into_code_point(value)));
        let escaped = g.rule("UnicodeEscape");
        let escaped = g.try_map(escaped, |value, span| identifier_escape(value, &ID_START, span));
        g.alt(&[literal, escaped])
    });

    g.define_with("IdentifierContinue", |g| {
        let literal = g.charset(ID_CONTINUE.clone());
        let literal = g.map(literal, |value, _| code_point(into_code_point(value)));
        let escaped = g.rule("UnicodeEscape");
        let escaped =
            g.try_map(escaped, |value, span| identifier_escape(value, &ID_CONTINUE, span));
        g.alt(&[literal, escaped])
    });

    g.define_with("IdentifierName", |g| {
        let start = g.rule("IdentifierStart");
        let more = g.rule("IdentifierContinue");
        let more = g.many(more);
        let name = g.seq(&[start, more]);
        g.map(name, |value, _| {
            let (start, more) = pair(value);
            let name = std::iter::once(start)
                .chain(more.into_list())
                .filter_map(|cp| char::from_u32(into_code_point(cp)))
                .collect();
            Value::Item(Item::Name(name))
        })
    });
}

fn parse_count(digits: Option<&str>) -> u32 {
    digits.map_or(0, |digits| digits.parse().unwrap_or(u32::MAX))
}

fn define_quantifier(g: &mut Rules) {
    g.define_with("Quantifier", |g| {
        let quantifier = g.regex(r"(?:\{([0-9]+)(,([0-9]+)?)?\}|([*+?]))\??");
        g.try_map(quantifier, |m, span| {
            let text = span.text();
            let greedy = !(text.len() > 1 && text.ends_with('?'));
            let (min, max) = match m.group(4) {
                Some("?") => (0, Some(1)),
                Some("+") => (1, None),
                Some(_) => (0, None),
                None => {
                    let min = parse_count(m.group(1));
                    let max = match (m.group(2), m.group(3)) {
                        (None, _) => Some(min),
                        (Some(_), None) => None,
                        (Some(_), max) => Some(parse_count(max)),
                    };
                    (min, max)
                }
            };
            if max.is_some_and(|max| min > max) && !span.state.loose {
                return Err(RegexError::new(
                    ErrorKind::QuantifierOutOfOrder,
                    span.range.clone(),
                ));
            }
            Ok(Value::Item(Item::Quantifier(Quantifier {
                min,
                max,
                greedy,
                range: span.range.clone(),
            })))
        })
    });
}

fn define_assertions(g: &mut Rules) {
    g.define_with("BaseAssertion", |g| {
        let assertion = g.regex(r"\^|\$|\\b|\\B");
        g.map(assertion, |m, span| {
            let kind = match m.as_text() {
                Some("^") => AssertionKind::Begin,
                Some("$") => AssertionKind::End,
                Some("\\b") => AssertionKind::WordBoundary,
                _ => AssertionKind::NonWordBoundary,
            };
            node(Node::BaseAssertion(BaseAssertion {
                kind,
                range: span.range.clone(),
            }))
        })
    });

    g.define_with("GroupAssertionBehavior", |g| {
        let prefixes: Vec<_> = Lookaround::ALL
            .iter()
            .map(|&look| {
                let prefix = g.exact(&format!("({}", look.prefix()));
                g.map(prefix, move |_, _| Value::Item(Item::Look(look)))
            })
            .collect();
        let behavior = g.alt(&prefixes);
        let behavior = g.try_map(behavior, check_nesting);
        g.state_after(behavior, |state, range| state.open_pairs.push(range.start))
    });
}

/// Open parentheses allowed at once. Deeper patterns are rejected before their tree
/// is built.
pub const MAX_NESTING: usize = 1000;

fn check_nesting(value: RValue, span: &RSpan<'_>) -> Result<RValue, RegexError> {
    if span.state.open_pairs.len() >= MAX_NESTING {
        return Err(RegexError::new(ErrorKind::NestingTooDeep, span.range.clone()));
    }
    Ok(value)
}

fn define_parens(g: &mut Rules) {
    g.define_with("OpenParen", |g| {
        let paren = g.exact("(");
        let paren = g.try_map(paren, check_nesting);
        g.state_after(paren, |state, range| state.open_pairs.push(range.start))
    });

    // `)`, or the end of input which reports the innermost unclosed parenthesis
    g.define_with("CloseParen", |g| {
        let paren = g.exact(")");
        let end = g.eof();
        let close = g.alt(&[paren, end]);
        let close = g.try_map(close, |value, span| {
            if value.is_unit() {
                let open = span.state.open_pairs.last().copied();
                let position = open.unwrap_or(span.range.start);
                return Err(RegexError::at(ErrorKind::ParenMismatch, position));
            }
            Ok(value)
        });
        g.state_after(close, |state, _| {
            state.open_pairs.pop();
        })
    });
}

fn define_char_class(g: &mut Rules) {
    g.define_with("CharClass", |g| {
        let caret = g.exact("^");
        let invert = g.opt(caret);
        let ranges = g.rule("CharClassRanges");
        let body = g.seq(&[invert, ranges]);
        let class = g.between(body, "[", "]");
        g.map(class, |value, span| {
            let (invert, ranges) = pair(value);
            node(Node::CharClass(CharClass {
                invert: !invert.is_unit(),
                body: ranges.into_list().into_iter().map(into_node).collect(),
                range: span.range.clone(),
            }))
        })
    });

    g.define_with("CharClassAtom", |g| {
        let atom = g.scan(|input| {
            let rest = input.rest();
            let (value, len) = match rest.strip_prefix('\\') {
                Some(tail) => match tail.chars().next() {
                    Some('b') => (0x08, 2),
                    Some('-') => ('-' as u32, 2),
                    Some('0') => (0, 2),
                    Some('B') => ('B' as u32, 2),
                    _ => return Scanned::Miss,
                },
                None => match rest.chars().next() {
                    Some(c) if c != ']' => (c as u32, c.len_utf8()),
                    _ => return Scanned::Miss,
                },
            };
            let range = input.position..input.position + len;
            Scanned::Match(node(Node::Char(Char::new(value, range))), len)
        });
        let atom = g.try_map(atom, |value, span| {
            if span.text() == "\\B" && !span.state.loose {
                return Err(RegexError::new(ErrorKind::CharClassEscapeB, span.range.clone()));
            }
            Ok(value)
        });
        let class_escape = g.rule("CharClassEscape");
        let char_escape = g.rule("CharEscape");
        g.alt(&[atom, class_escape, char_escape])
    });

    g.define_with("CharClassRanges", |g| {
        let atom = g.rule("CharClassAtom");
        let atoms = g.many(atom);
        g.try_map(atoms, |atoms, span| {
            let atoms = atoms.into_list().into_iter().map(into_node).collect();
            let ranges = assemble_ranges(atoms, span)?;
            Ok(Value::List(ranges.into_iter().map(node).collect()))
        })
    });
}

/// Combine class atoms into ranges, looking back one item to decide whether an
/// unescaped `-` is literal or the range operator.
///
/// A `-` is literal at the start (`[-a]`), right after a completed range
/// (`[a-c-f]`), and at the end.
fn assemble_ranges(atoms: Vec<Node>, span: &RSpan<'_>) -> Result<Vec<Node>, RegexError> {
    let state = span.state;
    let mut stack: Vec<Node> = Vec::with_capacity(atoms.len());
    let mut prev_hyphen = false;
    for atom in atoms {
        let hyphen = matches!(&atom, Node::Char(c) if &span.input[c.range.clone()] == "-");
        let begin_is_range = stack.len() >= 2 && matches!(stack[stack.len() - 2], Node::CharRange(_));
        if !prev_hyphen || stack.len() == 1 || begin_is_range {
            prev_hyphen = hyphen;
            stack.push(atom);
            continue;
        }
        prev_hyphen = hyphen;
        let begin = &stack[stack.len() - 2];

        if begin.is_class_escape() || atom.is_class_escape() {
            if state.legacy.char_class_escape_in_char_range {
                stack.push(atom);
                continue;
            }
            let escape = if begin.is_class_escape() { begin } else { &atom };
            return Err(RegexError::new(
                ErrorKind::CharClassEscapeInRange,
                escape.range().clone(),
            ));
        }

        let (Node::Char(begin), Node::Char(end)) = (begin, &atom) else {
            stack.push(atom);
            continue;
        };
        if begin.value > end.value {
            if state.loose {
                stack.push(atom);
                continue;
            }
            return Err(RegexError::new(
                ErrorKind::CharRangeOutOfOrder,
                begin.range.start..end.range.end,
            ));
        }

        let Node::Char(end) = atom else {
            continue;
        };
        stack.pop();
        let Some(Node::Char(begin)) = stack.pop() else {
            continue;
        };
        let range = begin.range.start..end.range.end;
        stack.push(Node::CharRange(CharRange { begin, end, range }));
    }
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_octal() {
        assert_eq!(legacy_octal("012"), 0o12);
        assert_eq!(legacy_octal("08"), 0);
        assert_eq!(legacy_octal("0129"), 0o12);
    }

    #[test]
    fn test_to_node_list() {
        assert!(to_node_list(Vec::new(), 4).is_empty_node());
        let single = Node::Dot(Dot { range: 1..2 });
        assert_eq!(to_node_list(vec![single.clone()], 1), single);
        let list = to_node_list(vec![single, Node::Dot(Dot { range: 2..3 })], 1);
        assert_eq!(list.range(), &(1..3));
    }
}
