//! Syntax tree node types
//!
//! Every node carries the half-open byte range of the source text it was parsed from.
//! Character values are code points (`u32`) rather than `char` because a pattern may
//! spell lone surrogates such as `\uD800`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Char {
    pub value: u32,
    pub range: Range<usize>,
}

impl Char {
    pub fn new(value: u32, range: Range<usize>) -> Self {
        Char { value, range }
    }

    /// The value as a Rust `char`, `None` for surrogates
    pub fn as_char(&self) -> Option<char> {
        char::from_u32(self.value)
    }
}

/// `.`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dot {
    pub range: Range<usize>,
}

/// The six classes spelled `\d \D \w \W \s \S`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseClass {
    Digit,
    NonDigit,
    Word,
    NonWord,
    Space,
    NonSpace,
}

impl BaseClass {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'd' => Some(BaseClass::Digit),
            'D' => Some(BaseClass::NonDigit),
            'w' => Some(BaseClass::Word),
            'W' => Some(BaseClass::NonWord),
            's' => Some(BaseClass::Space),
            'S' => Some(BaseClass::NonSpace),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            BaseClass::Digit => 'd',
            BaseClass::NonDigit => 'D',
            BaseClass::Word => 'w',
            BaseClass::NonWord => 'W',
            BaseClass::Space => 's',
            BaseClass::NonSpace => 'S',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEscape {
    pub class: BaseClass,
    pub range: Range<usize>,
}

/// A resolved Unicode property: a binary property (`value` is `None`) or a
/// name/value pair such as `General_Category=Letter`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnicodeProperty {
    pub name: String,
    pub value: Option<String>,
}

/// `\p{...}` or `\P{...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEscape {
    pub property: UnicodeProperty,
    pub invert: bool,
    pub range: Range<usize>,
}

/// `[...]`. The body holds `Char`, `CharRange`, `ClassEscape` and `PropertyEscape` nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharClass {
    pub invert: bool,
    pub body: Vec<Node>,
    pub range: Range<usize>,
}

/// `a-z` inside a character class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharRange {
    pub begin: Char,
    pub end: Char,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackrefTarget {
    Index(u32),
    Name(String),
}

/// `\1` or `\k<name>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backref {
    pub target: BackrefTarget,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssertionKind {
    /// `^`
    Begin,
    /// `$`
    End,
    /// `\b`
    WordBoundary,
    /// `\B`
    NonWordBoundary,
}

impl AssertionKind {
    pub fn source(self) -> &'static str {
        match self {
            AssertionKind::Begin => "^",
            AssertionKind::End => "$",
            AssertionKind::WordBoundary => "\\b",
            AssertionKind::NonWordBoundary => "\\B",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAssertion {
    pub kind: AssertionKind,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookDirection {
    Ahead,
    Behind,
}

/// The prefix of a lookaround group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lookaround {
    pub direction: LookDirection,
    pub negative: bool,
}

impl Lookaround {
    pub const ALL: [Lookaround; 4] = [
        Lookaround::new(LookDirection::Ahead, false),
        Lookaround::new(LookDirection::Ahead, true),
        Lookaround::new(LookDirection::Behind, false),
        Lookaround::new(LookDirection::Behind, true),
    ];

    pub const fn new(direction: LookDirection, negative: bool) -> Self {
        Lookaround {
            direction,
            negative,
        }
    }

    /// The text after `(`, e.g. `?<!`
    pub fn prefix(self) -> &'static str {
        match (self.direction, self.negative) {
            (LookDirection::Ahead, false) => "?=",
            (LookDirection::Ahead, true) => "?!",
            (LookDirection::Behind, false) => "?<=",
            (LookDirection::Behind, true) => "?<!",
        }
    }
}

/// `(?=...)`, `(?!...)`, `(?<=...)` or `(?<!...)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAssertion {
    pub look: Lookaround,
    pub body: Box<Node>,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupBehavior {
    NonCapturing,
    /// `index` is 1-based and assigned left to right by opening parenthesis
    Capturing { index: u32, name: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub behavior: GroupBehavior,
    pub body: Box<Node>,
    pub range: Range<usize>,
}

/// `*`, `+`, `?`, `{m}`, `{m,}` or `{m,n}`, optionally followed by `?` for a lazy match.
/// `max` is `None` when unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantifier {
    pub min: u32,
    pub max: Option<u32>,
    pub greedy: bool,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    pub body: Box<Node>,
    pub quantifier: Quantifier,
    pub range: Range<usize>,
}

/// A sequence of terms. Never holds exactly one node; an empty list is the empty pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub body: Vec<Node>,
    pub range: Range<usize>,
}

/// `a|b|c`, always flat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disjunction {
    pub body: Vec<Node>,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Char(Char),
    Dot(Dot),
    ClassEscape(ClassEscape),
    PropertyEscape(PropertyEscape),
    CharClass(CharClass),
    CharRange(CharRange),
    Backref(Backref),
    BaseAssertion(BaseAssertion),
    GroupAssertion(GroupAssertion),
    Group(Group),
    Repeat(Repeat),
    List(List),
    Disjunction(Disjunction),
}

impl Node {
    pub fn range(&self) -> &Range<usize> {
        match self {
            Node::Char(n) => &n.range,
            Node::Dot(n) => &n.range,
            Node::ClassEscape(n) => &n.range,
            Node::PropertyEscape(n) => &n.range,
            Node::CharClass(n) => &n.range,
            Node::CharRange(n) => &n.range,
            Node::Backref(n) => &n.range,
            Node::BaseAssertion(n) => &n.range,
            Node::GroupAssertion(n) => &n.range,
            Node::Group(n) => &n.range,
            Node::Repeat(n) => &n.range,
            Node::List(n) => &n.range,
            Node::Disjunction(n) => &n.range,
        }
    }

    pub fn range_mut(&mut self) -> &mut Range<usize> {
        match self {
            Node::Char(n) => &mut n.range,
            Node::Dot(n) => &mut n.range,
            Node::ClassEscape(n) => &mut n.range,
            Node::PropertyEscape(n) => &mut n.range,
            Node::CharClass(n) => &mut n.range,
            Node::CharRange(n) => &mut n.range,
            Node::Backref(n) => &mut n.range,
            Node::BaseAssertion(n) => &mut n.range,
            Node::GroupAssertion(n) => &mut n.range,
            Node::Group(n) => &mut n.range,
            Node::Repeat(n) => &mut n.range,
            Node::List(n) => &mut n.range,
            Node::Disjunction(n) => &mut n.range,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Char(_) => "Char",
            Node::Dot(_) => "Dot",
            Node::ClassEscape(_) => "ClassEscape",
            Node::PropertyEscape(_) => "PropertyEscape",
            Node::CharClass(_) => "CharClass",
            Node::CharRange(_) => "CharRange",
            Node::Backref(_) => "Backref",
            Node::BaseAssertion(_) => "BaseAssertion",
            Node::GroupAssertion(_) => "GroupAssertion",
            Node::Group(_) => "Group",
            Node::Repeat(_) => "Repeat",
            Node::List(_) => "List",
            Node::Disjunction(_) => "Disjunction",
        }
    }

    /// Whether the node kind has children
    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            Node::GroupAssertion(_)
                | Node::Group(_)
                | Node::Repeat(_)
                | Node::List(_)
                | Node::Disjunction(_)
                | Node::CharClass(_)
                | Node::CharRange(_)
        )
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, Node::BaseAssertion(_) | Node::GroupAssertion(_))
    }

    /// The empty pattern
    pub fn is_empty_node(&self) -> bool {
        matches!(self, Node::List(list) if list.body.is_empty())
    }

    /// Class escapes (`\d`, `\p{...}`) that may appear in a character class
    pub fn is_class_escape(&self) -> bool {
        matches!(self, Node::ClassEscape(_) | Node::PropertyEscape(_))
    }

    /// Direct child nodes. `CharRange` endpoints and `Repeat` quantifiers are typed
    /// fields, not nodes, and are not included.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::CharClass(n) => n.body.iter().collect(),
            Node::List(n) => n.body.iter().collect(),
            Node::Disjunction(n) => n.body.iter().collect(),
            Node::GroupAssertion(n) => vec![&n.body],
            Node::Group(n) => vec![&n.body],
            Node::Repeat(n) => vec![&n.body],
            _ => Vec::new(),
        }
    }
}

/// An empty list at `position`
pub fn make_empty_node(position: usize) -> Node {
    Node::List(List {
        body: Vec::new(),
        range: position..position,
    })
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}, {})",
            self.kind_name(),
            self.range().start,
            self.range().end
        )
    }
}
