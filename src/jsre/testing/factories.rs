//! Node constructors for expected trees. Every range is `0..0`.

use crate::jsre::ast::*;

pub fn ch(c: char) -> Node {
    code_point(c as u32)
}

pub fn code_point(value: u32) -> Node {
    Node::Char(Char::new(value, 0..0))
}

pub fn dot() -> Node {
    Node::Dot(Dot { range: 0..0 })
}

/// A list of the chars of `text`
pub fn text(text: &str) -> Node {
    list(text.chars().map(ch).collect())
}

pub fn list(body: Vec<Node>) -> Node {
    Node::List(List { body, range: 0..0 })
}

pub fn empty() -> Node {
    list(Vec::new())
}

pub fn disjunction(body: Vec<Node>) -> Node {
    Node::Disjunction(Disjunction { body, range: 0..0 })
}

pub fn class_escape(class: BaseClass) -> Node {
    Node::ClassEscape(ClassEscape { class, range: 0..0 })
}

pub fn property(name: &str, value: Option<&str>, invert: bool) -> Node {
    Node::PropertyEscape(PropertyEscape {
        property: UnicodeProperty {
            name: name.to_string(),
            value: value.map(str::to_string),
        },
        invert,
        range: 0..0,
    })
}

pub fn char_range(begin: char, end: char) -> Node {
    Node::CharRange(CharRange {
        begin: Char::new(begin as u32, 0..0),
        end: Char::new(end as u32, 0..0),
        range: 0..0,
    })
}

pub fn char_class(invert: bool, body: Vec<Node>) -> Node {
    Node::CharClass(CharClass {
        invert,
        body,
        range: 0..0,
    })
}

pub fn backref(index: u32) -> Node {
    Node::Backref(Backref {
        target: BackrefTarget::Index(index),
        range: 0..0,
    })
}

pub fn named_backref(name: &str) -> Node {
    Node::Backref(Backref {
        target: BackrefTarget::Name(name.to_string()),
        range: 0..0,
    })
}

pub fn assertion(kind: AssertionKind) -> Node {
    Node::BaseAssertion(BaseAssertion { kind, range: 0..0 })
}

pub fn lookaround(look: Lookaround, body: Node) -> Node {
    Node::GroupAssertion(GroupAssertion {
        look,
        body: Box::new(body),
        range: 0..0,
    })
}

pub fn group(behavior: GroupBehavior, body: Node) -> Node {
    Node::Group(Group {
        behavior,
        body: Box::new(body),
        range: 0..0,
    })
}

pub fn capturing(index: u32, body: Node) -> Node {
    group(GroupBehavior::Capturing { index, name: None }, body)
}

pub fn named(index: u32, name: &str, body: Node) -> Node {
    group(
        GroupBehavior::Capturing {
            index,
            name: Some(name.to_string()),
        },
        body,
    )
}

pub fn non_capturing(body: Node) -> Node {
    group(GroupBehavior::NonCapturing, body)
}

pub fn quantifier(min: u32, max: Option<u32>, greedy: bool) -> Quantifier {
    Quantifier {
        min,
        max,
        greedy,
        range: 0..0,
    }
}

pub fn repeat(body: Node, quantifier: Quantifier) -> Node {
    Node::Repeat(Repeat {
        body: Box::new(body),
        quantifier,
        range: 0..0,
    })
}

/// `body*`
pub fn star(body: Node) -> Node {
    repeat(body, quantifier(0, None, true))
}
