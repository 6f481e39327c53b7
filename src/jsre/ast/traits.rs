//! Tree traversal
//!
//! [Visitor] walks a tree in document order. For every node it calls the generic
//! [Visitor::enter] hook, then the per-kind `visit_*` method, then descends, then calls
//! the per-kind `leave_*` method (branch kinds only) and [Visitor::leave]. Default
//! implementations are empty, so implement only the methods you need.
//!
//! ```rust,ignore
//! struct CountGroups(usize);
//!
//! impl Visitor for CountGroups {
//!     fn visit_group(&mut self, _group: &Group, _parent: Option<&Node>) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut counter = CountGroups(0);
//! tree.accept(&mut counter);
//! ```

use super::nodes::*;
use crate::jsre::parsec::{RED_ZONE, STACK_SEGMENT};

pub trait Visitor {
    fn enter(&mut self, _node: &Node, _parent: Option<&Node>) {}
    fn leave(&mut self, _node: &Node, _parent: Option<&Node>) {}

    fn visit_char(&mut self, _char: &Char, _parent: Option<&Node>) {}
    fn visit_dot(&mut self, _dot: &Dot, _parent: Option<&Node>) {}
    fn visit_class_escape(&mut self, _escape: &ClassEscape, _parent: Option<&Node>) {}
    fn visit_property_escape(&mut self, _escape: &PropertyEscape, _parent: Option<&Node>) {}
    fn visit_backref(&mut self, _backref: &Backref, _parent: Option<&Node>) {}
    fn visit_base_assertion(&mut self, _assertion: &BaseAssertion, _parent: Option<&Node>) {}
    fn visit_quantifier(&mut self, _quantifier: &Quantifier, _parent: Option<&Node>) {}

    fn visit_char_class(&mut self, _class: &CharClass, _parent: Option<&Node>) {}
    fn leave_char_class(&mut self, _class: &CharClass, _parent: Option<&Node>) {}

    fn visit_char_range(&mut self, _range: &CharRange, _parent: Option<&Node>) {}
    fn leave_char_range(&mut self, _range: &CharRange, _parent: Option<&Node>) {}

    fn visit_group_assertion(&mut self, _assertion: &GroupAssertion, _parent: Option<&Node>) {}
    fn leave_group_assertion(&mut self, _assertion: &GroupAssertion, _parent: Option<&Node>) {}

    fn visit_group(&mut self, _group: &Group, _parent: Option<&Node>) {}
    fn leave_group(&mut self, _group: &Group, _parent: Option<&Node>) {}

    fn visit_repeat(&mut self, _repeat: &Repeat, _parent: Option<&Node>) {}
    fn leave_repeat(&mut self, _repeat: &Repeat, _parent: Option<&Node>) {}

    fn visit_list(&mut self, _list: &List, _parent: Option<&Node>) {}
    fn leave_list(&mut self, _list: &List, _parent: Option<&Node>) {}

    fn visit_disjunction(&mut self, _disjunction: &Disjunction, _parent: Option<&Node>) {}
    fn leave_disjunction(&mut self, _disjunction: &Disjunction, _parent: Option<&Node>) {}
}

/// In-place traversal. `enter` runs before a node's children, `leave` after them.
pub trait VisitorMut {
    fn enter(&mut self, _node: &mut Node) {}
    fn leave(&mut self, _node: &mut Node) {}
    fn visit_quantifier(&mut self, _quantifier: &mut Quantifier) {}
}

impl Node {
    /// Walk this tree with a visitor
    pub fn accept(&self, visitor: &mut dyn Visitor) {
        walk(self, None, visitor);
    }

    pub fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        walk_mut(self, visitor);
    }
}

fn walk(node: &Node, parent: Option<&Node>, visitor: &mut dyn Visitor) {
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || walk_node(node, parent, visitor))
}

fn walk_node(node: &Node, parent: Option<&Node>, visitor: &mut dyn Visitor) {
    visitor.enter(node, parent);
    match node {
        Node::Char(n) => visitor.visit_char(n, parent),
        Node::Dot(n) => visitor.visit_dot(n, parent),
        Node::ClassEscape(n) => visitor.visit_class_escape(n, parent),
        Node::PropertyEscape(n) => visitor.visit_property_escape(n, parent),
        Node::Backref(n) => visitor.visit_backref(n, parent),
        Node::BaseAssertion(n) => visitor.visit_base_assertion(n, parent),
        Node::CharClass(n) => {
            visitor.visit_char_class(n, parent);
            for child in &n.body {
                walk(child, Some(node), visitor);
            }
            visitor.leave_char_class(n, parent);
        }
        Node::CharRange(n) => {
            visitor.visit_char_range(n, parent);
            visitor.visit_char(&n.begin, Some(node));
            visitor.visit_char(&n.end, Some(node));
            visitor.leave_char_range(n, parent);
        }
        Node::GroupAssertion(n) => {
            visitor.visit_group_assertion(n, parent);
            walk(&n.body, Some(node), visitor);
            visitor.leave_group_assertion(n, parent);
        }
        Node::Group(n) => {
            visitor.visit_group(n, parent);
            walk(&n.body, Some(node), visitor);
            visitor.leave_group(n, parent);
        }
        Node::Repeat(n) => {
            visitor.visit_repeat(n, parent);
            walk(&n.body, Some(node), visitor);
            visitor.visit_quantifier(&n.quantifier, Some(node));
            visitor.leave_repeat(n, parent);
        }
        Node::List(n) => {
            visitor.visit_list(n, parent);
            for child in &n.body {
                walk(child, Some(node), visitor);
            }
            visitor.leave_list(n, parent);
        }
        Node::Disjunction(n) => {
            visitor.visit_disjunction(n, parent);
            for child in &n.body {
                walk(child, Some(node), visitor);
            }
            visitor.leave_disjunction(n, parent);
        }
    }
    visitor.leave(node, parent);
}

fn walk_mut(node: &mut Node, visitor: &mut dyn VisitorMut) {
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || walk_node_mut(node, visitor))
}

fn walk_node_mut(node: &mut Node, visitor: &mut dyn VisitorMut) {
    visitor.enter(node);
    match node {
        Node::CharClass(CharClass { body, .. })
        | Node::List(List { body, .. })
        | Node::Disjunction(Disjunction { body, .. }) => {
            for child in body.iter_mut() {
                walk_mut(child, visitor);
            }
        }
        Node::GroupAssertion(GroupAssertion { body, .. }) | Node::Group(Group { body, .. }) => {
            walk_mut(body, visitor)
        }
        Node::Repeat(repeat) => {
            walk_mut(&mut repeat.body, visitor);
            visitor.visit_quantifier(&mut repeat.quantifier);
        }
        _ => {}
    }
    visitor.leave(node);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(c: char, at: usize) -> Node {
        Node::Char(Char::new(c as u32, at..at + 1))
    }

    #[test]
    fn test_visitor_order() {
        // (a)|b*
        let tree = Node::Disjunction(Disjunction {
            body: vec![
                Node::Group(Group {
                    behavior: GroupBehavior::Capturing {
                        index: 1,
                        name: None,
                    },
                    body: Box::new(ch('a', 1)),
                    range: 0..3,
                }),
                Node::Repeat(Repeat {
                    body: Box::new(ch('b', 4)),
                    quantifier: Quantifier {
                        min: 0,
                        max: None,
                        greedy: true,
                        range: 5..6,
                    },
                    range: 4..6,
                }),
            ],
            range: 0..6,
        });

        struct Trace(Vec<String>);

        impl Visitor for Trace {
            fn enter(&mut self, node: &Node, _parent: Option<&Node>) {
                self.0.push(format!("enter {}", node.kind_name()));
            }
            fn visit_char(&mut self, c: &Char, parent: Option<&Node>) {
                let parent = parent.map_or("-", |p| p.kind_name());
                self.0.push(format!("char {} in {}", c.value, parent));
            }
            fn visit_quantifier(&mut self, _q: &Quantifier, _parent: Option<&Node>) {
                self.0.push("quantifier".to_string());
            }
            fn leave_group(&mut self, _group: &Group, _parent: Option<&Node>) {
                self.0.push("leave Group".to_string());
            }
        }

        let mut trace = Trace(Vec::new());
        tree.accept(&mut trace);
        assert_eq!(
            trace.0,
            vec![
                "enter Disjunction",
                "enter Group",
                "enter Char",
                "char 97 in Group",
                "leave Group",
                "enter Repeat",
                "enter Char",
                "char 98 in Repeat",
                "quantifier",
            ]
        );
    }
}
