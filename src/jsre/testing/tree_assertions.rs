//! Fluent assertions over tree nodes

use std::ops::Range;

use crate::jsre::ast::*;

pub struct NodeAssertion<'a> {
    pub(crate) node: &'a Node,
    pub(crate) context: String,
}

/// Start asserting on a tree
pub fn assert_tree(node: &Node) -> NodeAssertion<'_> {
    NodeAssertion {
        node,
        context: "tree".to_string(),
    }
}

impl<'a> NodeAssertion<'a> {
    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn kind(self, expected: &str) -> Self {
        assert_eq!(
            self.node.kind_name(),
            expected,
            "{}: Expected {} node, found {}",
            self.context,
            expected,
            self.node
        );
        self
    }

    pub fn range(self, expected: Range<usize>) -> Self {
        assert_eq!(
            self.node.range(),
            &expected,
            "{}: Expected range {:?}",
            self.context,
            expected
        );
        self
    }

    pub fn char(self, expected: char) -> Self {
        self.code_point(expected as u32)
    }

    pub fn code_point(self, expected: u32) -> Self {
        match self.node {
            Node::Char(c) => assert_eq!(
                c.value, expected,
                "{}: Expected char U+{:04X}, found U+{:04X}",
                self.context, expected, c.value
            ),
            other => panic!("{}: Expected Char node, found {}", self.context, other),
        }
        self
    }

    pub fn dot(self) -> Self {
        self.kind("Dot")
    }

    pub fn list(self) -> Self {
        self.kind("List")
    }

    /// The empty pattern
    pub fn empty(self) -> Self {
        assert!(
            self.node.is_empty_node(),
            "{}: Expected empty list, found {}",
            self.context,
            self.node
        );
        self
    }

    pub fn disjunction(self) -> Self {
        self.kind("Disjunction")
    }

    pub fn char_class(self, invert: bool) -> Self {
        match self.node {
            Node::CharClass(class) => assert_eq!(
                class.invert, invert,
                "{}: Expected char class with invert = {}",
                self.context, invert
            ),
            other => panic!("{}: Expected CharClass node, found {}", self.context, other),
        }
        self
    }

    pub fn char_range(self, begin: char, end: char) -> Self {
        match self.node {
            Node::CharRange(range) => assert_eq!(
                (range.begin.value, range.end.value),
                (begin as u32, end as u32),
                "{}: Expected range {}-{}",
                self.context,
                begin,
                end
            ),
            other => panic!("{}: Expected CharRange node, found {}", self.context, other),
        }
        self
    }

    pub fn class_escape(self, letter: char) -> Self {
        match self.node {
            Node::ClassEscape(escape) => assert_eq!(
                escape.class.letter(),
                letter,
                "{}: Expected \\{}",
                self.context,
                letter
            ),
            other => panic!("{}: Expected ClassEscape node, found {}", self.context, other),
        }
        self
    }

    pub fn property(self, name: &str, value: Option<&str>) -> Self {
        match self.node {
            Node::PropertyEscape(escape) => {
                assert_eq!(escape.property.name, name, "{}: property name", self.context);
                assert_eq!(
                    escape.property.value.as_deref(),
                    value,
                    "{}: property value",
                    self.context
                );
            }
            other => panic!(
                "{}: Expected PropertyEscape node, found {}",
                self.context, other
            ),
        }
        self
    }

    pub fn backref(self, expected: BackrefTarget) -> Self {
        match self.node {
            Node::Backref(backref) => assert_eq!(
                backref.target, expected,
                "{}: Expected backreference {:?}",
                self.context, expected
            ),
            other => panic!("{}: Expected Backref node, found {}", self.context, other),
        }
        self
    }

    pub fn assertion(self, expected: AssertionKind) -> Self {
        match self.node {
            Node::BaseAssertion(assertion) => assert_eq!(
                assertion.kind, expected,
                "{}: Expected assertion {:?}",
                self.context, expected
            ),
            other => panic!(
                "{}: Expected BaseAssertion node, found {}",
                self.context, other
            ),
        }
        self
    }

    /// A lookaround group with the given prefix, e.g. `?<!`
    pub fn lookaround(self, prefix: &str) -> Self {
        match self.node {
            Node::GroupAssertion(assertion) => assert_eq!(
                assertion.look.prefix(),
                prefix,
                "{}: Expected lookaround ({}",
                self.context,
                prefix
            ),
            other => panic!(
                "{}: Expected GroupAssertion node, found {}",
                self.context, other
            ),
        }
        self
    }

    fn behavior(self, expected: GroupBehavior) -> Self {
        match self.node {
            Node::Group(group) => assert_eq!(
                group.behavior, expected,
                "{}: Expected group behavior {:?}",
                self.context, expected
            ),
            other => panic!("{}: Expected Group node, found {}", self.context, other),
        }
        self
    }

    pub fn capturing(self, index: u32) -> Self {
        self.behavior(GroupBehavior::Capturing { index, name: None })
    }

    pub fn named(self, index: u32, name: &str) -> Self {
        self.behavior(GroupBehavior::Capturing {
            index,
            name: Some(name.to_string()),
        })
    }

    pub fn non_capturing(self) -> Self {
        self.behavior(GroupBehavior::NonCapturing)
    }

    pub fn repeat(self, min: u32, max: Option<u32>, greedy: bool) -> Self {
        match self.node {
            Node::Repeat(repeat) => {
                let q = &repeat.quantifier;
                assert_eq!(
                    (q.min, q.max, q.greedy),
                    (min, max, greedy),
                    "{}: Expected quantifier (min, max, greedy)",
                    self.context
                );
            }
            other => panic!("{}: Expected Repeat node, found {}", self.context, other),
        }
        self
    }

    /// Number of direct children
    pub fn count(self, expected: usize) -> Self {
        let actual = self.node.children().len();
        assert_eq!(
            actual, expected,
            "{}: Expected {} children, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> NodeAssertion<'a>,
    {
        let children = self.node.children();
        assert!(
            index < children.len(),
            "{}: Child index {} out of bounds ({} has {} children)",
            self.context,
            index,
            self.node,
            children.len()
        );
        assertion(NodeAssertion {
            node: children[index],
            context: format!("{}.body[{}]", self.context, index),
        });
        self
    }

    /// The single child of a group, lookaround or repeat
    pub fn body<F>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> NodeAssertion<'a>,
    {
        let body = match self.node {
            Node::Group(group) => &group.body,
            Node::GroupAssertion(look) => &look.body,
            Node::Repeat(repeat) => &repeat.body,
            other => panic!("{}: {} has no single body", self.context, other),
        };
        assertion(NodeAssertion {
            node: body,
            context: format!("{}.body", self.context),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsre::testing::factories::*;

    #[test]
    fn test_fluent_chain() {
        let tree = list(vec![ch('a'), capturing(1, disjunction(vec![ch('b'), ch('c')]))]);
        assert_tree(&tree)
            .list()
            .count(2)
            .child(0, |c| c.char('a'))
            .child(1, |c| c.capturing(1).body(|b| b.disjunction().count(2)));
    }

    #[test]
    #[should_panic(expected = "tree.body[0]: Expected char")]
    fn test_failure_names_path() {
        let tree = list(vec![ch('a'), ch('b')]);
        assert_tree(&tree).child(0, |c| c.char('z'));
    }
}
