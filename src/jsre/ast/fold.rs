//! Structure-preserving maps and bottom-up folds

use super::nodes::*;
use crate::jsre::parsec::{RED_ZONE, STACK_SEGMENT};

/// One layer of a tree whose children have already been folded into `R`.
///
/// Leaves borrow their node. Branches borrow their node and carry the folded
/// children in source order. `CharRange` endpoints and `Repeat` quantifiers are folded
/// like children, through the [NodeF::Char] and [NodeF::Quantifier] layers.
#[derive(Debug)]
pub enum NodeF<'a, R> {
    Char(&'a Char),
    Dot(&'a Dot),
    ClassEscape(&'a ClassEscape),
    PropertyEscape(&'a PropertyEscape),
    Backref(&'a Backref),
    BaseAssertion(&'a BaseAssertion),
    Quantifier(&'a Quantifier),
    CharClass { node: &'a CharClass, body: Vec<R> },
    CharRange { node: &'a CharRange, begin: R, end: R },
    GroupAssertion { node: &'a GroupAssertion, body: R },
    Group { node: &'a Group, body: R },
    Repeat { node: &'a Repeat, body: R, quantifier: R },
    List { node: &'a List, body: Vec<R> },
    Disjunction { node: &'a Disjunction, body: Vec<R> },
}

impl Node {
    /// Rebuild this node with `f` applied to each direct child node.
    pub fn map_children(self, mut f: impl FnMut(Node) -> Node) -> Node {
        match self {
            Node::CharClass(mut n) => {
                n.body = n.body.into_iter().map(&mut f).collect();
                Node::CharClass(n)
            }
            Node::List(mut n) => {
                n.body = n.body.into_iter().map(&mut f).collect();
                Node::List(n)
            }
            Node::Disjunction(mut n) => {
                n.body = n.body.into_iter().map(&mut f).collect();
                Node::Disjunction(n)
            }
            Node::GroupAssertion(mut n) => {
                n.body = Box::new(f(*n.body));
                Node::GroupAssertion(n)
            }
            Node::Group(mut n) => {
                n.body = Box::new(f(*n.body));
                Node::Group(n)
            }
            Node::Repeat(mut n) => {
                n.body = Box::new(f(*n.body));
                Node::Repeat(n)
            }
            leaf => leaf,
        }
    }

    /// Rewrite the whole tree bottom-up: children first, then their parent.
    pub fn transform(self, f: &mut impl FnMut(Node) -> Node) -> Node {
        stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || {
            let node = self.map_children(|child| child.transform(f));
            f(node)
        })
    }

    /// Fold the tree bottom-up. `f` receives each layer with its children already
    /// folded, and the node's parent.
    pub fn bottom_up<'a, R>(&'a self, mut f: impl FnMut(NodeF<'a, R>, Option<&'a Node>) -> R) -> R {
        cata(self, None, &mut f)
    }
}

fn cata<'a, R, F>(node: &'a Node, parent: Option<&'a Node>, f: &mut F) -> R
where
    F: FnMut(NodeF<'a, R>, Option<&'a Node>) -> R,
{
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || cata_layer(node, parent, f))
}

fn cata_layer<'a, R, F>(node: &'a Node, parent: Option<&'a Node>, f: &mut F) -> R
where
    F: FnMut(NodeF<'a, R>, Option<&'a Node>) -> R,
{
    let layer = match node {
        Node::Char(n) => NodeF::Char(n),
        Node::Dot(n) => NodeF::Dot(n),
        Node::ClassEscape(n) => NodeF::ClassEscape(n),
        Node::PropertyEscape(n) => NodeF::PropertyEscape(n),
        Node::Backref(n) => NodeF::Backref(n),
        Node::BaseAssertion(n) => NodeF::BaseAssertion(n),
        Node::CharClass(n) => NodeF::CharClass {
            node: n,
            body: n.body.iter().map(|c| cata(c, Some(node), f)).collect(),
        },
        Node::CharRange(n) => {
            let begin = f(NodeF::Char(&n.begin), Some(node));
            let end = f(NodeF::Char(&n.end), Some(node));
            NodeF::CharRange { node: n, begin, end }
        }
        Node::GroupAssertion(n) => NodeF::GroupAssertion {
            node: n,
            body: cata(&n.body, Some(node), f),
        },
        Node::Group(n) => NodeF::Group {
            node: n,
            body: cata(&n.body, Some(node), f),
        },
        Node::Repeat(n) => {
            let body = cata(&n.body, Some(node), f);
            let quantifier = f(NodeF::Quantifier(&n.quantifier), Some(node));
            NodeF::Repeat {
                node: n,
                body,
                quantifier,
            }
        }
        Node::List(n) => NodeF::List {
            node: n,
            body: n.body.iter().map(|c| cata(c, Some(node), f)).collect(),
        },
        Node::Disjunction(n) => NodeF::Disjunction {
            node: n,
            body: n.body.iter().map(|c| cata(c, Some(node), f)).collect(),
        },
    };
    f(layer, parent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(c: char, at: usize) -> Node {
        Node::Char(Char::new(c as u32, at..at + 1))
    }

    fn list(body: Vec<Node>) -> Node {
        Node::List(List { body, range: 0..0 })
    }

    #[test]
    fn test_bottom_up_counts_leaves() {
        let tree = list(vec![
            ch('a', 0),
            Node::Group(Group {
                behavior: GroupBehavior::NonCapturing,
                body: Box::new(list(vec![ch('b', 3), ch('c', 4)])),
                range: 1..6,
            }),
        ]);
        let leaves = tree.bottom_up(|layer, _parent| match layer {
            NodeF::List { body, .. } => body.into_iter().sum(),
            NodeF::Group { body, .. } => body,
            _ => 1usize,
        });
        assert_eq!(leaves, 3);
    }

    #[test]
    fn test_bottom_up_passes_parent() {
        let tree = Node::CharRange(CharRange {
            begin: Char::new('a' as u32, 0..1),
            end: Char::new('z' as u32, 2..3),
            range: 0..3,
        });
        let rendered = tree.bottom_up(|layer, parent| match layer {
            NodeF::Char(c) => format!("{}@{}", c.value, parent.map_or("root", |p| p.kind_name())),
            NodeF::CharRange { begin, end, .. } => format!("{}-{}", begin, end),
            _ => String::new(),
        });
        assert_eq!(rendered, "97@CharRange-122@CharRange");
    }

    #[test]
    fn test_transform_rewrites_leaves() {
        let tree = list(vec![ch('a', 0), ch('b', 1)]);
        let upper = tree.transform(&mut |node| match node {
            Node::Char(mut c) => {
                c.value -= 32;
                Node::Char(c)
            }
            other => other,
        });
        assert_eq!(upper, list(vec![ch('A', 0), ch('B', 1)]));
    }
}
