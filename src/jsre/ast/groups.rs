//! Capturing-group accounting and range rewriting

use std::collections::BTreeSet;

use super::nodes::*;
use super::traits::{Visitor, VisitorMut};

/// Number of capturing groups and the names in use
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupsInfo {
    pub count: u32,
    pub names: BTreeSet<String>,
}

#[derive(Default)]
struct GroupCounter {
    info: GroupsInfo,
}

impl Visitor for GroupCounter {
    fn visit_group(&mut self, group: &Group, _parent: Option<&Node>) {
        if let GroupBehavior::Capturing { name, .. } = &group.behavior {
            self.info.count += 1;
            if let Some(name) = name {
                self.info.names.insert(name.clone());
            }
        }
    }
}

/// Count capturing groups in one traversal. Groups in mutually exclusive
/// alternatives are all counted.
pub fn groups_info(node: &Node) -> GroupsInfo {
    let mut counter = GroupCounter::default();
    node.accept(&mut counter);
    counter.info
}

#[derive(Default)]
struct Renumber {
    info: GroupsInfo,
}

impl VisitorMut for Renumber {
    fn enter(&mut self, node: &mut Node) {
        if let Node::Group(Group {
            behavior: GroupBehavior::Capturing { index, name },
            ..
        }) = node
        {
            self.info.count += 1;
            *index = self.info.count;
            if let Some(name) = name {
                self.info.names.insert(name.clone());
            }
        }
    }
}

/// Reassign capturing group indices left to right by opening parenthesis.
pub fn renumber_groups(node: &mut Node) -> GroupsInfo {
    let mut renumber = Renumber::default();
    node.accept_mut(&mut renumber);
    renumber.info
}

struct Shift(usize);

impl Shift {
    fn apply(&self, range: &mut std::ops::Range<usize>) {
        range.start += self.0;
        range.end += self.0;
    }
}

impl VisitorMut for Shift {
    fn enter(&mut self, node: &mut Node) {
        self.apply(node.range_mut());
        if let Node::CharRange(range) = node {
            self.apply(&mut range.begin.range);
            self.apply(&mut range.end.range);
        }
    }

    fn visit_quantifier(&mut self, quantifier: &mut Quantifier) {
        self.apply(&mut quantifier.range);
    }
}

/// Move every source range in the tree forward by `offset` bytes.
pub fn shift_ranges(node: &mut Node, offset: usize) {
    node.accept_mut(&mut Shift(offset));
}

struct Normalize;

impl VisitorMut for Normalize {
    fn enter(&mut self, node: &mut Node) {
        *node.range_mut() = 0..0;
        if let Node::CharRange(range) = node {
            range.begin.range = 0..0;
            range.end.range = 0..0;
        }
    }

    fn visit_quantifier(&mut self, quantifier: &mut Quantifier) {
        quantifier.range = 0..0;
    }
}

/// Reset every source range to `0..0`, for comparing trees by structure alone.
pub fn normalize_ranges(node: &mut Node) {
    node.accept_mut(&mut Normalize);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(index: u32, name: Option<&str>, body: Node, range: std::ops::Range<usize>) -> Node {
        Node::Group(Group {
            behavior: GroupBehavior::Capturing {
                index,
                name: name.map(str::to_string),
            },
            body: Box::new(body),
            range,
        })
    }

    fn ch(c: char, at: usize) -> Node {
        Node::Char(Char::new(c as u32, at..at + 1))
    }

    /// `((a)|(?<n>b))`
    fn nested() -> Node {
        let inner = Node::Disjunction(Disjunction {
            body: vec![
                group(0, None, ch('a', 2), 1..4),
                group(0, Some("n"), ch('b', 9), 5..11),
            ],
            range: 1..11,
        });
        group(0, None, inner, 0..12)
    }

    #[test]
    fn test_groups_info_counts_all_branches() {
        let info = groups_info(&nested());
        assert_eq!(info.count, 3);
        assert_eq!(info.names.into_iter().collect::<Vec<_>>(), vec!["n"]);
    }

    #[test]
    fn test_renumber_outer_group_first() {
        let mut tree = nested();
        renumber_groups(&mut tree);
        let mut indices = Vec::new();
        struct Collect<'a>(&'a mut Vec<u32>);
        impl Visitor for Collect<'_> {
            fn visit_group(&mut self, group: &Group, _parent: Option<&Node>) {
                if let GroupBehavior::Capturing { index, .. } = group.behavior {
                    self.0.push(index);
                }
            }
        }
        tree.accept(&mut Collect(&mut indices));
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_shift_ranges_includes_endpoints_and_quantifiers() {
        let mut tree = Node::Repeat(Repeat {
            body: Box::new(Node::CharRange(CharRange {
                begin: Char::new('a' as u32, 0..1),
                end: Char::new('z' as u32, 2..3),
                range: 0..3,
            })),
            quantifier: Quantifier {
                min: 1,
                max: None,
                greedy: true,
                range: 3..4,
            },
            range: 0..4,
        });
        shift_ranges(&mut tree, 10);
        let Node::Repeat(repeat) = &tree else {
            panic!("expected a repeat");
        };
        assert_eq!(repeat.range, 10..14);
        assert_eq!(repeat.quantifier.range, 13..14);
        let Node::CharRange(range) = repeat.body.as_ref() else {
            panic!("expected a char range");
        };
        assert_eq!(range.begin.range, 10..11);
        assert_eq!(range.end.range, 12..13);

        normalize_ranges(&mut tree);
        assert_eq!(tree.range(), &(0..0));
    }
}
