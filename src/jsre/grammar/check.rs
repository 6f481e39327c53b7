//! Capturing group and backreference checks
//!
//! Runs after a successful parse. Groups are numbered first, then the tree is walked
//! in match order keeping the set of groups that have closed on the way to the current
//! position. A backreference must name a group that exists and is in that set.

use std::collections::BTreeSet;

use super::error::{ErrorKind, RegexError};
use crate::jsre::ast::{
    renumber_groups, Backref, BackrefTarget, GroupBehavior, GroupsInfo, Node,
};
use crate::jsre::parsec::{RED_ZONE, STACK_SEGMENT};

/// Groups that can have matched before the current position
#[derive(Debug, Clone, Default)]
struct Live {
    indices: BTreeSet<u32>,
    names: BTreeSet<String>,
}

impl Live {
    fn merge(&mut self, other: Live) {
        self.indices.extend(other.indices);
        self.names.extend(other.names);
    }
}

struct Checker<'a> {
    groups: &'a GroupsInfo,
    live: Live,
}

impl Checker<'_> {
    fn check(&mut self, node: &Node) -> Result<(), RegexError> {
        stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || self.check_node(node))
    }

    fn check_node(&mut self, node: &Node) -> Result<(), RegexError> {
        match node {
            Node::Backref(backref) => self.check_backref(backref),
            Node::Group(group) => {
                self.check(&group.body)?;
                if let GroupBehavior::Capturing { index, name } = &group.behavior {
                    self.live.indices.insert(*index);
                    if let Some(name) = name {
                        self.live.names.insert(name.clone());
                    }
                }
                Ok(())
            }
            // a negative lookaround never leaves captures behind
            Node::GroupAssertion(assertion) if assertion.look.negative => {
                let saved = self.live.clone();
                self.check(&assertion.body)?;
                self.live = saved;
                Ok(())
            }
            Node::GroupAssertion(assertion) => self.check(&assertion.body),
            // every branch starts from the same set; what any branch adds stays live
            Node::Disjunction(disjunction) => {
                let before = self.live.clone();
                let mut after = before.clone();
                for branch in &disjunction.body {
                    self.live = before.clone();
                    self.check(branch)?;
                    after.merge(std::mem::take(&mut self.live));
                }
                self.live = after;
                Ok(())
            }
            Node::List(list) => list.body.iter().try_for_each(|child| self.check(child)),
            Node::Repeat(repeat) => self.check(&repeat.body),
            _ => Ok(()),
        }
    }

    fn check_backref(&self, backref: &Backref) -> Result<(), RegexError> {
        let (exists, live) = match &backref.target {
            BackrefTarget::Index(index) => (
                *index <= self.groups.count,
                self.live.indices.contains(index),
            ),
            BackrefTarget::Name(name) => (
                self.groups.names.contains(name),
                self.live.names.contains(name),
            ),
        };
        match (exists, live) {
            (false, _) => Err(RegexError::new(
                ErrorKind::BackrefNotExist,
                backref.range.clone(),
            )),
            (true, false) => Err(RegexError::new(
                ErrorKind::BackrefEmpty,
                backref.range.clone(),
            )),
            (true, true) => Ok(()),
        }
    }
}

/// Number the capturing groups of `tree` and check its backreferences.
pub fn check(tree: &mut Node) -> Result<GroupsInfo, RegexError> {
    let groups = renumber_groups(tree);
    let mut checker = Checker {
        groups: &groups,
        live: Live::default(),
    };
    checker.check(tree)?;
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsre::ast::{Char, Group, GroupAssertion, List, LookDirection, Lookaround};

    fn group(body: Node, name: Option<&str>) -> Node {
        Node::Group(Group {
            behavior: GroupBehavior::Capturing {
                index: 0,
                name: name.map(str::to_string),
            },
            body: Box::new(body),
            range: 0..0,
        })
    }

    fn backref(index: u32) -> Node {
        Node::Backref(Backref {
            target: BackrefTarget::Index(index),
            range: 5..7,
        })
    }

    fn list(body: Vec<Node>) -> Node {
        Node::List(List { body, range: 0..0 })
    }

    fn a() -> Node {
        Node::Char(Char::new('a' as u32, 0..1))
    }

    #[test]
    fn test_backref_after_group() {
        let mut tree = list(vec![group(a(), None), backref(1)]);
        let groups = check(&mut tree).unwrap();
        assert_eq!(groups.count, 1);
    }

    #[test]
    fn test_backref_missing_group() {
        let mut tree = list(vec![group(a(), None), backref(2)]);
        let err = check(&mut tree).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BackrefNotExist);
        assert_eq!(err.range, 5..7);
    }

    #[test]
    fn test_backref_inside_own_group() {
        let mut tree = group(list(vec![a(), backref(1)]), None);
        assert_eq!(check(&mut tree).unwrap_err().kind, ErrorKind::BackrefEmpty);
    }

    #[test]
    fn test_forward_backref() {
        let mut tree = list(vec![backref(1), group(a(), None)]);
        assert_eq!(check(&mut tree).unwrap_err().kind, ErrorKind::BackrefEmpty);
    }

    #[test]
    fn test_negative_lookahead_drops_groups() {
        let look = Node::GroupAssertion(GroupAssertion {
            look: Lookaround::new(LookDirection::Ahead, true),
            body: Box::new(group(a(), None)),
            range: 0..0,
        });
        let mut tree = list(vec![look, backref(1)]);
        assert_eq!(check(&mut tree).unwrap_err().kind, ErrorKind::BackrefEmpty);
    }

    #[test]
    fn test_positive_lookahead_keeps_groups() {
        let look = Node::GroupAssertion(GroupAssertion {
            look: Lookaround::new(LookDirection::Ahead, false),
            body: Box::new(group(a(), None)),
            range: 0..0,
        });
        let mut tree = list(vec![look, backref(1)]);
        assert!(check(&mut tree).is_ok());
    }

    #[test]
    fn test_disjunction_unions_branches() {
        let alternatives = Node::Disjunction(crate::jsre::ast::Disjunction {
            body: vec![group(a(), None), a()],
            range: 0..0,
        });
        let mut tree = list(vec![alternatives, backref(1)]);
        assert!(check(&mut tree).is_ok());
    }

    #[test]
    fn test_sibling_branch_not_live() {
        let alternatives = Node::Disjunction(crate::jsre::ast::Disjunction {
            body: vec![group(a(), None), backref(1)],
            range: 0..0,
        });
        let mut tree = alternatives;
        assert_eq!(check(&mut tree).unwrap_err().kind, ErrorKind::BackrefEmpty);
    }

    #[test]
    fn test_named_backref() {
        let named = Node::Backref(Backref {
            target: BackrefTarget::Name("x".to_string()),
            range: 0..0,
        });
        let mut tree = list(vec![group(a(), Some("x")), named.clone()]);
        assert!(check(&mut tree).is_ok());
        let mut tree = list(vec![group(a(), Some("y")), named]);
        assert_eq!(check(&mut tree).unwrap_err().kind, ErrorKind::BackrefNotExist);
    }
}
