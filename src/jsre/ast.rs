//! Regex syntax tree
//!
//! This module defines the tree produced by the dialect grammar and the generic
//! utilities that work on it without knowing the dialect:
//! - Node types (`nodes`): one struct per node kind, gathered in the [Node] enum
//! - Traversal (`traits`): [Visitor] and [VisitorMut] with per-kind hooks
//! - Folds (`fold`): [Node::map_children], [Node::transform] and [Node::bottom_up]
//! - Group accounting (`groups`): counting, renumbering and range shifting
//! - Flags (`flags`): [RegexFlags]

pub mod flags;
pub mod fold;
pub mod groups;
pub mod nodes;
pub mod traits;

pub use flags::{FlagsError, RegexFlags};
pub use fold::NodeF;
pub use groups::{groups_info, normalize_ranges, renumber_groups, shift_ranges, GroupsInfo};
pub use nodes::*;
pub use traits::{Visitor, VisitorMut};
