//! Testing utilities for regex trees
//!
//! Two tools that go together:
//!
//! 1. **[assert_tree]**: fluent assertions over a parsed tree
//! 2. **[factories]**: node constructors with empty ranges, for building expected trees
//!
//! ## Fluent Assertions
//!
//! Matching on nested node enums by hand takes a dozen lines per level and hides what
//! is being checked. With `assert_tree` the shape reads top down:
//!
//! ```rust-example
//! use jsre_parser::jsre::testing::assert_tree;
//!
//! let parsed = parse("a(b|c)", None, false)?;
//! assert_tree(&parsed.tree)
//!     .list()
//!     .count(2)
//!     .child(0, |c| c.char('a'))
//!     .child(1, |c| {
//!         c.capturing(1).body(|b| b.disjunction().count(2))
//!     });
//! ```
//!
//! Every failure message carries the path from the root, e.g. `tree.body[1].body`.
//!
//! ## Expected Trees
//!
//! Parsed trees carry source ranges, factory trees do not. Compare after
//! [normalize_ranges](crate::jsre::ast::normalize_ranges):
//!
//! ```rust-example
//! use jsre_parser::jsre::testing::factories::*;
//!
//! let mut tree = parse("a*", None, false)?.tree;
//! normalize_ranges(&mut tree);
//! assert_eq!(tree, star(ch('a')));
//! ```

pub mod factories;
mod tree_assertions;

pub use tree_assertions::{assert_tree, NodeAssertion};
