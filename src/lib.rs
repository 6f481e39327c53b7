//! # jsre-parser
//!
//! A parser for JavaScript regular expression syntax.
//!
//! Patterns parse into a typed tree ([jsre::ast::Node]) with a byte range on every node.
//! The tree can be checked, dumped as JSON and rendered back to pattern text. The
//! grammar is written with the combinator engine in [jsre::parsec], and character sets
//! are handled by the interval algebra in [jsre::charset].
//!
//! ```rust-example
//! use jsre_parser::jsre::grammar::parse;
//!
//! let parsed = parse("(?<year>[0-9]{4})-\\k<year>", None, false)?;
//! assert_eq!(parsed.groups.count, 1);
//! assert_eq!(parsed.to_source(), "(?<year>[0-9]{4})-\\k<year>");
//! ```
//!
//! ## Testing
//!
//! For tree assertions and expected-tree factories, see the
//! [testing module](jsre::testing).

pub mod jsre;
