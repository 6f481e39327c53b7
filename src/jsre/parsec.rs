//! Parser combinator engine
//!
//!     PEG-style combinators over an arena of parsers, with ordered choice, explicit
//!     backtracking, lookahead, value/error/state mapping, a restricted monadic bind, and
//!     memoized support for directly left-recursive rules.
//!
//! Execution Contract
//!
//!     A parser either succeeds, advancing the cursor by what it consumed and producing a
//!     [Value], or fails with a [Failure] carrying a position. Primitives never move the
//!     cursor on failure. Combinators that consume and then fail leave the cursor where
//!     the failure happened, and an ordered choice only tries its next branch when the
//!     previous branch failed without consuming anything. [GrammarBuilder::attempt]
//!     turns any failure into a non-consuming one by restoring cursor and state.
//!
//! State
//!
//!     The grammar's state value is threaded through a parse. It changes only through
//!     [GrammarBuilder::state_after], after a confirmed success. Choice, optional, try
//!     and lookahead restore cursor and state together when they backtrack.
//!
//! Rules
//!
//!     Named rules are declared on a [GrammarBuilder] and referenced through placeholders
//!     before they exist. [GrammarBuilder::build] links the placeholders, wraps directly
//!     left-recursive rules in a memoized fixed-point loop, and rejects grammar mistakes
//!     with a [GrammarError]. The built [Grammar] never looks up a name while parsing.
//!
//! Usage
//!
//!     ```rust,ignore
//!     let mut g = GrammarBuilder::<Calc>::new();
//!     g.define_with("Expr", |g| {
//!         let expr = g.rule("Expr");
//!         let op = g.one_of("+-");
//!         let num = g.rule("Num");
//!         let binary = g.seq(&[expr, op, num]);
//!         let binary = g.map(binary, eval);
//!         g.alt(&[binary, num])
//!     });
//!     let grammar = g.build()?;
//!     let outcome = grammar.parse("Expr", "3-2+1", ());
//!     ```

mod builder;
mod engine;
mod error;
mod node;
mod value;

pub use builder::GrammarBuilder;
pub use engine::{Grammar, Outcome};
pub(crate) use engine::{RED_ZONE, STACK_SEGMENT};
pub use error::{Failure, GrammarError};
pub use node::ParserId;
pub use value::{ScanInput, Scanned, Span, Value};

use std::fmt::Debug;

/// The types a grammar works with.
pub trait Language: 'static {
    /// Grammar-specific values carried in [Value::Item]
    type Item: Clone + Debug;
    /// State threaded through a parse
    type State: Clone + Debug;
    /// Grammar-specific failure payload
    type Error: Clone + Debug;
}
