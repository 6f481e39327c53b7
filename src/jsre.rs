//! Main module for jsre library functionality

pub mod ast;
pub mod charset;
pub mod grammar;
pub mod parsec;
pub mod testing;
