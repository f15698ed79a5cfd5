#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for Sprout grammars.
//!
//! - [`Operator`]: immutable parsing-expression trees, built with [`op`]
//! - [`Grammar`]: ordered rule set with setup actions, foreign grammars and
//!   variables; serializable to JSON and postcard
//! - [`utils`]: offset/line translation and literal escaping

pub mod colors;
pub mod grammar;
pub mod op;
mod operator;
pub mod utils;

#[cfg(test)]
mod utils_tests;

pub use colors::Colors;
pub use grammar::{Grammar, GrammarError, Rule, RuleId};
pub use operator::{OpKind, Operator};
pub use utils::{Span, line_col};
