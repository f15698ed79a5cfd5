//! Grammar container with JSON and binary serialization.

mod binary;
mod json;
mod types;

#[cfg(test)]
mod binary_tests;
#[cfg(test)]
mod json_tests;
#[cfg(test)]
mod types_tests;

pub use json::GrammarError;
pub use types::{Grammar, Rule, RuleId};
