//! Packrat matching engine for Sprout grammars.
//!
//! The engine interprets operator trees directly against a string,
//! memoizing every rule application and growing seeds for left-recursive
//! rules. A successful parse yields a match tree that binders turn into
//! host values.

mod error;
mod exec;
mod failure;
mod frame;
mod grammars;
mod memo;
mod node;
mod resolve;
mod terminal;
mod trace;
mod value;

#[cfg(test)]
mod frame_tests;

pub use error::{ActionError, RuntimeError};
pub use exec::{Engine, EngineBuilder, FuelLimits};
pub use failure::Failure;
pub use grammars::GrammarId;
pub use memo::MemoStats;
pub use node::{Match, MatchNode, NodeKind};
pub use resolve::{Actions, Binder, MatchValue, Structural, run_setup};
pub use trace::{CountingTracer, NoopTracer, PrintTracer, Tracer, Verbosity};
pub use value::Value;
