//! Runtime engine for Sprout grammars.
//!
//! This crate matches input text against a [`sprout_core::Grammar`] with a
//! memoizing packrat engine that supports left recursion, parameterized
//! rules and delegation to foreign grammars.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;

// Re-export commonly used items at crate root
pub use engine::{
    ActionError, Actions, Binder, CountingTracer, Engine, EngineBuilder, Failure, FuelLimits,
    GrammarId, Match, MatchNode, MatchValue, MemoStats, NoopTracer, NodeKind, PrintTracer,
    RuntimeError, Structural, Tracer, Value, Verbosity, run_setup,
};
