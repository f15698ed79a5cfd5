//! Sprout: a packrat PEG engine with left recursion, parameterized rules
//! and foreign grammars.
//!
//! # Example
//!
//! ```
//! use sprout::{Actions, Engine, Value, read_grammar};
//!
//! let grammar = read_grammar(r"
//!     sum = sum @ '+' num @ {add} / num
//!     num = $`[0-9]+` {int}
//! ").unwrap();
//!
//! let mut engine = Engine::new("1+2+3", &grammar);
//! let tree = engine.parse(None).unwrap().unwrap();
//!
//! let mut actions = Actions::<Value>::new()
//!     .on("int", |args| Value::Int(args[0].as_str().unwrap().parse().unwrap()))
//!     .on("add", |args| Value::Int(args[0].as_int().unwrap() + args[1].as_int().unwrap()));
//! assert_eq!(tree.value_with(&mut actions).unwrap(), Value::Int(6));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

#[cfg(test)]
mod e2e_tests;

pub use sprout_compiler::{
    DiagnosticKind, Diagnostics, DiagnosticsPrinter, Error, GrammarReader, Result, Severity,
    print, print_operator, report_failure,
};
pub use sprout_core::{
    Colors, Grammar, GrammarError, OpKind, Operator, Rule, RuleId, Span, line_col, op,
};
pub use sprout_vm::{
    ActionError, Actions, Binder, CountingTracer, Engine, EngineBuilder, Failure, FuelLimits,
    Match, MatchNode, MatchValue, MemoStats, NodeKind, NoopTracer, PrintTracer, RuntimeError,
    Structural, Tracer, Value, Verbosity, run_setup,
};

/// Read grammar text with no foreign grammars registered.
pub fn read_grammar(text: &str) -> Result<Grammar> {
    GrammarReader::new().read(text)
}
