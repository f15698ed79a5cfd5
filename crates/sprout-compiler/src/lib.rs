//! Sprout compiler: grammar text in, [`Grammar`](sprout_core::Grammar) out.
//!
//! - `reader` - self-hosted reader for grammar text
//! - `analyze` - reference and terminal checks
//! - `diagnostics` - error reporting
//! - [`print`] - grammar back to text
//! - [`report_failure`] - diagnostics for input a grammar rejected

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod analyze;
pub mod diagnostics;
mod printer;
pub mod reader;
mod report;

#[cfg(test)]
pub mod test_utils;

pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use printer::{print, print_operator};
pub use reader::GrammarReader;
pub use report::report_failure;

use sprout_vm::{ActionError, RuntimeError};

/// Errors that can occur while reading grammar text.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The engine running the meta-grammar gave up.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("grammar reading failed with {} errors", .0.error_count())]
    GrammarReadError(Diagnostics),
}

impl Error {
    /// Diagnostics of a rejected grammar text.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Error::GrammarReadError(diagnostics) => Some(diagnostics),
            _ => None,
        }
    }
}

/// Result type for grammar reading.
pub type Result<T> = std::result::Result<T, Error>;
