//! Test helpers for reading grammar text.

use indoc::indoc;
use sprout_core::Grammar;

use crate::{Diagnostics, Error, GrammarReader};

/// Read `source`, panicking with rendered diagnostics on failure.
pub fn read_valid(source: &str) -> Grammar {
    match GrammarReader::new().read(source) {
        Ok(grammar) => grammar,
        Err(Error::GrammarReadError(diagnostics)) => {
            panic!("expected valid grammar:\n{}", diagnostics.render(source))
        }
        Err(err) => panic!("expected valid grammar: {err}"),
    }
}

/// Diagnostics of a grammar text that must not read.
pub fn read_invalid_with(reader: &GrammarReader, source: &str) -> Diagnostics {
    match reader.read(source) {
        Ok(grammar) => panic!("expected diagnostics, got {grammar:?}"),
        Err(Error::GrammarReadError(diagnostics)) => diagnostics,
        Err(err) => panic!("expected diagnostics, got {err}"),
    }
}

pub fn read_invalid(source: &str) -> Diagnostics {
    read_invalid_with(&GrammarReader::new(), source)
}

/// Rendered diagnostics of a grammar text that must not read.
pub fn render_invalid(source: &str) -> String {
    read_invalid(source).render(source)
}

/// A tiny foreign grammar: `num = [0-9]+`, `list(x) = x (',' x)*`.
pub fn digits_grammar() -> Grammar {
    read_valid(indoc! {"
        num = `[0-9]+`
        list(x) = x (',' x)*
    "})
}
