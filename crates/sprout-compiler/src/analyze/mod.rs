//! Static checks over grammar text.
//!
//! - [`refs`]: undefined references, arity of calls, foreign aliases
//! - [`terminals`]: regex syntax, character ranges, repeat bounds

mod refs;
mod terminals;

#[cfg(test)]
mod refs_tests;
#[cfg(test)]
mod terminals_tests;

use indexmap::IndexMap;
use sprout_core::Grammar;

use crate::diagnostics::Diagnostics;
use crate::reader::ast::Item;

pub(crate) use refs::check_references;
pub(crate) use terminals::check_terminals;

/// Run every check over `items`.
pub(crate) fn analyze(
    items: &[Item],
    foreign: &IndexMap<String, Grammar>,
    diagnostics: &mut Diagnostics,
) {
    check_terminals(items, diagnostics);
    check_references(items, foreign, diagnostics);
}
