//! Diagnostics for input a grammar rejected.

use sprout_core::Span;
use sprout_vm::Failure;

use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Turn the furthest failure of a parse over `source` into a diagnostic
/// pointing at the offending character.
///
/// ```
/// use sprout_compiler::{GrammarReader, report_failure};
/// use sprout_vm::Engine;
///
/// let grammar = GrammarReader::new().read("root = 'a' !.").unwrap();
/// let mut engine = Engine::new("ab", &grammar);
/// assert!(engine.parse(None).unwrap().is_none());
///
/// let diagnostics = report_failure(engine.failure().unwrap(), "ab");
/// assert_eq!(diagnostics.to_string(), "error at 1..2: expected end of input (hint: while matching `root`)");
/// ```
pub fn report_failure(failure: &Failure<'_>, source: &str) -> Diagnostics {
    let pos = failure.pos.min(source.len());
    let span = match source.get(pos..).and_then(|rest| rest.chars().next()) {
        Some(c) => Span::new(pos, pos + c.len_utf8()),
        None => Span::new(pos, pos),
    };

    let mut diagnostics = Diagnostics::new();
    let mut report = diagnostics
        .report(DiagnosticKind::UnexpectedInput, span)
        .message(failure.message());
    if let Some(rule) = &failure.rule {
        report = report.hint(format!("while matching `{rule}`"));
    }
    report.emit();
    diagnostics
}
