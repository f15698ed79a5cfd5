use sprout_core::Span;

use super::*;

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::InvalidRegex, Span::new(0, 5))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    insta::assert_snapshot!(diagnostics, @"error at 0..5: invalid regex");
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndefinedReference, Span::new(4, 7))
        .message("num")
        .emit();
    diagnostics
        .report(DiagnosticKind::InvalidRepeatBounds, Span::new(9, 12))
        .message("minimum 3 exceeds maximum 2")
        .emit();

    insta::assert_snapshot!(diagnostics, @r"
    error at 4..7: `num` is not defined
    error at 9..12: invalid repeat bounds: minimum 3 exceeds maximum 2
    ");
}

#[test]
fn warnings_do_not_count_as_errors() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnusedForeign, Span::new(9, 13))
        .message("json")
        .emit();

    assert!(!diagnostics.has_errors());
    assert!(diagnostics.has_warnings());
    assert_eq!(diagnostics.warning_count(), 1);
    insta::assert_snapshot!(diagnostics, @"warning at 9..13: foreign grammar `json` is never used");
}

#[test]
fn plain_output_includes_related_and_hints() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DuplicateRule, Span::new(8, 9))
        .message("a")
        .related_to("first defined here", Span::new(0, 1))
        .hint("rename one of the rules")
        .emit();

    insta::assert_snapshot!(
        diagnostics,
        @"error at 8..9: `a` is already defined (related: first defined here at 0..1) (hint: rename one of the rules)"
    );
}

#[test]
fn sort_follows_source_order() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ArityMismatch, Span::new(10, 12))
        .emit();
    diagnostics
        .report(DiagnosticKind::SyntaxError, Span::new(2, 3))
        .emit();
    diagnostics.sort();

    assert_eq!(
        diagnostics.kinds(),
        [DiagnosticKind::SyntaxError, DiagnosticKind::ArityMismatch]
    );
}

#[test]
fn render_with_source() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndefinedReference, Span::new(4, 5))
        .message("b")
        .emit();

    insta::assert_snapshot!(diagnostics.render("a = b"), @r"
    error: `b` is not defined
      |
    1 | a = b
      |     ^
    ");
}

#[test]
fn render_with_related() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ArityMismatch, Span::new(4, 12))
        .message("`w` takes 1 argument(s) but 2 were supplied")
        .related_to("`w` declared here", Span::new(13, 17))
        .emit();

    insta::assert_snapshot!(diagnostics.render("a = %w(x, y) w(p) = p"), @r"
    error: `w` takes 1 argument(s) but 2 were supplied
      |
    1 | a = %w(x, y) w(p) = p
      |     ^^^^^^^^ ---- `w` declared here
    ");
}

#[test]
fn empty_span_points_at_one_column() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::SyntaxError, Span::new(3, 3))
        .message("unexpected `)`")
        .emit();

    insta::assert_snapshot!(diagnostics.render("a =)"), @r"
    error: unexpected `)`
      |
    1 | a =)
      |    ^
    ");
}

#[test]
fn printer_colored() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::InvalidCharRange, Span::new(0, 5))
        .emit();

    let plain = diagnostics.render_colored("[z-a]", false);
    let colored = diagnostics.render_colored("[z-a]", true);
    assert!(!plain.contains('\x1b'));
    assert!(colored.contains('\x1b'));
}

#[test]
fn printer_with_path() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::SyntaxError, Span::new(0, 1))
        .message("unexpected `!`")
        .emit();

    let out = diagnostics.printer().source("!").path("calc.peg").render();
    assert!(out.contains("calc.peg"));
}
