use indoc::indoc;

use crate::test_utils::{digits_grammar, read_invalid, read_invalid_with, read_valid};
use crate::{DiagnosticKind, GrammarReader, Severity};

#[test]
fn undefined_reference() {
    let diagnostics = read_invalid("root = 'a' missing");

    insta::assert_snapshot!(diagnostics, @"error at 11..18: `missing` is not defined");
}

#[test]
fn forward_references_resolve() {
    let g = read_valid(indoc! {"
        root = item+
        item = `[a-z]`
    "});

    assert_eq!(g.len(), 2);
}

#[test]
fn formal_arguments_resolve_inside_their_rule() {
    read_valid(indoc! {"
        pair(x) = x ',' x
        root = %pair('a')
    "});
}

#[test]
fn formal_arguments_do_not_leak() {
    let diagnostics = read_invalid(indoc! {"
        pair(x) = x ',' x
        root = %pair('a') x
    "});

    assert_eq!(diagnostics.kinds(), [DiagnosticKind::UndefinedReference]);
}

#[test]
fn formal_argument_shadows_rule() {
    read_valid(indoc! {"
        x = 'rule'
        wrap(x) = '(' x ')'
        root = %wrap(x)
    "});
}

#[test]
fn invoke_arity_mismatch() {
    let source = "root = %pair('a', 'b')\npair(x) = x x";
    let diagnostics = read_invalid(source);

    insta::assert_snapshot!(
        diagnostics,
        @"error at 7..12: `pair` takes 1 argument(s) but 2 were supplied (related: `pair` declared here at 23..27)"
    );
}

#[test]
fn plain_reference_to_parameterized_rule() {
    let diagnostics = read_invalid(indoc! {"
        pair(x) = x x
        root = pair
    "});

    insta::assert_snapshot!(
        diagnostics,
        @"error at 21..25: `pair` takes 1 argument(s) but 0 were supplied (related: `pair` declared here at 0..4)"
    );
}

#[test]
fn undefined_invoke_target() {
    let diagnostics = read_invalid("root = %nope('a')");

    insta::assert_snapshot!(diagnostics, @"error at 7..12: `nope` is not defined");
}

#[test]
fn undeclared_foreign_alias() {
    let reader = GrammarReader::new().foreign("digits", digits_grammar());
    let diagnostics = read_invalid_with(&reader, "root = digits.num");

    insta::assert_snapshot!(
        diagnostics,
        @"error at 7..17: unknown foreign grammar `digits` (hint: declare it with `:foreign digits`)"
    );
}

#[test]
fn undefined_foreign_rule() {
    let reader = GrammarReader::new().foreign("digits", digits_grammar());
    let diagnostics = read_invalid_with(&reader, ":foreign digits\nroot = digits.nope");

    insta::assert_snapshot!(diagnostics, @"error at 23..34: `digits.nope` is not defined");
}

#[test]
fn foreign_invoke_arity() {
    let reader = GrammarReader::new().foreign("digits", digits_grammar());
    let diagnostics = read_invalid_with(&reader, ":foreign digits\nroot = %digits.list");

    insta::assert_snapshot!(
        diagnostics,
        @"error at 23..35: `digits.list` takes 1 argument(s) but 0 were supplied"
    );
}

#[test]
fn unused_foreign_is_a_warning() {
    let reader = GrammarReader::new().foreign("digits", digits_grammar());
    let (grammar, diagnostics) = reader
        .read_with_diagnostics(":foreign digits\nroot = 'a'")
        .unwrap();

    assert!(grammar.foreign("digits").is_some());
    assert_eq!(diagnostics.len(), 1);
    let warning = diagnostics.iter().next().unwrap();
    assert_eq!(warning.severity(), Severity::Warning);
    insta::assert_snapshot!(diagnostics, @"warning at 9..15: foreign grammar `digits` is never used");
}
