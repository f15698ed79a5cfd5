use sprout_vm::Engine;

use crate::DiagnosticKind;
use crate::test_utils::{read_invalid, read_valid};

#[test]
fn invalid_regex() {
    let diagnostics = read_invalid("root = `(`");

    assert_eq!(diagnostics.kinds(), [DiagnosticKind::InvalidRegex]);
    let message = diagnostics.iter().next().unwrap();
    assert_eq!(message.span(), sprout_core::Span::new(7, 10));
    assert!(message.message().starts_with("invalid regex: "));
    assert!(message.message().contains("unclosed group"));
}

#[test]
fn valid_regex_with_escapes() {
    read_valid(r"root = `\d+(?:\.\d+)?`");
}

#[test]
fn unicode_word_boundary_is_rejected() {
    let diagnostics = read_invalid(r"a = `\bfoo\b`");

    insta::assert_snapshot!(
        diagnostics,
        @r"error at 4..13: invalid regex: Unicode word boundaries are not supported (hint: use `(?-u:\b)` for an ASCII word boundary)"
    );
}

#[test]
fn ascii_word_boundary_reads_and_matches() {
    let g = read_valid(r"root = `(?-u:\b)foo(?-u:\b)`");
    let mut engine = Engine::new("foo", &g);

    let m = engine.parse(None).unwrap().unwrap();
    assert_eq!(m.span(), sprout_core::Span::new(0, 3));
}

#[test]
fn inverted_char_range() {
    let diagnostics = read_invalid("root = [z-a]");

    insta::assert_snapshot!(diagnostics, @"error at 7..12: invalid character range: 'z' sorts after 'a'");
}

#[test]
fn single_char_range() {
    read_valid("root = [x]");
}

#[test]
fn inverted_repeat_bounds() {
    let diagnostics = read_invalid("root = 'a'{3,2}");

    insta::assert_snapshot!(
        diagnostics,
        @"error at 10..15: invalid repeat bounds: minimum 3 exceeds maximum 2"
    );
}

#[test]
fn exact_and_open_repeat_bounds() {
    read_valid("root = 'a'{0} 'b'{2,2} 'c'{5,}");
}

#[test]
fn checks_reach_invoke_arguments() {
    let diagnostics = read_invalid("wrap(x) = x\nroot = %wrap([9-1])");

    assert_eq!(diagnostics.kinds(), [DiagnosticKind::InvalidCharRange]);
}
