use crate::utils::{Span, escape_literal, line_col, unescape_literal};

#[test]
fn line_col_counts_from_one() {
    let text = "ab\ncd\n";
    assert_eq!(line_col(text, 0), (1, 1));
    assert_eq!(line_col(text, 2), (1, 3));
    assert_eq!(line_col(text, 3), (2, 1));
    assert_eq!(line_col(text, 6), (3, 1));
}

#[test]
fn line_col_clamps_past_end() {
    assert_eq!(line_col("ab", 100), (1, 3));
}

#[test]
fn line_col_counts_characters() {
    // 'é' is two bytes.
    let text = "é+x";
    assert_eq!(line_col(text, 2), (1, 2));
    // Inside the multi-byte character.
    assert_eq!(line_col(text, 1), (1, 1));
}

#[test]
fn escape_roundtrip() {
    let raw = "a'b\"c\\d\ne\t\u{1}";
    let escaped = escape_literal(raw, '\'');
    assert_eq!(escaped, r#"a\'b"c\\d\ne\t\u{1}"#);
    assert_eq!(unescape_literal(&escaped).as_deref(), Some(raw));
}

#[test]
fn unescape_rejects_malformed() {
    assert_eq!(unescape_literal("abc\\"), None);
    assert_eq!(unescape_literal("\\u{zz}"), None);
    assert_eq!(unescape_literal("\\u41"), None);
}

#[test]
fn span_basics() {
    let span = Span::from(2..5);
    assert_eq!(span.len(), 3);
    assert!(!span.is_empty());
    assert_eq!(span.range(), 2..5);
}
