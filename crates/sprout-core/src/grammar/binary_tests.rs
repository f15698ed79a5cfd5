use super::*;
use crate::op::*;

#[test]
fn roundtrip() {
    let mut inner = Grammar::new();
    inner.set("digit", range('0', '9')).unwrap();

    let mut g = Grammar::new();
    g.set("root", foreign_rule("num", "digit")).unwrap();
    g.set_with_args("wrap", ["x"], seq([lit("("), rule("x"), lit(")")]))
        .unwrap();
    g.add_setup_action("init");
    g.add_foreign("num", inner).unwrap();

    let bytes = g.to_binary();
    let decoded = Grammar::from_binary(&bytes).unwrap();

    assert_eq!(g, decoded);
    assert_eq!(decoded.rule_order().collect::<Vec<_>>(), ["root", "wrap"]);
    assert_eq!(decoded.find("wrap").unwrap().formal_args, ["x"]);
}

#[test]
fn truncated_input_is_an_error() {
    let mut g = Grammar::new();
    g.set("a", lit("abc")).unwrap();
    let bytes = g.to_binary();

    let err = Grammar::from_binary(&bytes[..bytes.len() - 1]).unwrap_err();
    assert!(matches!(err, GrammarError::Binary(_)));
}
