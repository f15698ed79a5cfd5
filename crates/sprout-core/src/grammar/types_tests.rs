use super::*;
use crate::op::*;

#[test]
fn set_assigns_declaration_order_ids() {
    let mut g = Grammar::new();
    let a = g.set("a", lit("a")).unwrap();
    let b = g.set("b", lit("b")).unwrap();

    assert_eq!(a, RuleId(0));
    assert_eq!(b, RuleId(1));
    assert_eq!(g.rule_id("b"), Some(b));
    assert_eq!(g.rule(b).unwrap().name, "b");
    assert_eq!(g.rule_order().collect::<Vec<_>>(), ["a", "b"]);
}

#[test]
fn duplicate_rule_is_rejected() {
    let mut g = Grammar::new();
    g.set("x", lit("1")).unwrap();

    let err = g.set("x", lit("2")).unwrap_err();
    assert!(matches!(err, GrammarError::DuplicateRule(ref name) if name == "x"));
    assert_eq!(err.to_string(), "rule `x` is already defined");
    // The first definition is untouched.
    assert_eq!(g.find("x").unwrap().operator, lit("1"));
}

#[test]
fn entry_prefers_root() {
    let mut g = Grammar::new();
    assert_eq!(g.entry(), None);

    g.set("first", dot()).unwrap();
    assert_eq!(g.entry(), Some(RuleId(0)));

    g.set("root", dot()).unwrap();
    assert_eq!(g.entry(), Some(RuleId(1)));
}

#[test]
fn formal_args_are_recorded() {
    let mut g = Grammar::new();
    g.set_with_args("list", ["item", "sep"], rule("item"))
        .unwrap();

    let rule = g.find("list").unwrap();
    assert!(rule.is_parameterized());
    assert_eq!(rule.arity(), 2);
    assert_eq!(rule.formal_args, ["item", "sep"]);
}

#[test]
fn metadata() {
    let mut g = Grammar::new();
    g.add_setup_action("let mut depth = 0;");
    g.set_variable("name", "calc");
    g.set_variable("name", "calc2");
    g.add_foreign("num", Grammar::new()).unwrap();

    assert_eq!(g.setup_actions(), ["let mut depth = 0;"]);
    assert_eq!(g.variable("name"), Some("calc2"));
    assert!(g.foreign("num").is_some());
    assert!(matches!(
        g.add_foreign("num", Grammar::new()),
        Err(GrammarError::DuplicateForeign(_))
    ));
}
