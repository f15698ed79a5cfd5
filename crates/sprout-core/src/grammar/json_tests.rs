use super::*;
use crate::op::*;

fn sample() -> Grammar {
    let mut g = Grammar::new();
    g.set("program", plus(rule("statement"))).unwrap();
    g.set("statement", seq([rule("expression"), lit(";")]))
        .unwrap();
    g.set("expression", tag(regex("[0-9]+"), Some("n")))
        .unwrap();
    g.set_variable("version", "1");
    g
}

#[test]
fn roundtrip() {
    let g = sample();
    let json = g.to_json().unwrap();
    let decoded = Grammar::from_json(&json).unwrap();

    assert_eq!(g, decoded);
}

#[test]
fn preserves_rule_order() {
    let json = sample().to_json().unwrap();
    let decoded = Grammar::from_json(&json).unwrap();

    let order: Vec<_> = decoded.rule_order().collect();
    assert_eq!(order, ["program", "statement", "expression"]);
}

#[test]
fn rejects_duplicate_rules() {
    let json = r#"{
        "rules": [
            { "name": "a", "operator": "Dot" },
            { "name": "a", "operator": { "Literal": "x" } }
        ]
    }"#;

    let err = Grammar::from_json(json).unwrap_err();
    assert!(matches!(err, GrammarError::Json(_)));
    assert!(err.to_string().contains("rule `a` is already defined"));
}

#[test]
fn parse_handwritten() {
    let json = r#"{
        "rules": [
            {
                "name": "pair",
                "operator": { "Sequence": [
                    { "CharRange": { "lo": "a", "hi": "z" } },
                    { "RuleRef": { "name": "pair", "grammar": null } }
                ]},
                "formal_args": []
            }
        ]
    }"#;

    let g = Grammar::from_json(json).unwrap();
    assert_eq!(
        g.find("pair").unwrap().operator,
        seq([range('a', 'z'), rule("pair")])
    );
}
