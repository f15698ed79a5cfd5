use indoc::indoc;

use crate::{
    Actions, CountingTracer, DiagnosticKind, Engine, Error, Grammar, GrammarReader, Value,
    print, read_grammar, report_failure,
};

const CALC: &str = indoc! {"
    root = expr @ !.
    expr = expr @ '+' term @ {add}
         / expr @ '-' term @ {sub}
         / term
    term = num / '(' expr @ ')'
    num = $`[0-9]+` {int}
"};

fn calc_actions() -> Actions<'static, Value> {
    fn int(v: &Value) -> i64 {
        v.as_int().unwrap()
    }
    Actions::new()
        .on("int", |args: Vec<Value>| Value::Int(args[0].as_str().unwrap().parse().unwrap()))
        .on("add", |args| Value::Int(int(&args[0]) + int(&args[1])))
        .on("sub", |args| Value::Int(int(&args[0]) - int(&args[1])))
}

fn eval(grammar: &Grammar, input: &str) -> Option<i64> {
    let mut engine = Engine::new(input, grammar);
    let tree = engine.parse(None).unwrap()?;
    tree.value_with(&mut calc_actions()).unwrap().as_int()
}

#[test]
fn calculator_sums() {
    let grammar = read_grammar(CALC).unwrap();

    assert_eq!(eval(&grammar, "1+2+3"), Some(6));
    assert_eq!(eval(&grammar, "42"), Some(42));
    assert_eq!(eval(&grammar, "2-(3+4)"), Some(-5));
}

#[test]
fn repetition_sum_with_single_action() {
    let grammar = read_grammar(indoc! {"
        sum = num @ ('+' num @)* @ {sum} !.
        num = $`[0-9]+`
    "})
    .unwrap();
    let mut actions = Actions::new().on("sum", |args: Vec<Value>| {
        let int = |v: &Value| v.as_str().unwrap().parse::<i64>().unwrap();
        let rest: i64 = args[1].as_array().unwrap().iter().map(int).sum();
        Value::Int(int(&args[0]) + rest)
    });

    let mut engine = Engine::new("1+2+3", &grammar);
    let tree = engine.parse(None).unwrap().unwrap();
    assert_eq!(tree.value_with(&mut actions).unwrap(), Value::Int(6));

    let mut engine = Engine::new("1+2+", &grammar);
    assert!(engine.parse(None).unwrap().is_none());
    assert_eq!(engine.failure_position(), 4);
}

#[test]
fn left_recursion_is_left_associative() {
    let grammar = read_grammar(CALC).unwrap();

    assert_eq!(eval(&grammar, "10-4-3"), Some(3));

    let mut engine = Engine::new("1+2+3", &grammar);
    let tree = engine.parse(Some("expr")).unwrap().unwrap();
    insta::assert_snapshot!(
        tree.value().to_string(),
        @r#"add(add(int("1"), int("2")), int("3"))"#
    );
    assert!(engine.memo_stats().growths >= 1);
}

#[test]
fn rejected_input_reports_furthest_failure() {
    let grammar = read_grammar(CALC).unwrap();
    let source = "1+2+";
    let mut engine = Engine::new(source, &grammar);

    assert!(engine.parse(None).unwrap().is_none());
    assert_eq!(engine.failure_position(), 4);

    let diagnostics = report_failure(engine.failure().unwrap(), source);
    assert_eq!(diagnostics.kinds(), [DiagnosticKind::UnexpectedInput]);
    assert!(diagnostics.to_string().starts_with("error at 4..4: expected"));
}

#[test]
fn memoized_rules_run_once_per_position() {
    let grammar = read_grammar(indoc! {"
        root = item 'x' / item 'y'
        item = `[a-z]+`
    "})
    .unwrap();

    let mut engine = Engine::builder("abcy", &grammar)
        .tracer(CountingTracer::new())
        .build();
    assert!(engine.parse(None).unwrap().is_some());
    assert_eq!(engine.tracer().evaluations("item"), 1);
    assert_eq!(engine.use_count("item", 0), Some(1));
}

#[test]
fn foreign_grammar_delegation() {
    let digits = read_grammar(indoc! {"
        num = `[0-9]+`
        list(x) = x (',' x)*
    "})
    .unwrap();
    let grammar = GrammarReader::new()
        .foreign("digits", digits)
        .read(indoc! {"
            :foreign digits
            root = '[' %digits.list(digits.num) ']' !.
        "})
        .unwrap();

    let mut engine = Engine::new("[1,22,333]", &grammar);
    let tree = engine.parse(None).unwrap().unwrap();
    assert_eq!(tree.span().end, 10);

    let mut engine = Engine::new("[1,x]", &grammar);
    assert!(engine.parse(None).unwrap().is_none());
    assert_eq!(engine.failure_position(), 3);
}

#[test]
fn invalid_grammar_text() {
    let source = "root = 'a' missing";
    let Err(Error::GrammarReadError(diagnostics)) = read_grammar(source) else {
        panic!("expected a read error");
    };

    insta::assert_snapshot!(diagnostics.render(source), @r"
    error: `missing` is not defined
      |
    1 | root = 'a' missing
      |            ^^^^^^^
    ");
}

#[test]
fn grammar_survives_text_and_serialization() {
    let grammar = read_grammar(CALC).unwrap();

    assert_eq!(read_grammar(&print(&grammar)).unwrap(), grammar);
    assert_eq!(Grammar::from_json(&grammar.to_json().unwrap()).unwrap(), grammar);
    assert_eq!(Grammar::from_binary(&grammar.to_binary()).unwrap(), grammar);
}

#[test]
fn structural_value_serializes_to_json() {
    let grammar = read_grammar("pair = $`[a-z]+` '=' ^`[0-9]+`").unwrap();
    let mut engine = Engine::new("key=42", &grammar);
    let tree = engine.parse(None).unwrap().unwrap();

    let json = serde_json::to_string(&tree.value()).unwrap();
    insta::assert_snapshot!(json, @r#"["key",[4,6]]"#);
}
