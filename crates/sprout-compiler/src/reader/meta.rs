//! The grammar of grammar text, built with the core operator builders.
//!
//! Every rule that produces syntax ends in an action; [`MetaBinder`]
//! (see `binder.rs`) turns those actions into tree nodes. Tokens swallow
//! trailing whitespace and comments through the `_` rule.
//!
//! [`MetaBinder`]: super::binder::MetaBinder

use std::sync::OnceLock;

use sprout_core::Grammar;
use sprout_core::Operator;
use sprout_core::op::*;

const IDENT: &str = "[A-Za-z_][A-Za-z0-9_]*";
const STRING: &str = r#"'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*""#;
const REGEX: &str = r"`(?:[^`\\]|\\.)*`";
const CLASS_CHAR: &str = r"(?:\\u\{[0-9a-fA-F]+\}|\\.|[^\]\\])";
const COUNTED: &str = r"\{[0-9]+(?:,[0-9]*)?\}";
const SKIP: &str = r"(?:[ \t\r\n]+|#[^\n]*)*";

pub(crate) fn meta_grammar() -> &'static Grammar {
    static META: OnceLock<Grammar> = OnceLock::new();
    META.get_or_init(build)
}

fn ws() -> Operator {
    rule("_")
}

/// Literal token followed by whitespace.
fn tok(text: &str) -> Operator {
    seq([lit(text), ws()])
}

/// Keyword: a token that cannot continue as an identifier.
fn kw(text: &str) -> Operator {
    seq([lit(text), not(regex("[A-Za-z0-9_]")), ws()])
}

fn cap(op: Operator) -> Operator {
    tag(op, None)
}

/// `item (sep item)*` as a list, or an empty list.
fn list_of(item: &str, sep: &str) -> Operator {
    choice([
        seq([
            cap(rule(item)),
            cap(star(seq([tok(sep), cap(rule(item))]))),
            action("cons"),
        ]),
        action("nil"),
    ])
}

fn build() -> Grammar {
    let rules = [
        ("root", seq([ws(), cap(star(rule("item"))), eoi()])),
        ("_", regex(SKIP)),
        ("ident", collect(regex(IDENT))),
        ("name", seq([cap(rule("ident")), ws()])),
        ("string", seq([cap(collect(regex(STRING))), ws()])),
        (
            "code",
            seq([
                cap(collect(seq([lit("{"), rule("braces"), lit("}")]))),
                ws(),
            ]),
        ),
        (
            "braces",
            star(choice([
                regex("[^{}]+"),
                seq([lit("{"), rule("braces"), lit("}")]),
            ])),
        ),
        ("item", choice([rule("directive"), rule("rule_def")])),
        (
            "directive",
            choice([
                seq([
                    kw(":var"),
                    cap(rule("name")),
                    cap(rule("string")),
                    action("var"),
                ]),
                seq([kw(":setup"), cap(rule("code")), action("setup")]),
                seq([kw(":foreign"), cap(rule("name")), action("foreign")]),
            ]),
        ),
        (
            "rule_def",
            seq([
                cap(rule("name")),
                cap(choice([rule("params"), action("nil")])),
                tok("="),
                cap(rule("choice")),
                opt(tok(";")),
                action("rule"),
            ]),
        ),
        (
            "def_head",
            seq([rule("name"), opt(rule("params")), lit("=")]),
        ),
        (
            "params",
            seq([tok("("), cap(list_of("name", ",")), tok(")")]),
        ),
        (
            "choice",
            seq([
                cap(rule("sequence")),
                cap(star(seq([
                    choice([tok("/"), tok("|")]),
                    cap(rule("sequence")),
                ]))),
                action("choice"),
            ]),
        ),
        (
            "sequence",
            seq([cap(star(rule("prefixed"))), action("sequence")]),
        ),
        (
            "prefixed",
            choice([
                seq([tok("&"), cap(rule("prefixed")), action("and")]),
                seq([tok("!"), cap(rule("prefixed")), action("not")]),
                seq([tok("$"), cap(rule("prefixed")), action("collect")]),
                seq([tok("^"), cap(rule("prefixed")), action("bounds")]),
                rule("suffixed"),
            ]),
        ),
        (
            "suffixed",
            seq([
                cap(rule("primary")),
                cap(star(rule("suffix"))),
                action("suffixed"),
            ]),
        ),
        (
            "suffix",
            choice([
                seq([cap(collect(lit("?"))), ws(), action("opt")]),
                seq([cap(collect(lit("*"))), ws(), action("star")]),
                seq([cap(collect(lit("+"))), ws(), action("plus")]),
                seq([cap(collect(regex(COUNTED))), ws(), action("counted")]),
                seq([
                    cap(collect(seq([lit("@"), opt(regex(IDENT))]))),
                    ws(),
                    action("tag"),
                ]),
            ]),
        ),
        (
            "primary",
            choice([
                seq([cap(rule("string")), action("literal")]),
                seq([cap(collect(regex(REGEX))), ws(), action("regex")]),
                seq([
                    cap(collect(seq([
                        lit("["),
                        regex(CLASS_CHAR),
                        opt(seq([lit("-"), regex(CLASS_CHAR)])),
                        lit("]"),
                    ]))),
                    ws(),
                    action("class"),
                ]),
                rule("call"),
                seq([cap(rule("code")), action("action")]),
                seq([tok("("), cap(rule("choice")), tok(")")]),
                seq([tok("."), action("dot")]),
                seq([
                    not(rule("def_head")),
                    cap(rule("ident")),
                    cap(opt(seq([lit("."), cap(rule("ident"))]))),
                    ws(),
                    action("ref"),
                ]),
            ]),
        ),
        // Arguments must touch the name, so `%w (x)` is a call followed by a group.
        (
            "call",
            seq([
                lit("%"),
                cap(rule("ident")),
                cap(opt(seq([lit("."), cap(rule("ident"))]))),
                cap(choice([
                    seq([lit("("), ws(), cap(list_of("choice", ",")), tok(")")]),
                    action("nil"),
                ])),
                ws(),
                action("invoke"),
            ]),
        ),
    ];

    let mut grammar = Grammar::new();
    for (name, body) in rules {
        grammar
            .set(name, body)
            .expect("meta-grammar rule names are unique");
    }
    grammar
}
