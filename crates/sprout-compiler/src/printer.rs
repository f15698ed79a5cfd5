//! Rendering a [`Grammar`] back to grammar text.
//!
//! Parentheses are inserted by precedence only, so reading the printed text
//! yields the same grammar.

use std::fmt::Write as _;

use sprout_core::utils::escape_literal;
use sprout_core::{Grammar, OpKind, Operator};

/// Binding strength, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Choice,
    Seq,
    Prefix,
    Suffix,
    Primary,
}

/// Render `grammar` as grammar text.
///
/// Variables come first, then setup actions, foreign aliases, and the rules
/// in declaration order.
pub fn print(grammar: &Grammar) -> String {
    let mut out = String::new();

    for (name, value) in grammar.variables() {
        let _ = writeln!(out, ":var {name} \"{}\"", escape_literal(value, '"'));
    }
    for code in grammar.setup_actions() {
        let _ = writeln!(out, ":setup {}", action_text(code));
    }
    for (alias, _) in grammar.foreign_grammars() {
        let _ = writeln!(out, ":foreign {alias}");
    }

    for rule in grammar.rules() {
        out.push_str(&rule.name);
        if rule.is_parameterized() {
            let _ = write!(out, "({})", rule.formal_args.join(", "));
        }
        out.push_str(" = ");
        write_op(&mut out, &rule.operator, Prec::Choice);
        out.push('\n');
    }

    out
}

/// Render a single expression.
pub fn print_operator(op: &Operator) -> String {
    let mut out = String::new();
    write_op(&mut out, op, Prec::Choice);
    out
}

fn prec(op: &Operator) -> Prec {
    match op.kind() {
        OpKind::Choice(_) => Prec::Choice,
        OpKind::Sequence(ops) if !ops.is_empty() => Prec::Seq,
        OpKind::And(_) | OpKind::Not(_) | OpKind::Collect(_) | OpKind::Bounds(_) => Prec::Prefix,
        OpKind::Repeat { .. } | OpKind::Tag { .. } => Prec::Suffix,
        _ => Prec::Primary,
    }
}

fn write_op(out: &mut String, op: &Operator, min: Prec) {
    if prec(op) < min {
        out.push('(');
        write_op(out, op, Prec::Choice);
        out.push(')');
        return;
    }

    match op.kind() {
        OpKind::Dot => out.push('.'),
        OpKind::Literal(text) => {
            let _ = write!(out, "'{}'", escape_literal(text, '\''));
        }
        OpKind::Regex(pattern) => {
            let _ = write!(out, "`{}`", pattern.replace('`', "\\`"));
        }
        OpKind::CharRange { lo, hi } => {
            out.push('[');
            out.push_str(&escape_literal(&lo.to_string(), ']'));
            if lo != hi {
                out.push('-');
                out.push_str(&escape_literal(&hi.to_string(), ']'));
            }
            out.push(']');
        }
        OpKind::Sequence(ops) if ops.is_empty() => out.push_str("()"),
        OpKind::Sequence(ops) => write_list(out, ops, " ", Prec::Prefix),
        OpKind::Choice(ops) => write_list(out, ops, " / ", Prec::Seq),
        OpKind::Repeat { op: inner, min, max } => {
            write_op(out, inner, Prec::Suffix);
            let _ = match (min, max) {
                (0, Some(1)) => write!(out, "?"),
                (0, None) => write!(out, "*"),
                (1, None) => write!(out, "+"),
                (n, None) => write!(out, "{{{n},}}"),
                (n, Some(m)) if n == m => write!(out, "{{{n}}}"),
                (n, Some(m)) => write!(out, "{{{n},{m}}}"),
            };
        }
        OpKind::And(inner) => write_prefixed(out, '&', inner),
        OpKind::Not(inner) => write_prefixed(out, '!', inner),
        OpKind::Collect(inner) => write_prefixed(out, '$', inner),
        OpKind::Bounds(inner) => write_prefixed(out, '^', inner),
        OpKind::RuleRef {
            name,
            grammar: Some(alias),
        } => {
            let _ = write!(out, "{alias}.{name}");
        }
        OpKind::RuleRef { name, .. } => out.push_str(name),
        OpKind::Invoke { name, args } => write_call(out, None, name, args),
        OpKind::ForeignInvoke {
            grammar,
            name,
            args,
        } => write_call(out, Some(grammar), name, args),
        OpKind::Tag { op: inner, name } => {
            write_op(out, inner, Prec::Suffix);
            out.push_str(" @");
            if let Some(name) = name {
                out.push_str(name);
            }
        }
        OpKind::Action(code) => out.push_str(&action_text(code)),
    }
}

fn write_list(out: &mut String, ops: &[Operator], sep: &str, min: Prec) {
    for (i, op) in ops.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        write_op(out, op, min);
    }
}

fn write_prefixed(out: &mut String, sigil: char, inner: &Operator) {
    out.push(sigil);
    write_op(out, inner, Prec::Prefix);
}

fn write_call(out: &mut String, alias: Option<&String>, name: &str, args: &[Operator]) {
    out.push('%');
    if let Some(alias) = alias {
        let _ = write!(out, "{alias}.");
    }
    out.push_str(name);
    if !args.is_empty() {
        out.push('(');
        write_list(out, args, ", ", Prec::Choice);
        out.push(')');
    }
}

fn action_text(code: &str) -> String {
    if code.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {code} }}")
    }
}
