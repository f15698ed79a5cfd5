//! Lowering the syntax tree into a [`Grammar`].

use std::collections::HashMap;

use indexmap::IndexMap;
use sprout_core::op;
use sprout_core::{Grammar, Operator, Span};

use super::ast::{Expr, Item};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Build a grammar from `items`, attaching registered foreign grammars to
/// the aliases the text declares.
pub(crate) fn lower(
    items: &[Item],
    foreign: &IndexMap<String, Grammar>,
    diagnostics: &mut Diagnostics,
) -> Grammar {
    let mut grammar = Grammar::new();
    let mut rule_spans: HashMap<&str, Span> = HashMap::new();
    let mut alias_spans: HashMap<&str, Span> = HashMap::new();

    for item in items {
        match item {
            Item::Var { name, value } => grammar.set_variable(name, value),
            Item::Setup(code) => grammar.add_setup_action(code),
            Item::Foreign { alias, span } => {
                if let Some(first) = alias_spans.get(alias.as_str()) {
                    diagnostics
                        .report(DiagnosticKind::DuplicateForeign, *span)
                        .message(alias)
                        .related_to("first declared here", *first)
                        .emit();
                    continue;
                }
                alias_spans.insert(alias, *span);

                match foreign.get(alias) {
                    Some(embedded) => {
                        if grammar.add_foreign(alias, embedded.clone()).is_err() {
                            diagnostics
                                .report(DiagnosticKind::DuplicateForeign, *span)
                                .message(alias)
                                .emit();
                        }
                    }
                    None => diagnostics
                        .report(DiagnosticKind::UnknownForeignGrammar, *span)
                        .message(alias)
                        .emit(),
                }
            }
            Item::Rule {
                name,
                span,
                params,
                body,
            } => {
                if grammar
                    .set_with_args(name, params, lower_expr(body))
                    .is_err()
                {
                    let mut report = diagnostics
                        .report(DiagnosticKind::DuplicateRule, *span)
                        .message(name);
                    if let Some(first) = rule_spans.get(name.as_str()) {
                        report = report.related_to("first defined here", *first);
                    }
                    report.emit();
                    continue;
                }
                rule_spans.insert(name, *span);
            }
        }
    }

    grammar
}

pub(crate) fn lower_expr(expr: &Expr) -> Operator {
    match expr {
        Expr::Dot => op::dot(),
        Expr::Literal(text) => op::lit(text),
        Expr::Regex { pattern, .. } => op::regex(pattern),
        Expr::Class { lo, hi, .. } => op::range(*lo, *hi),
        Expr::Seq(items) => op::seq(items.iter().map(lower_expr)),
        Expr::Choice(items) => op::choice(items.iter().map(lower_expr)),
        Expr::Repeat { expr, min, max, .. } => op::repeat(lower_expr(expr), *min, *max),
        Expr::And(expr) => op::and(lower_expr(expr)),
        Expr::Not(expr) => op::not(lower_expr(expr)),
        Expr::Collect(expr) => op::collect(lower_expr(expr)),
        Expr::Bounds(expr) => op::bounds(lower_expr(expr)),
        Expr::Ref {
            grammar: Some(alias),
            name,
            ..
        } => op::foreign_rule(alias, name),
        Expr::Ref { name, .. } => op::rule(name),
        Expr::Invoke {
            grammar: Some(alias),
            name,
            args,
            ..
        } => op::foreign_invoke(alias, name, args.iter().map(lower_expr)),
        Expr::Invoke { name, args, .. } => op::invoke(name, args.iter().map(lower_expr)),
        Expr::Tag { expr, name } => op::tag(lower_expr(expr), name.as_deref()),
        Expr::Action(code) => op::action(code),
    }
}
