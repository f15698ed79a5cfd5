//! Reference resolution: every name a rule body mentions must exist.
//!
//! A plain reference resolves to a formal argument of the enclosing rule
//! first, then to a rule of the grammar. `alias.name` resolves in the
//! foreign grammar registered under a declared alias. Calls are checked
//! for argument count; a plain reference to a parameterized rule is a call
//! with no arguments.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use sprout_core::{Grammar, Span};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::reader::ast::{Expr, Item};

/// What a rule name resolves to in the grammar being read.
#[derive(Clone, Copy)]
struct RuleInfo {
    arity: usize,
    span: Span,
}

struct Resolver<'a> {
    rules: HashMap<&'a str, RuleInfo>,
    /// Declared aliases and the grammar registered for each, if any.
    aliases: HashMap<&'a str, Option<&'a Grammar>>,
    used_aliases: HashSet<&'a str>,
    diagnostics: &'a mut Diagnostics,
}

pub(crate) fn check_references(
    items: &[Item],
    foreign: &IndexMap<String, Grammar>,
    diagnostics: &mut Diagnostics,
) {
    let mut rules = HashMap::new();
    let mut aliases = HashMap::new();
    let mut declarations = Vec::new();
    for item in items {
        match item {
            Item::Rule {
                name, span, params, ..
            } => {
                rules.entry(name.as_str()).or_insert(RuleInfo {
                    arity: params.len(),
                    span: *span,
                });
            }
            Item::Foreign { alias, span } => {
                aliases.insert(alias.as_str(), foreign.get(alias));
                declarations.push((alias.as_str(), *span));
            }
            Item::Var { .. } | Item::Setup(_) => {}
        }
    }

    let mut resolver = Resolver {
        rules,
        aliases,
        used_aliases: HashSet::new(),
        diagnostics,
    };

    for item in items {
        if let Item::Rule { params, body, .. } = item {
            resolver.expr(body, params);
        }
    }

    for (alias, span) in declarations {
        let registered = matches!(resolver.aliases.get(alias), Some(Some(_)));
        if registered && !resolver.used_aliases.contains(alias) {
            resolver
                .diagnostics
                .report(DiagnosticKind::UnusedForeign, span)
                .message(alias)
                .emit();
        }
    }
}

impl<'a> Resolver<'a> {
    fn expr(&mut self, expr: &'a Expr, params: &[String]) {
        match expr {
            Expr::Ref {
                grammar: None,
                name,
                span,
            } => {
                if params.iter().any(|p| p == name) {
                    return;
                }
                self.local_call(name, 0, *span);
            }
            Expr::Ref {
                grammar: Some(alias),
                name,
                span,
            } => self.foreign_call(alias, name, 0, *span),
            Expr::Invoke {
                grammar,
                name,
                args,
                span,
            } => {
                match grammar {
                    Some(alias) => self.foreign_call(alias, name, args.len(), *span),
                    None => self.local_call(name, args.len(), *span),
                }
                for arg in args {
                    self.expr(arg, params);
                }
            }
            _ => {
                for child in expr.children() {
                    self.expr(child, params);
                }
            }
        }
    }

    fn local_call(&mut self, name: &str, found: usize, span: Span) {
        let Some(info) = self.rules.get(name).copied() else {
            self.diagnostics
                .report(DiagnosticKind::UndefinedReference, span)
                .message(name)
                .emit();
            return;
        };
        if info.arity != found {
            self.diagnostics
                .report(DiagnosticKind::ArityMismatch, span)
                .message(arity_message(name, info.arity, found))
                .related_to(format!("`{name}` declared here"), info.span)
                .emit();
        }
    }

    fn foreign_call(&mut self, alias: &'a str, name: &str, found: usize, span: Span) {
        let Some(registered) = self.aliases.get(alias).copied() else {
            self.diagnostics
                .report(DiagnosticKind::UnknownForeignGrammar, span)
                .message(alias)
                .hint(format!("declare it with `:foreign {alias}`"))
                .emit();
            return;
        };
        self.used_aliases.insert(alias);

        // Unregistered aliases are reported where they are declared.
        let Some(grammar) = registered else {
            return;
        };
        let qualified = format!("{alias}.{name}");
        match grammar.find(name) {
            None => self
                .diagnostics
                .report(DiagnosticKind::UndefinedReference, span)
                .message(&qualified)
                .emit(),
            Some(rule) if rule.arity() != found => self
                .diagnostics
                .report(DiagnosticKind::ArityMismatch, span)
                .message(arity_message(&qualified, rule.arity(), found))
                .emit(),
            Some(_) => {}
        }
    }
}

fn arity_message(name: &str, expected: usize, found: usize) -> String {
    format!("`{name}` takes {expected} argument(s) but {found} were supplied")
}
