//! Terminal and quantifier validation.

use regex_syntax::Parser;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::reader::ast::{Expr, Item};

pub(crate) fn check_terminals(items: &[Item], diagnostics: &mut Diagnostics) {
    for item in items {
        let Item::Rule { body, .. } = item else {
            continue;
        };
        body.walk(&mut |expr| check_expr(expr, diagnostics));
    }
}

fn check_expr(expr: &Expr, diagnostics: &mut Diagnostics) {
    match expr {
        Expr::Regex { pattern, span } => match Parser::new().parse(pattern) {
            Err(err) => {
                diagnostics
                    .report(DiagnosticKind::InvalidRegex, *span)
                    .message(regex_error_message(&err))
                    .emit();
            }
            // The engine's DFAs cannot evaluate these.
            Ok(hir) if hir.properties().look_set().contains_word_unicode() => {
                diagnostics
                    .report(DiagnosticKind::InvalidRegex, *span)
                    .message("Unicode word boundaries are not supported")
                    .hint(r"use `(?-u:\b)` for an ASCII word boundary")
                    .emit();
            }
            Ok(_) => {}
        },
        Expr::Class { lo, hi, span } if lo > hi => {
            diagnostics
                .report(DiagnosticKind::InvalidCharRange, *span)
                .message(format!("{lo:?} sorts after {hi:?}"))
                .emit();
        }
        Expr::Repeat {
            min,
            max: Some(max),
            span,
            ..
        } if min > max => {
            diagnostics
                .report(DiagnosticKind::InvalidRepeatBounds, *span)
                .message(format!("minimum {min} exceeds maximum {max}"))
                .emit();
        }
        _ => {}
    }
}

/// The kind alone; the full error repeats the pattern with carets.
fn regex_error_message(err: &regex_syntax::Error) -> String {
    match err {
        regex_syntax::Error::Parse(e) => e.kind().to_string(),
        regex_syntax::Error::Translate(e) => e.kind().to_string(),
        _ => err.to_string(),
    }
}
