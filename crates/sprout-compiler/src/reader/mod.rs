//! Reading grammar text.
//!
//! The text is parsed by a meta-grammar running on the regular engine;
//! a binder turns the match into a syntax tree, which is lowered into a
//! [`Grammar`] and checked.
//!
//! ```
//! use sprout_compiler::GrammarReader;
//!
//! let grammar = GrammarReader::new().read("num = `[0-9]+`").unwrap();
//! assert!(grammar.find("num").is_some());
//! ```

pub(crate) mod ast;
mod binder;
mod lower;
mod meta;


use indexmap::IndexMap;
use sprout_core::{Grammar, Span};
use sprout_vm::{Engine, FuelLimits};

use crate::analyze::analyze;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::{Error, Result};
use ast::Item;
use binder::{MetaBinder, Syntax};

/// Reads grammar text into a [`Grammar`].
///
/// Foreign grammars the text may declare with `:foreign alias` are
/// registered up front.
#[derive(Debug, Clone, Default)]
pub struct GrammarReader {
    foreign: IndexMap<String, Grammar>,
    limits: FuelLimits,
}

impl GrammarReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `grammar` available to text that declares `:foreign alias`.
    pub fn foreign(mut self, alias: impl Into<String>, grammar: Grammar) -> Self {
        self.foreign.insert(alias.into(), grammar);
        self
    }

    /// Limits for the engine that parses the grammar text.
    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Read `source`. Any error diagnostic fails the read.
    pub fn read(&self, source: &str) -> Result<Grammar> {
        self.read_with_diagnostics(source).map(|(grammar, _)| grammar)
    }

    /// Read `source`, also returning warnings.
    pub fn read_with_diagnostics(&self, source: &str) -> Result<(Grammar, Diagnostics)> {
        let mut diagnostics = Diagnostics::new();
        let items = self.parse(source, &mut diagnostics)?;

        let grammar = match items {
            Some(items) => {
                let grammar = lower::lower(&items, &self.foreign, &mut diagnostics);
                analyze(&items, &self.foreign, &mut diagnostics);
                grammar
            }
            None => Grammar::new(),
        };

        diagnostics.sort();
        if diagnostics.has_errors() {
            return Err(Error::GrammarReadError(diagnostics));
        }
        Ok((grammar, diagnostics))
    }

    /// Items of `source`, or `None` after reporting a syntax error.
    fn parse(&self, source: &str, diagnostics: &mut Diagnostics) -> Result<Option<Vec<Item>>> {
        let mut engine = Engine::builder(source, meta::meta_grammar())
            .limits(self.limits)
            .build();

        let Some(matched) = engine.parse(None)? else {
            let pos = engine.failure_position();
            report_syntax_error(source, pos, diagnostics);
            return Ok(None);
        };

        let mut binder = MetaBinder::default();
        let value = matched.value_with(&mut binder)?;
        diagnostics.extend(binder.diagnostics);

        let Syntax::List(values) = value else {
            return Ok(Some(Vec::new()));
        };
        let items = values
            .into_iter()
            .filter_map(|value| match value {
                Syntax::Item(item) => Some(item),
                _ => None,
            })
            .collect();
        Ok(Some(items))
    }
}

fn report_syntax_error(source: &str, pos: usize, diagnostics: &mut Diagnostics) {
    let (message, span) = match source.get(pos..).and_then(|rest| rest.chars().next()) {
        Some(c) if c.is_control() => (
            format!("unexpected `{}`", c.escape_default()),
            Span::new(pos, pos + c.len_utf8()),
        ),
        Some(c) => (
            format!("unexpected `{c}`"),
            Span::new(pos, pos + c.len_utf8()),
        ),
        None => ("unexpected end of input".to_string(), Span::new(pos, pos)),
    };
    diagnostics
        .report(DiagnosticKind::SyntaxError, span)
        .message(message)
        .emit();
}
