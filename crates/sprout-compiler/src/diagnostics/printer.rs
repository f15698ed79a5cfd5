//! Rendering diagnostics, plain or as annotated source snippets.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use sprout_core::Span;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};

/// Renders a [`Diagnostics`] collection.
///
/// Without a source text every diagnostic prints as one line with byte
/// offsets; with one, each becomes a snippet with carets under its span.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    /// File name shown in the snippet header.
    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = match (self.source, self.colored) {
            (None, _) => None,
            (Some(_), true) => Some(Renderer::styled()),
            (Some(_), false) => Some(Renderer::plain()),
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            match (&renderer, self.source) {
                (Some(renderer), Some(source)) => {
                    let report = [self.group(diag, source)];
                    write!(w, "{}", renderer.render(&report))?;
                }
                _ => write!(w, "{diag}")?,
            }
        }
        Ok(())
    }

    fn group<'a>(&'a self, diag: &'a DiagnosticMessage, source: &'a str) -> Group<'a> {
        let limit = source.len();
        let primary = AnnotationKind::Primary
            .span(clamp(diag.span, limit))
            .label(&diag.message);

        let mut snippet = Snippet::source(source).line_start(1).annotation(primary);
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        for related in &diag.related {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(clamp(related.span, limit))
                    .label(&related.message),
            );
        }

        let mut group = level(diag.severity())
            .primary_title(&diag.message)
            .element(snippet);
        for hint in &diag.hints {
            group = group.element(Level::HELP.message(hint));
        }
        group
    }
}

fn level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

/// Byte range inside `0..=limit`; an empty span still covers one column.
fn clamp(span: Span, limit: usize) -> std::ops::Range<usize> {
    let start = span.start.min(limit);
    let end = span.end.min(limit);
    if start == end {
        start..(start + 1).min(limit)
    } else {
        start..end
    }
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}
