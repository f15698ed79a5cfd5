//! Builds the syntax tree from meta-grammar actions.

use sprout_core::Span;
use sprout_core::utils::unescape_literal;
use sprout_vm::{ActionError, Binder};

use super::ast::{Expr, Item};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Semantic value of a meta-grammar match.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Syntax {
    Text(String, Span),
    Span(Span),
    List(Vec<Syntax>),
    Expr(Expr),
    Suffix(Suffix),
    Item(Item),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Suffix {
    Repeat {
        min: u32,
        max: Option<u32>,
        span: Span,
    },
    Tag(Option<String>),
}

/// Decoding problems (bad escapes, oversized counts) become diagnostics;
/// arguments of the wrong shape mean the meta-grammar and this binder
/// disagree, which is an [`ActionError`].
#[derive(Debug, Default)]
pub(crate) struct MetaBinder {
    pub(crate) diagnostics: Diagnostics,
}

impl Binder for MetaBinder {
    type Value = Syntax;

    fn text(&mut self, text: &str, span: Span) -> Syntax {
        Syntax::Text(text.to_string(), span)
    }

    fn bounds(&mut self, span: Span) -> Syntax {
        Syntax::Span(span)
    }

    fn list(&mut self, items: Vec<Syntax>) -> Syntax {
        Syntax::List(items)
    }

    fn action(&mut self, code: &str, args: Vec<Syntax>) -> Result<Syntax, ActionError> {
        let mut args = Args::new(code, args);
        let value = match code {
            "nil" => Syntax::List(Vec::new()),
            "cons" => {
                let head = args.next()?;
                let mut items = vec![head];
                items.extend(args.list()?);
                Syntax::List(items)
            }

            "var" => {
                let (name, _) = args.text()?;
                let (raw, span) = args.text()?;
                let value = self.string(&raw, span);
                Syntax::Item(Item::Var { name, value })
            }
            "setup" => {
                let (raw, _) = args.text()?;
                Syntax::Item(Item::Setup(code_body(&raw)))
            }
            "foreign" => {
                let (alias, span) = args.text()?;
                Syntax::Item(Item::Foreign { alias, span })
            }
            "rule" => {
                let (name, span) = args.text()?;
                let params = args
                    .list()?
                    .into_iter()
                    .map(|p| Args::new(code, vec![p]).text().map(|(name, _)| name))
                    .collect::<Result<Vec<_>, _>>()?;
                let body = args.expr()?;
                Syntax::Item(Item::Rule {
                    name,
                    span,
                    params,
                    body,
                })
            }

            "choice" => {
                let first = args.expr()?;
                let rest = args.exprs()?;
                if rest.is_empty() {
                    Syntax::Expr(first)
                } else {
                    let mut alts = vec![first];
                    alts.extend(rest);
                    Syntax::Expr(Expr::Choice(alts))
                }
            }
            "sequence" => {
                let mut items = args.exprs()?;
                if items.len() == 1 {
                    Syntax::Expr(items.remove(0))
                } else {
                    Syntax::Expr(Expr::Seq(items))
                }
            }
            "and" => Syntax::Expr(Expr::And(Box::new(args.expr()?))),
            "not" => Syntax::Expr(Expr::Not(Box::new(args.expr()?))),
            "collect" => Syntax::Expr(Expr::Collect(Box::new(args.expr()?))),
            "bounds" => Syntax::Expr(Expr::Bounds(Box::new(args.expr()?))),
            "suffixed" => {
                let mut expr = args.expr()?;
                for suffix in args.list()? {
                    let Syntax::Suffix(suffix) = suffix else {
                        return Err(args.malformed());
                    };
                    expr = match suffix {
                        Suffix::Repeat { min, max, span } => Expr::Repeat {
                            expr: Box::new(expr),
                            min,
                            max,
                            span,
                        },
                        Suffix::Tag(name) => Expr::Tag {
                            expr: Box::new(expr),
                            name,
                        },
                    };
                }
                Syntax::Expr(expr)
            }

            "opt" | "star" | "plus" => {
                let (_, span) = args.text()?;
                let (min, max) = match code {
                    "opt" => (0, Some(1)),
                    "star" => (0, None),
                    _ => (1, None),
                };
                Syntax::Suffix(Suffix::Repeat { min, max, span })
            }
            "counted" => {
                let (raw, span) = args.text()?;
                let (min, max) = self.counts(&raw, span);
                Syntax::Suffix(Suffix::Repeat { min, max, span })
            }
            "tag" => {
                let (raw, _) = args.text()?;
                let name = raw.strip_prefix('@').unwrap_or(&raw);
                let name = (!name.is_empty()).then(|| name.to_string());
                Syntax::Suffix(Suffix::Tag(name))
            }

            "literal" => {
                let (raw, span) = args.text()?;
                Syntax::Expr(Expr::Literal(self.string(&raw, span)))
            }
            "regex" => {
                let (raw, span) = args.text()?;
                let pattern = unescape_backticks(strip(&raw, 1));
                Syntax::Expr(Expr::Regex { pattern, span })
            }
            "class" => {
                let (raw, span) = args.text()?;
                let (lo, hi) = self.class(&raw, span);
                Syntax::Expr(Expr::Class { lo, hi, span })
            }
            "action" => {
                let (raw, _) = args.text()?;
                Syntax::Expr(Expr::Action(code_body(&raw)))
            }
            "dot" => Syntax::Expr(Expr::Dot),
            "ref" => {
                let (first, first_span) = args.text()?;
                let (grammar, name, span) = match args.list()?.pop() {
                    Some(Syntax::Text(name, span)) => {
                        (Some(first), name, Span::new(first_span.start, span.end))
                    }
                    Some(_) => return Err(args.malformed()),
                    None => (None, first, first_span),
                };
                Syntax::Expr(Expr::Ref {
                    grammar,
                    name,
                    span,
                })
            }
            "invoke" => {
                let (first, first_span) = args.text()?;
                let (grammar, name, span) = match args.list()?.pop() {
                    Some(Syntax::Text(name, span)) => {
                        (Some(first), name, Span::new(first_span.start, span.end))
                    }
                    Some(_) => return Err(args.malformed()),
                    None => (None, first, first_span),
                };
                let args = args.exprs()?;
                // Cover the `%` sigil too.
                let span = Span::new(span.start.saturating_sub(1), span.end);
                Syntax::Expr(Expr::Invoke {
                    grammar,
                    name,
                    args,
                    span,
                })
            }

            _ => return Err(ActionError::Unbound(code.to_string())),
        };
        Ok(value)
    }
}

impl MetaBinder {
    /// Decode a quoted string token.
    fn string(&mut self, raw: &str, span: Span) -> String {
        let body = strip(raw, 1);
        match unescape_literal(body) {
            Some(text) => text,
            None => {
                self.diagnostics
                    .report(DiagnosticKind::SyntaxError, span)
                    .message("invalid escape sequence")
                    .emit();
                body.to_string()
            }
        }
    }

    /// Decode `{n}`, `{n,}` or `{n,m}`.
    fn counts(&mut self, raw: &str, span: Span) -> (u32, Option<u32>) {
        let body = strip(raw, 1);
        let mut number = |text: &str| match text.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                self.diagnostics
                    .report(DiagnosticKind::SyntaxError, span)
                    .message("repeat count is too large")
                    .emit();
                u32::MAX
            }
        };
        match body.split_once(',') {
            None => {
                let n = number(body);
                (n, Some(n))
            }
            Some((min, "")) => (number(min), None),
            Some((min, max)) => (number(min), Some(number(max))),
        }
    }

    /// Decode `[c]` or `[lo-hi]`.
    fn class(&mut self, raw: &str, span: Span) -> (char, char) {
        let body = strip(raw, 1);
        let (lo_raw, rest) = split_class_char(body);
        let hi_raw = rest.strip_prefix('-').unwrap_or(lo_raw);

        let lo = unescape_literal(lo_raw).and_then(|s| single_char(&s));
        let hi = unescape_literal(hi_raw).and_then(|s| single_char(&s));
        match (lo, hi) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => {
                self.diagnostics
                    .report(DiagnosticKind::SyntaxError, span)
                    .message("invalid escape sequence")
                    .emit();
                ('\0', '\0')
            }
        }
    }
}

/// Positional arguments of one action, consumed front to back.
struct Args<'c> {
    code: &'c str,
    items: std::vec::IntoIter<Syntax>,
}

impl<'c> Args<'c> {
    fn new(code: &'c str, items: Vec<Syntax>) -> Self {
        Self {
            code,
            items: items.into_iter(),
        }
    }

    fn malformed(&self) -> ActionError {
        ActionError::Failed {
            code: self.code.to_string(),
            message: "malformed arguments".to_string(),
        }
    }

    fn next(&mut self) -> Result<Syntax, ActionError> {
        self.items.next().ok_or_else(|| self.malformed())
    }

    fn text(&mut self) -> Result<(String, Span), ActionError> {
        match self.next()? {
            Syntax::Text(text, span) => Ok((text, span)),
            _ => Err(self.malformed()),
        }
    }

    fn list(&mut self) -> Result<Vec<Syntax>, ActionError> {
        match self.next()? {
            Syntax::List(items) => Ok(items),
            _ => Err(self.malformed()),
        }
    }

    fn expr(&mut self) -> Result<Expr, ActionError> {
        match self.next()? {
            Syntax::Expr(expr) => Ok(expr),
            _ => Err(self.malformed()),
        }
    }

    fn exprs(&mut self) -> Result<Vec<Expr>, ActionError> {
        self.list()?
            .into_iter()
            .map(|item| match item {
                Syntax::Expr(expr) => Ok(expr),
                _ => Err(self.malformed()),
            })
            .collect()
    }
}

/// Drop `n` bytes of delimiter from both ends. Delimiters are ASCII.
fn strip(raw: &str, n: usize) -> &str {
    raw.get(n..raw.len().saturating_sub(n)).unwrap_or("")
}

fn code_body(raw: &str) -> String {
    strip(raw.trim_end(), 1).trim().to_string()
}

fn unescape_backticks(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('`') => out.push('`'),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split the first class character (plain, `\x` or `\u{..}`) off `body`.
fn split_class_char(body: &str) -> (&str, &str) {
    let len = if body.starts_with("\\u{") {
        body.find('}').map_or(body.len(), |i| i + 1)
    } else if let Some(rest) = body.strip_prefix('\\') {
        1 + rest.chars().next().map_or(0, char::len_utf8)
    } else {
        body.chars().next().map_or(0, char::len_utf8)
    };
    body.split_at(len)
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}
