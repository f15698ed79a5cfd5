//! Syntax tree of grammar text, with the spans diagnostics point at.
//!
//! The tree only lives between the meta-grammar parse and lowering into a
//! [`Grammar`](sprout_core::Grammar); analysis runs on it because operators
//! carry no source positions.

use sprout_core::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Dot,
    Literal(String),
    Regex {
        pattern: String,
        span: Span,
    },
    Class {
        lo: char,
        hi: char,
        span: Span,
    },
    Seq(Vec<Expr>),
    Choice(Vec<Expr>),
    Repeat {
        expr: Box<Expr>,
        min: u32,
        max: Option<u32>,
        span: Span,
    },
    And(Box<Expr>),
    Not(Box<Expr>),
    Collect(Box<Expr>),
    Bounds(Box<Expr>),
    Ref {
        grammar: Option<String>,
        name: String,
        span: Span,
    },
    Invoke {
        grammar: Option<String>,
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
    Tag {
        expr: Box<Expr>,
        name: Option<String>,
    },
    Action(String),
}

impl Expr {
    /// Direct sub-expressions, including invocation arguments.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Seq(items) | Expr::Choice(items) => items.iter().collect(),
            Expr::Invoke { args, .. } => args.iter().collect(),
            Expr::Repeat { expr, .. }
            | Expr::And(expr)
            | Expr::Not(expr)
            | Expr::Collect(expr)
            | Expr::Bounds(expr)
            | Expr::Tag { expr, .. } => vec![expr],
            Expr::Dot
            | Expr::Literal(_)
            | Expr::Regex { .. }
            | Expr::Class { .. }
            | Expr::Ref { .. }
            | Expr::Action(_) => Vec::new(),
        }
    }

    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Var {
        name: String,
        value: String,
    },
    Setup(String),
    Foreign {
        alias: String,
        span: Span,
    },
    Rule {
        name: String,
        span: Span,
        params: Vec<String>,
        body: Expr,
    },
}
