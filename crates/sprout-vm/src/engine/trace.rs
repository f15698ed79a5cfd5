//! Tracing infrastructure for debugging parses.
//!
//! # Design: Zero-Cost Abstraction
//!
//! The engine is generic over its tracer and defaults to `NoopTracer`,
//! whose hooks are `#[inline(always)]` empty functions. The compiler
//! removes every call and its arguments, so untraced parsing carries no
//! tracing state at all.
//!
//! Tracing-only state (indentation, per-rule counters) lives in the tracer,
//! never in engine structures.

use std::collections::BTreeMap;

use sprout_core::{Colors, Operator};

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Rule entry/exit, memo hits, left recursion and growth.
    #[default]
    Default,
    /// Also every failed terminal.
    Verbose,
}

/// Tracer trait for engine instrumentation.
///
/// - `trace_enter`/`trace_exit` bracket every evaluation of a rule body,
///   including each re-evaluation while growing a left-recursive seed
/// - `trace_invoke` replaces `trace_enter` for direct (unmemoized) calls
/// - `trace_memo_hit` fires instead of an evaluation when the table answers
pub trait Tracer {
    fn trace_enter(&mut self, rule: &str, pos: usize);

    /// `end` is `None` when the body failed.
    fn trace_exit(&mut self, rule: &str, pos: usize, end: Option<usize>);

    fn trace_memo_hit(&mut self, rule: &str, pos: usize, end: Option<usize>);

    /// A call ran into its own pending application at the same position.
    fn trace_left_recursion(&mut self, rule: &str, pos: usize);

    /// A growth iteration extended the seed to `end`.
    fn trace_grow(&mut self, rule: &str, pos: usize, end: usize);

    fn trace_invoke(&mut self, rule: &str, pos: usize);

    fn trace_foreign(&mut self, alias: &str, rule: &str, pos: usize);

    fn trace_terminal_failure(&mut self, op: &Operator, pos: usize);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter(&mut self, _rule: &str, _pos: usize) {}

    #[inline(always)]
    fn trace_exit(&mut self, _rule: &str, _pos: usize, _end: Option<usize>) {}

    #[inline(always)]
    fn trace_memo_hit(&mut self, _rule: &str, _pos: usize, _end: Option<usize>) {}

    #[inline(always)]
    fn trace_left_recursion(&mut self, _rule: &str, _pos: usize) {}

    #[inline(always)]
    fn trace_grow(&mut self, _rule: &str, _pos: usize, _end: usize) {}

    #[inline(always)]
    fn trace_invoke(&mut self, _rule: &str, _pos: usize) {}

    #[inline(always)]
    fn trace_foreign(&mut self, _alias: &str, _rule: &str, _pos: usize) {}

    #[inline(always)]
    fn trace_terminal_failure(&mut self, _op: &Operator, _pos: usize) {}
}

/// Tracer that collects an indented, optionally colored trace.
///
/// ```text
/// ▶ expr @0
///   ↺ expr @0
/// ◀ expr 0..1
/// ↗ expr 0..3
/// ```
pub struct PrintTracer {
    verbosity: Verbosity,
    colors: Colors,
    lines: Vec<String>,
    depth: usize,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            verbosity,
            colors,
            lines: Vec::new(),
            depth: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    pub fn print(&self) {
        for line in &self.lines {
            println!("{line}");
        }
    }

    fn push(&mut self, symbol: &str, content: String) {
        self.lines
            .push(format!("{:indent$}{symbol} {content}", "", indent = self.depth * 2));
    }

    fn rule_name(&self, rule: &str) -> String {
        let c = self.colors;
        format!("{}{rule}{}", c.rule, c.reset)
    }

    fn at(&self, pos: usize) -> String {
        let c = self.colors;
        format!("{}@{pos}{}", c.position, c.reset)
    }

    fn range(&self, pos: usize, end: Option<usize>) -> String {
        let c = self.colors;
        match end {
            Some(end) => format!("{}{pos}..{end}{}", c.position, c.reset),
            None => format!("{}fail{} {}", c.failure, c.reset, self.at(pos)),
        }
    }
}

impl Tracer for PrintTracer {
    fn trace_enter(&mut self, rule: &str, pos: usize) {
        let content = format!("{} {}", self.rule_name(rule), self.at(pos));
        self.push("▶", content);
        self.depth += 1;
    }

    fn trace_exit(&mut self, rule: &str, pos: usize, end: Option<usize>) {
        self.depth = self.depth.saturating_sub(1);
        let content = format!("{} {}", self.rule_name(rule), self.range(pos, end));
        self.push("◀", content);
    }

    fn trace_memo_hit(&mut self, rule: &str, pos: usize, end: Option<usize>) {
        let content = format!("{} {}", self.rule_name(rule), self.range(pos, end));
        self.push("●", content);
    }

    fn trace_left_recursion(&mut self, rule: &str, pos: usize) {
        let content = format!("{} {}", self.rule_name(rule), self.at(pos));
        self.push("↺", content);
    }

    fn trace_grow(&mut self, rule: &str, pos: usize, end: usize) {
        let content = format!("{} {}", self.rule_name(rule), self.range(pos, Some(end)));
        self.push("↗", content);
    }

    fn trace_invoke(&mut self, rule: &str, pos: usize) {
        let content = format!("%{} {}", self.rule_name(rule), self.at(pos));
        self.push("▶", content);
        self.depth += 1;
    }

    fn trace_foreign(&mut self, alias: &str, rule: &str, pos: usize) {
        let content = format!("{alias}.{} {}", self.rule_name(rule), self.at(pos));
        self.push("⇢", content);
    }

    fn trace_terminal_failure(&mut self, op: &Operator, pos: usize) {
        if self.verbosity != Verbosity::Verbose {
            return;
        }
        let c = self.colors;
        let content = format!(
            "{}{}{} {}",
            c.text,
            op.describe(),
            c.reset,
            self.at(pos)
        );
        self.push("✗", content);
    }
}

/// Counts rule body evaluations, keyed by rule name.
#[derive(Debug, Default)]
pub struct CountingTracer {
    evaluations: BTreeMap<String, usize>,
    memo_hits: usize,
}

impl CountingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the body of `rule` ran.
    pub fn evaluations(&self, rule: &str) -> usize {
        self.evaluations.get(rule).copied().unwrap_or(0)
    }

    pub fn memo_hits(&self) -> usize {
        self.memo_hits
    }
}

impl Tracer for CountingTracer {
    fn trace_enter(&mut self, rule: &str, _pos: usize) {
        *self.evaluations.entry(rule.to_string()).or_default() += 1;
    }

    fn trace_exit(&mut self, _rule: &str, _pos: usize, _end: Option<usize>) {}

    fn trace_memo_hit(&mut self, _rule: &str, _pos: usize, _end: Option<usize>) {
        self.memo_hits += 1;
    }

    fn trace_left_recursion(&mut self, _rule: &str, _pos: usize) {}

    fn trace_grow(&mut self, _rule: &str, _pos: usize, _end: usize) {}

    fn trace_invoke(&mut self, rule: &str, pos: usize) {
        self.trace_enter(rule, pos);
    }

    fn trace_foreign(&mut self, _alias: &str, _rule: &str, _pos: usize) {}

    fn trace_terminal_failure(&mut self, _op: &Operator, _pos: usize) {}
}
