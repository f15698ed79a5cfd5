//! The operator algebra: immutable parsing-expression trees.
//!
//! Operators are built exclusively through the helpers in [`crate::op`].
//! Once built, a tree can be inspected through [`Operator::kind`],
//! [`Operator::children`] and [`Operator::walk`] but never mutated.
//! Recursion between rules only happens through named references, so an
//! operator tree is always finite.

use serde::{Deserialize, Serialize};

use crate::utils::escape_literal;

/// A parsing expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Operator {
    kind: OpKind,
}

/// Operator variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    /// Any single character.
    Dot,
    /// Exact text.
    Literal(String),
    /// Regular expression anchored at the cursor.
    Regex(String),
    /// One character within `lo..=hi`.
    CharRange { lo: char, hi: char },
    /// All operands, consecutively.
    Sequence(Vec<Operator>),
    /// First operand that matches.
    Choice(Vec<Operator>),
    /// Greedy repetition. `max: None` is unbounded.
    Repeat {
        op: Box<Operator>,
        min: u32,
        max: Option<u32>,
    },
    /// Positive lookahead.
    And(Box<Operator>),
    /// Negative lookahead.
    Not(Box<Operator>),
    /// Memoized rule application, optionally in a foreign grammar.
    RuleRef {
        name: String,
        grammar: Option<String>,
    },
    /// Direct (unmemoized) rule call with arguments.
    Invoke { name: String, args: Vec<Operator> },
    /// Direct call into a foreign grammar.
    ForeignInvoke {
        grammar: String,
        name: String,
        args: Vec<Operator>,
    },
    /// Marks the operand's value as an input of the enclosing action.
    Tag {
        op: Box<Operator>,
        name: Option<String>,
    },
    /// Zero-width semantic hook.
    Action(String),
    /// Captures the consumed text.
    Collect(Box<Operator>),
    /// Captures the consumed byte range.
    Bounds(Box<Operator>),
}

impl Operator {
    pub(crate) fn new(kind: OpKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> &OpKind {
        &self.kind
    }

    /// Direct operands, in order. Invocation arguments count as operands.
    pub fn children(&self) -> &[Operator] {
        match &self.kind {
            OpKind::Sequence(ops) | OpKind::Choice(ops) => ops,
            OpKind::Invoke { args, .. } | OpKind::ForeignInvoke { args, .. } => args,
            OpKind::Repeat { op, .. }
            | OpKind::And(op)
            | OpKind::Not(op)
            | OpKind::Tag { op, .. }
            | OpKind::Collect(op)
            | OpKind::Bounds(op) => std::slice::from_ref(op.as_ref()),
            OpKind::Dot
            | OpKind::Literal(_)
            | OpKind::Regex(_)
            | OpKind::CharRange { .. }
            | OpKind::RuleRef { .. }
            | OpKind::Action(_) => &[],
        }
    }

    /// Pre-order traversal of the whole tree.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Operator)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Rule, invoke or tag name.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            OpKind::RuleRef { name, .. }
            | OpKind::Invoke { name, .. }
            | OpKind::ForeignInvoke { name, .. } => Some(name),
            OpKind::Tag { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    /// Foreign grammar alias of a rule reference or foreign invoke.
    pub fn grammar(&self) -> Option<&str> {
        match &self.kind {
            OpKind::RuleRef { grammar, .. } => grammar.as_deref(),
            OpKind::ForeignInvoke { grammar, .. } => Some(grammar),
            _ => None,
        }
    }

    /// Code of an `Action` operator.
    pub fn action_code(&self) -> Option<&str> {
        match &self.kind {
            OpKind::Action(code) => Some(code),
            _ => None,
        }
    }

    pub fn is_action(&self) -> bool {
        matches!(self.kind, OpKind::Action(_))
    }

    /// Operators whose values survive pruning inside a sequence.
    pub fn is_capture(&self) -> bool {
        matches!(
            self.kind,
            OpKind::Tag { .. } | OpKind::Collect(_) | OpKind::Bounds(_)
        )
    }

    /// Operators that consume input themselves rather than through operands.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            OpKind::Dot | OpKind::Literal(_) | OpKind::Regex(_) | OpKind::CharRange { .. }
        )
    }

    /// Short human-readable text for "expected ..." diagnostics.
    pub fn describe(&self) -> String {
        match &self.kind {
            OpKind::Dot => "any character".to_string(),
            OpKind::Literal(text) => format!("'{}'", escape_literal(text, '\'')),
            OpKind::Regex(pattern) => format!("`{pattern}`"),
            OpKind::CharRange { lo, hi } if lo == hi => format!("{lo:?}"),
            OpKind::CharRange { lo, hi } => format!("[{lo:?}-{hi:?}]"),
            OpKind::Not(op) if matches!(op.kind, OpKind::Dot) => "end of input".to_string(),
            OpKind::Not(op) => format!("not {}", op.describe()),
            OpKind::And(op) => op.describe(),
            OpKind::RuleRef {
                name,
                grammar: Some(alias),
            }
            | OpKind::ForeignInvoke {
                grammar: alias,
                name,
                ..
            } => format!("{alias}.{name}"),
            OpKind::RuleRef { name, .. } | OpKind::Invoke { name, .. } => name.clone(),
            OpKind::Sequence(ops) => match ops.first() {
                Some(first) => first.describe(),
                None => "nothing".to_string(),
            },
            OpKind::Choice(ops) => ops
                .iter()
                .map(Operator::describe)
                .collect::<Vec<_>>()
                .join(" or "),
            OpKind::Repeat { op, .. }
            | OpKind::Tag { op, .. }
            | OpKind::Collect(op)
            | OpKind::Bounds(op) => op.describe(),
            OpKind::Action(code) => format!("{{{code}}}"),
        }
    }
}
