//! Operator builders.
//!
//! ```
//! use sprout_core::op::*;
//!
//! // num ('+' num)*
//! let sum = seq([rule("num"), star(seq([lit("+"), rule("num")]))]);
//! assert_eq!(sum.children().len(), 2);
//! ```

use crate::operator::{OpKind, Operator};

pub fn dot() -> Operator {
    Operator::new(OpKind::Dot)
}

pub fn lit(text: impl Into<String>) -> Operator {
    Operator::new(OpKind::Literal(text.into()))
}

pub fn regex(pattern: impl Into<String>) -> Operator {
    Operator::new(OpKind::Regex(pattern.into()))
}

/// One character in `lo..=hi`.
pub fn range(lo: char, hi: char) -> Operator {
    Operator::new(OpKind::CharRange { lo, hi })
}

pub fn seq(ops: impl IntoIterator<Item = Operator>) -> Operator {
    Operator::new(OpKind::Sequence(ops.into_iter().collect()))
}

pub fn choice(ops: impl IntoIterator<Item = Operator>) -> Operator {
    Operator::new(OpKind::Choice(ops.into_iter().collect()))
}

pub fn repeat(op: Operator, min: u32, max: Option<u32>) -> Operator {
    Operator::new(OpKind::Repeat {
        op: Box::new(op),
        min,
        max,
    })
}

/// `op?`
pub fn opt(op: Operator) -> Operator {
    repeat(op, 0, Some(1))
}

/// `op*`
pub fn star(op: Operator) -> Operator {
    repeat(op, 0, None)
}

/// `op+`
pub fn plus(op: Operator) -> Operator {
    repeat(op, 1, None)
}

pub fn and(op: Operator) -> Operator {
    Operator::new(OpKind::And(Box::new(op)))
}

pub fn not(op: Operator) -> Operator {
    Operator::new(OpKind::Not(Box::new(op)))
}

/// End of input.
pub fn eoi() -> Operator {
    not(dot())
}

pub fn rule(name: impl Into<String>) -> Operator {
    Operator::new(OpKind::RuleRef {
        name: name.into(),
        grammar: None,
    })
}

pub fn foreign_rule(alias: impl Into<String>, name: impl Into<String>) -> Operator {
    Operator::new(OpKind::RuleRef {
        name: name.into(),
        grammar: Some(alias.into()),
    })
}

pub fn invoke(name: impl Into<String>, args: impl IntoIterator<Item = Operator>) -> Operator {
    Operator::new(OpKind::Invoke {
        name: name.into(),
        args: args.into_iter().collect(),
    })
}

pub fn foreign_invoke(
    alias: impl Into<String>,
    name: impl Into<String>,
    args: impl IntoIterator<Item = Operator>,
) -> Operator {
    Operator::new(OpKind::ForeignInvoke {
        grammar: alias.into(),
        name: name.into(),
        args: args.into_iter().collect(),
    })
}

/// Marks `op` as an input of the enclosing action, optionally naming it.
pub fn tag(op: Operator, name: Option<&str>) -> Operator {
    Operator::new(OpKind::Tag {
        op: Box::new(op),
        name: name.map(str::to_string),
    })
}

pub fn action(code: impl Into<String>) -> Operator {
    Operator::new(OpKind::Action(code.into()))
}

pub fn collect(op: Operator) -> Operator {
    Operator::new(OpKind::Collect(Box::new(op)))
}

pub fn bounds(op: Operator) -> Operator {
    Operator::new(OpKind::Bounds(Box::new(op)))
}
