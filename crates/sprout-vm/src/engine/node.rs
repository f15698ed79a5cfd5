//! Match tree produced by a successful parse.

use std::fmt::Write as _;
use std::rc::Rc;

use sprout_core::{Colors, OpKind, Operator, Span};

/// Shared handle to a match node. Memoized results are shared between
/// every call site that hits them.
pub type Match<'a> = Rc<MatchNode<'a>>;

/// A node of the match tree.
///
/// Every node keeps the operator that produced it; value resolution reads
/// actions and captures off the operator, not the node.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchNode<'a> {
    op: &'a Operator,
    span: Span,
    kind: NodeKind<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<'a> {
    /// Terminal span; `text` is the consumed input.
    Leaf(&'a str),
    /// Composite span made of its children.
    Node(Vec<Match<'a>>),
}

impl<'a> MatchNode<'a> {
    pub(crate) fn leaf(op: &'a Operator, span: Span, text: &'a str) -> Match<'a> {
        Rc::new(Self {
            op,
            span,
            kind: NodeKind::Leaf(text),
        })
    }

    pub(crate) fn node(op: &'a Operator, span: Span, children: Vec<Match<'a>>) -> Match<'a> {
        Rc::new(Self {
            op,
            span,
            kind: NodeKind::Node(children),
        })
    }

    pub fn operator(&self) -> &'a Operator {
        self.op
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn kind(&self) -> &NodeKind<'a> {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Consumed text of a leaf.
    pub fn text(&self) -> Option<&'a str> {
        match self.kind {
            NodeKind::Leaf(text) => Some(text),
            NodeKind::Node(_) => None,
        }
    }

    pub fn children(&self) -> &[Match<'a>] {
        match &self.kind {
            NodeKind::Leaf(_) => &[],
            NodeKind::Node(children) => children,
        }
    }

    /// Render the tree, one node per line.
    ///
    /// ```text
    /// seq 0..3
    ///   lit 0..1 "1"
    /// ```
    pub fn dump(&self) -> String {
        self.dump_with(Colors::OFF)
    }

    pub fn dump_with(&self, colors: Colors) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0, &colors);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize, c: &Colors) {
        let label = label(self.op);
        let _ = write!(
            out,
            "{:indent$}{}{label}{} {}{}..{}{}",
            "",
            c.rule,
            c.reset,
            c.position,
            self.span.start,
            self.span.end,
            c.reset,
            indent = depth * 2
        );
        if let NodeKind::Leaf(text) = self.kind
            && !text.is_empty()
        {
            let _ = write!(out, " {}{text:?}{}", c.text, c.reset);
        }
        out.push('\n');
        for child in self.children() {
            child.dump_into(out, depth + 1, c);
        }
    }
}

fn label(op: &Operator) -> String {
    match op.kind() {
        OpKind::Dot => "dot".to_string(),
        OpKind::Literal(_) => "lit".to_string(),
        OpKind::Regex(_) => "regex".to_string(),
        OpKind::CharRange { .. } => "range".to_string(),
        OpKind::Sequence(_) => "seq".to_string(),
        OpKind::Choice(_) => "choice".to_string(),
        OpKind::Repeat { .. } => "repeat".to_string(),
        OpKind::And(_) => "and".to_string(),
        OpKind::Not(_) => "not".to_string(),
        OpKind::RuleRef {
            name,
            grammar: Some(alias),
        } => format!("{alias}.{name}"),
        OpKind::RuleRef { name, .. } => name.clone(),
        OpKind::Invoke { name, .. } => format!("%{name}"),
        OpKind::ForeignInvoke { grammar, name, .. } => format!("%{grammar}.{name}"),
        OpKind::Tag { name: Some(n), .. } => format!("@{n}"),
        OpKind::Tag { name: None, .. } => "@".to_string(),
        OpKind::Action(code) => format!("{{{code}}}"),
        OpKind::Collect(_) => "collect".to_string(),
        OpKind::Bounds(_) => "bounds".to_string(),
    }
}
