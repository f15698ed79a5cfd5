//! Value resolution: turning a match tree into host values.
//!
//! The engine only knows positional binding. A [`Binder`] decides what a
//! leaf, a span, a list and an action become; [`Actions`] is a binder
//! backed by closures keyed by action code, [`Structural`] builds plain
//! [`Value`]s without running anything.

use std::collections::HashMap;

use sprout_core::{Grammar, OpKind, Span};

use super::error::ActionError;
use super::node::{Match, MatchNode, NodeKind};
use super::value::Value;

pub trait Binder {
    type Value;

    /// Value of a terminal or collected span.
    fn text(&mut self, text: &str, span: Span) -> Self::Value;

    /// Value of a `Bounds` capture.
    fn bounds(&mut self, span: Span) -> Self::Value;

    fn list(&mut self, items: Vec<Self::Value>) -> Self::Value;

    /// Run the action `code` over positional arguments.
    fn action(&mut self, code: &str, args: Vec<Self::Value>)
    -> Result<Self::Value, ActionError>;

    /// Run a grammar setup action. Setup hooks are optional.
    fn setup(&mut self, _code: &str) -> Result<(), ActionError> {
        Ok(())
    }
}

/// Host value types that leaves, spans and lists can be lifted into.
pub trait MatchValue: Sized {
    fn from_text(text: &str, span: Span) -> Self;
    fn from_span(span: Span) -> Self;
    fn from_list(items: Vec<Self>) -> Self;
}

impl MatchValue for Value {
    fn from_text(text: &str, _span: Span) -> Self {
        Value::String(text.to_string())
    }

    fn from_span(span: Span) -> Self {
        Value::Span(span)
    }

    fn from_list(items: Vec<Self>) -> Self {
        Value::Array(items)
    }
}

/// Binder that records actions instead of running them.
#[derive(Debug, Default, Clone, Copy)]
pub struct Structural;

impl Binder for Structural {
    type Value = Value;

    fn text(&mut self, text: &str, span: Span) -> Value {
        Value::from_text(text, span)
    }

    fn bounds(&mut self, span: Span) -> Value {
        Value::from_span(span)
    }

    fn list(&mut self, items: Vec<Value>) -> Value {
        Value::from_list(items)
    }

    fn action(&mut self, code: &str, args: Vec<Value>) -> Result<Value, ActionError> {
        Ok(Value::Tagged {
            tag: code.to_string(),
            data: args,
        })
    }
}

type ActionFn<'f, V> = Box<dyn FnMut(Vec<V>) -> Result<V, ActionError> + 'f>;
type SetupFn<'f> = Box<dyn FnMut() + 'f>;

/// Closure registry keyed by action code.
///
/// ```
/// use sprout_vm::{Actions, Value};
///
/// let actions = Actions::<Value>::new().on("len", |args| Value::Int(args.len() as i64));
/// # drop(actions);
/// ```
pub struct Actions<'f, V> {
    actions: HashMap<String, ActionFn<'f, V>>,
    setups: HashMap<String, SetupFn<'f>>,
}

impl<V> Default for Actions<'_, V> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
            setups: HashMap::new(),
        }
    }
}

impl<'f, V: MatchValue> Actions<'f, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        mut self,
        code: impl Into<String>,
        mut f: impl FnMut(Vec<V>) -> V + 'f,
    ) -> Self {
        self.actions
            .insert(code.into(), Box::new(move |args| Ok(f(args))));
        self
    }

    /// Register a fallible action. An `Err(message)` aborts resolution.
    pub fn try_on(
        mut self,
        code: impl Into<String>,
        mut f: impl FnMut(Vec<V>) -> Result<V, String> + 'f,
    ) -> Self {
        let code = code.into();
        let name = code.clone();
        self.actions.insert(
            code,
            Box::new(move |args| {
                f(args).map_err(|message| ActionError::Failed {
                    code: name.clone(),
                    message,
                })
            }),
        );
        self
    }

    pub fn on_setup(mut self, code: impl Into<String>, f: impl FnMut() + 'f) -> Self {
        self.setups.insert(code.into(), Box::new(f));
        self
    }
}

impl<V: MatchValue> Binder for Actions<'_, V> {
    type Value = V;

    fn text(&mut self, text: &str, span: Span) -> V {
        V::from_text(text, span)
    }

    fn bounds(&mut self, span: Span) -> V {
        V::from_span(span)
    }

    fn list(&mut self, items: Vec<V>) -> V {
        V::from_list(items)
    }

    fn action(&mut self, code: &str, args: Vec<V>) -> Result<V, ActionError> {
        let f = self
            .actions
            .get_mut(code)
            .ok_or_else(|| ActionError::Unbound(code.to_string()))?;
        f(args)
    }

    fn setup(&mut self, code: &str) -> Result<(), ActionError> {
        if let Some(f) = self.setups.get_mut(code) {
            f();
        }
        Ok(())
    }
}

/// Run a grammar's setup actions through `binder`, in declaration order.
pub fn run_setup<B: Binder + ?Sized>(
    grammar: &Grammar,
    binder: &mut B,
) -> Result<(), ActionError> {
    for code in grammar.setup_actions() {
        binder.setup(code)?;
    }
    Ok(())
}

impl MatchNode<'_> {
    /// Structural value of this match; actions become [`Value::Tagged`].
    pub fn value(&self) -> Value {
        resolve(self, &mut Structural).expect("structural binding never fails")
    }

    pub fn value_with<B: Binder + ?Sized>(
        &self,
        binder: &mut B,
    ) -> Result<B::Value, ActionError> {
        resolve(self, binder)
    }
}

fn resolve<B: Binder + ?Sized>(
    node: &MatchNode<'_>,
    binder: &mut B,
) -> Result<B::Value, ActionError> {
    let op = node.operator();
    let children = match (op.kind(), node.kind()) {
        (OpKind::Action(code), _) => return binder.action(code, Vec::new()),
        (OpKind::Bounds(_), _) => return Ok(binder.bounds(node.span())),
        (_, NodeKind::Leaf(text)) => return Ok(binder.text(text, node.span())),
        (_, NodeKind::Node(children)) => children,
    };

    match op.kind() {
        OpKind::Repeat { .. } => {
            let items = children
                .iter()
                .map(|child| resolve(child, binder))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(binder.list(items))
        }
        OpKind::And(_) | OpKind::Not(_) => Ok(binder.list(Vec::new())),
        OpKind::Sequence(_) => resolve_sequence(children, binder),
        _ => match children.as_slice() {
            [only] => resolve(only, binder),
            _ => {
                let items = children
                    .iter()
                    .map(|child| resolve(child, binder))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(binder.list(items))
            }
        },
    }
}

/// Captures win over plain children; the last action consumes what is left.
fn resolve_sequence<B: Binder + ?Sized>(
    children: &[Match<'_>],
    binder: &mut B,
) -> Result<B::Value, ActionError> {
    let has_captures = children.iter().any(|c| c.operator().is_capture());
    let mut action = None;
    let mut values = Vec::new();

    for child in children {
        let op = child.operator();
        if let Some(code) = op.action_code() {
            action = Some(code);
            continue;
        }
        if has_captures && !op.is_capture() {
            continue;
        }
        values.push(resolve(child, binder)?);
    }

    match action {
        Some(code) => binder.action(code, values),
        None if values.len() == 1 => Ok(values.remove(0)),
        None => Ok(binder.list(values)),
    }
}
