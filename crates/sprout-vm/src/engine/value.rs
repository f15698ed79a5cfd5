//! Structural semantic values.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use sprout_core::Span;

/// Self-contained value computed from a match tree.
///
/// The built-in [`Structural`](super::Structural) binder produces strings,
/// spans, arrays and tagged action results; host actions may also return
/// integers or null.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Null,
    Int(i64),
    String(String),
    Span(Span),
    Array(Vec<Value>),
    /// Result of an action with no host binding: its code and arguments.
    Tagged { tag: String, data: Vec<Value> },
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Span(span) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(&span.start)?;
                seq.serialize_element(&span.end)?;
                seq.end()
            }
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for item in arr {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Tagged { tag, data } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("$tag", tag)?;
                map.serialize_entry("$data", data)?;
                map.end()
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Span(span) => write!(f, "{}..{}", span.start, span.end),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Tagged { tag, data } => {
                write!(f, "{tag}(")?;
                for (i, item) in data.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}
