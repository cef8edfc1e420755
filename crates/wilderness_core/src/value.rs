//! Interpolatable value tree
//!
//! Authored keyframe values are arbitrary nested data. Only three container
//! shapes exist (list, keyed map, leaf) so every walk over a value is a walk
//! over a closed set of cases.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// A node in an authored or middleware-encoded value tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    /// Middleware-encoded leaf. Never produced by deserialization.
    #[serde(skip_deserializing)]
    Tagged(Tagged),
}

impl Value {
    /// Short name of the node kind, used in mismatch reports
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Tagged(_) => "tagged",
        }
    }

    /// True for anything that is not a list or map
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Map(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tagged(&self) -> Option<&Tagged> {
        match self {
            Value::Tagged(t) => Some(t),
            _ => None,
        }
    }

    /// Build a keyed map from `(key, value)` pairs, preserving order
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Tagged> for Value {
    fn from(t: Tagged) -> Self {
        Value::Tagged(t)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// A leaf encoded by a middleware into plain numbers
///
/// `middleware` is the discriminant used to route the leaf back to the codec
/// that produced it; `format` remembers which authored form to restore
/// (e.g. `hex` vs `rgba`). Only `values` take part in interpolation.
/// `source` keeps the authored text, so a leaf that comes back with the
/// values it was parsed from is written out exactly as it was authored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tagged {
    pub middleware: Arc<str>,
    pub format: Arc<str>,
    pub values: SmallVec<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Arc<str>>,
}

impl Tagged {
    pub fn new(
        middleware: impl Into<Arc<str>>,
        format: impl Into<Arc<str>>,
        values: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self {
            middleware: middleware.into(),
            format: format.into(),
            values: values.into_iter().collect(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for Tagged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{:?}", self.middleware, self.format, self.values.as_slice())
    }
}

/// Format a number the way authored strings usually carry it
///
/// Integral values print without a fractional part and negative zero prints
/// as `0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    format!("{}", n)
}
