//! Middleware: reversible value codecs
//!
//! A middleware recognises some authored leaf (a color string, a
//! unit-suffixed number) and encodes it as a [`Tagged`] leaf of plain numbers
//! that [`crate::tween`] can interpolate. Decoding is routed back by the
//! tag's `middleware` discriminant, never by sniffing the value.
//!
//! A [`MiddlewareStack`] composes several codecs: `input` tries them in
//! registration order and the first one to recognise a leaf wins; `output`
//! resolves tags against the stack in reverse order.

mod color;
mod unit;

pub use color::ColorMiddleware;
pub use unit::UnitMiddleware;

use crate::error::Result;
use crate::tree::transform;
use crate::value::{Tagged, Value};
use std::fmt;
use std::sync::Arc;

/// A reversible codec for one family of authored leaves
pub trait Middleware: Send + Sync {
    /// Discriminant written into every [`Tagged`] this codec produces
    fn name(&self) -> &str;

    /// Encode `leaf` if this codec recognises it, otherwise `None`
    fn input(&self, leaf: &Value) -> Option<Tagged>;

    /// Decode a tag produced by [`Middleware::input`] (possibly tweened)
    fn output(&self, tagged: &Tagged) -> Result<Value>;
}

/// The authored text behind `tagged`, if its values are still the parsed ones
///
/// Codecs call this first in [`Middleware::output`] so an untouched leaf is
/// written back with the spelling it was authored with (`#FFFFFF`, `+5px`).
pub(crate) fn authored_text(middleware: &dyn Middleware, tagged: &Tagged) -> Option<Value> {
    let source = tagged.source.as_deref()?;
    let parsed = middleware.input(&Value::from(source))?;
    (parsed.format == tagged.format && parsed.values == tagged.values).then(|| Value::from(source))
}

/// Ordered list of middleware applied to whole value trees
#[derive(Clone)]
pub struct MiddlewareStack {
    middleware: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareStack {
    /// A stack with no codecs; input and output are identities
    pub fn empty() -> Self {
        Self {
            middleware: Vec::new(),
        }
    }

    /// Append a codec (builder pattern)
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.push(Arc::new(middleware));
        self
    }

    pub fn push(&mut self, middleware: Arc<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Discriminants in registration order
    pub fn names(&self) -> Vec<&str> {
        self.middleware.iter().map(|m| m.name()).collect()
    }

    /// Encode every recognised leaf of `value`
    pub fn input(&self, value: Value) -> Result<Value> {
        transform(value, |leaf| Ok(self.input_leaf(leaf)))
    }

    fn input_leaf(&self, leaf: Value) -> Value {
        if matches!(leaf, Value::Tagged(_)) {
            return leaf;
        }
        self.middleware
            .iter()
            .find_map(|m| m.input(&leaf))
            .map(Value::Tagged)
            .unwrap_or(leaf)
    }

    /// Decode every tagged leaf of `value` back to its authored form
    pub fn output(&self, value: Value) -> Result<Value> {
        transform(value, |leaf| match leaf {
            Value::Tagged(tagged) => self.output_leaf(tagged),
            other => Ok(other),
        })
    }

    fn output_leaf(&self, tagged: Tagged) -> Result<Value> {
        match self
            .middleware
            .iter()
            .rev()
            .find(|m| m.name() == &*tagged.middleware)
        {
            Some(middleware) => middleware.output(&tagged),
            None => {
                tracing::warn!(
                    "No middleware registered for tag `{}`, passing it through",
                    tagged.middleware
                );
                Ok(Value::Tagged(tagged))
            }
        }
    }
}

impl Default for MiddlewareStack {
    /// `color` then `unit`
    fn default() -> Self {
        Self::empty().with(ColorMiddleware).with(UnitMiddleware)
    }
}

impl fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
