//! Easing curves
//!
//! The curve catalogue itself lives outside this crate. An [`Easing`] is an
//! opaque `f64 -> f64` over `[0, 1]`; results may overshoot (back/elastic
//! curves do). Curves are looked up by name through an [`EasingRegistry`],
//! which is where unknown names are rejected, before any playback begins.

use crate::error::{CoreError, Result};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

type EaseFn = dyn Fn(f64) -> f64 + Send + Sync;

/// A named easing curve
#[derive(Clone)]
pub struct Easing {
    name: Arc<str>,
    curve: Arc<EaseFn>,
}

impl Easing {
    /// Wrap a curve under a name
    pub fn new<F>(name: impl Into<Arc<str>>, curve: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            curve: Arc::new(curve),
        }
    }

    /// The identity curve
    pub fn linear() -> Self {
        Self::new("linear", |t| t)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the curve at `t`
    ///
    /// Equivalent to the classic `ease(t, 0, 1, 1)` call shape: begin 0,
    /// change 1, duration 1.
    pub fn apply(&self, t: f64) -> f64 {
        (self.curve)(t)
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::linear()
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Easing").field(&self.name).finish()
    }
}

/// Name → curve lookup
#[derive(Clone, Debug)]
pub struct EasingRegistry {
    curves: FxHashMap<String, Easing>,
}

impl EasingRegistry {
    /// A registry holding only `linear`
    pub fn new() -> Self {
        let mut registry = Self {
            curves: FxHashMap::default(),
        };
        registry.register(Easing::linear());
        registry
    }

    /// Add or replace a curve under its own name
    pub fn register(&mut self, easing: Easing) {
        self.curves.insert(easing.name().to_string(), easing);
    }

    /// Register a closure under `name`
    pub fn register_fn<F>(&mut self, name: &str, curve: F)
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.register(Easing::new(name, curve));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.curves.contains_key(name)
    }

    /// Look up a curve, failing with [`CoreError::UnknownEasing`]
    pub fn resolve(&self, name: &str) -> Result<Easing> {
        self.curves
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::UnknownEasing(name.to_string()))
    }
}

impl Default for EasingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
