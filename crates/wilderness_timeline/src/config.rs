//! Timeline configuration
//!
//! Every field is optional; whatever is left unset falls back to the
//! playback defaults, with the duration taken from the layout. Documents can
//! be written in TOML or JSON, using either `snake_case` or `camelCase` keys.
//!
//! ```toml
//! middleware = ["color"]
//!
//! [playback]
//! alternate = true
//! iterations = "infinite"
//!
//! [[shapes]]
//! name = "fade"
//! keyframes = [{ value = "#000" }, { value = "#fff", duration = 400 }]
//! ```

use crate::error::{Result, TimelineError};
use crate::layout::{Queue, QueuedShape};
use crate::playback::PlaybackOptions;
use crate::shape::{KeyframeSpec, Shape, DEFAULT_KEYFRAME_DURATION};
use crate::timeline::TimelineBuilder;
use serde::{Deserialize, Serialize};
use wilderness_core::{ColorMiddleware, EasingRegistry, MiddlewareStack, UnitMiddleware, Value};

/// Iteration count: a number, or unbounded
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Iterations {
    Count(f64),
    Keyword(IterationsKeyword),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IterationsKeyword {
    #[serde(rename = "infinite", alias = "Infinity", alias = "infinity")]
    Infinite,
}

impl Iterations {
    pub fn value(&self) -> f64 {
        match self {
            Iterations::Count(n) => *n,
            Iterations::Keyword(IterationsKeyword::Infinite) => f64::INFINITY,
        }
    }
}

impl From<f64> for Iterations {
    fn from(n: f64) -> Self {
        if n.is_infinite() && n > 0.0 {
            Iterations::Keyword(IterationsKeyword::Infinite)
        } else {
            Iterations::Count(n)
        }
    }
}

/// Authored playback options
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub alternate: Option<bool>,
    pub delay: Option<f64>,
    pub duration: Option<f64>,
    #[serde(alias = "initialIterations")]
    pub initial_iterations: Option<f64>,
    pub iterations: Option<Iterations>,
    pub reverse: Option<bool>,
    pub started: Option<f64>,
}

impl PlaybackConfig {
    pub fn alternate(mut self, alternate: bool) -> Self {
        self.alternate = Some(alternate);
        self
    }

    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn initial_iterations(mut self, initial_iterations: f64) -> Self {
        self.initial_iterations = Some(initial_iterations);
        self
    }

    pub fn iterations(mut self, iterations: impl Into<Iterations>) -> Self {
        self.iterations = Some(iterations.into());
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = Some(reverse);
        self
    }

    pub fn started(mut self, started: f64) -> Self {
        self.started = Some(started);
        self
    }

    /// Fill unset fields from the defaults and validate
    pub fn resolve(&self, layout_duration: f64) -> Result<PlaybackOptions> {
        let mut opts = self.apply_to(PlaybackOptions::new(layout_duration));
        if let Some(initial_iterations) = self.initial_iterations {
            opts.initial_iterations = initial_iterations;
        }
        opts.started = self.started;
        opts.validate()?;
        Ok(opts)
    }

    /// Override the fields of `base` this config sets
    ///
    /// `initial_iterations` and `started` are left to the caller, since
    /// play and pause derive both from the current progress.
    pub fn apply_to(&self, base: PlaybackOptions) -> PlaybackOptions {
        PlaybackOptions {
            alternate: self.alternate.unwrap_or(base.alternate),
            delay: self.delay.unwrap_or(base.delay),
            duration: self.duration.unwrap_or(base.duration),
            iterations: self.iterations.map_or(base.iterations, |i| i.value()),
            reverse: self.reverse.unwrap_or(base.reverse),
            ..base
        }
    }
}

/// Authored keyframe
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub value: Value,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub easing: Option<String>,
}

/// Authored shape with its placement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub queue: Option<Queue>,
    pub keyframes: Vec<KeyframeConfig>,
}

impl ShapeConfig {
    /// Build the shape, resolving easing names through `easings`
    pub fn to_queued(&self, easings: &EasingRegistry) -> Result<QueuedShape> {
        let specs = self
            .keyframes
            .iter()
            .map(|k| -> Result<KeyframeSpec> {
                let easing = match &k.easing {
                    Some(name) => easings.resolve(name)?,
                    None => Default::default(),
                };
                Ok(KeyframeSpec {
                    name: k.name.clone(),
                    value: k.value.clone(),
                    duration: k.duration.unwrap_or(DEFAULT_KEYFRAME_DURATION),
                    easing,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(QueuedShape {
            shape: Shape::new(specs)?,
            name: self.name.clone(),
            queue: self.queue.clone(),
        })
    }
}

/// Whole-timeline configuration document
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub playback: PlaybackConfig,
    /// Built-in middleware by name; `None` means `color` then `unit`
    pub middleware: Option<Vec<String>>,
    pub shapes: Vec<ShapeConfig>,
}

impl TimelineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| TimelineError::Config(e.to_string()))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| TimelineError::Config(e.to_string()))
    }

    /// Middleware stack named by the document
    pub fn middleware_stack(&self) -> Result<MiddlewareStack> {
        let Some(names) = &self.middleware else {
            return Ok(MiddlewareStack::default());
        };
        let mut stack = MiddlewareStack::empty();
        for name in names {
            stack = match name.as_str() {
                "color" => stack.with(ColorMiddleware),
                "unit" => stack.with(UnitMiddleware),
                other => {
                    return Err(TimelineError::Validation(format!(
                        "unknown middleware `{}`",
                        other
                    )))
                }
            };
        }
        Ok(stack)
    }

    /// A builder holding everything the document describes
    ///
    /// More shapes can still be queued on the returned builder.
    pub fn builder(&self, easings: &EasingRegistry) -> Result<TimelineBuilder> {
        let mut builder = TimelineBuilder::new()
            .playback(self.playback.clone())
            .middleware(self.middleware_stack()?);
        for shape in &self.shapes {
            builder = builder.queued(shape.to_queued(easings)?);
        }
        Ok(builder)
    }
}
