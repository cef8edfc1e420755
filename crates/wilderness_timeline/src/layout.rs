//! Timeline layout
//!
//! Places independently authored shapes on one shared timeline. Shapes are
//! resolved strictly in input order: each one starts either at the running
//! end of the timeline, or relative to a shape or keyframe already placed,
//! shifted by an offset. Absolute placements are then rescaled to `[0, 1]`.

use crate::error::{Result, TimelineError};
use crate::shape::Shape;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Authored queue directive
///
/// Deserializes from a bare number, a name, or a `[name, offset]` pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Queue {
    /// Milliseconds after the current end of the timeline
    Offset(f64),
    /// Start where the named shape ends, or at the named keyframe
    Follow(String),
    /// Like `Follow`, shifted by milliseconds
    FollowWithOffset(String, f64),
}

impl Queue {
    pub fn resolve(&self) -> QueueDirective {
        match self {
            Queue::Offset(offset) => QueueDirective {
                follow: None,
                offset: *offset,
            },
            Queue::Follow(name) => QueueDirective {
                follow: Some(name.clone()),
                offset: 0.0,
            },
            Queue::FollowWithOffset(name, offset) => QueueDirective {
                follow: Some(name.clone()),
                offset: *offset,
            },
        }
    }
}

impl From<f64> for Queue {
    fn from(offset: f64) -> Self {
        Queue::Offset(offset)
    }
}

impl From<&str> for Queue {
    fn from(name: &str) -> Self {
        Queue::Follow(name.to_string())
    }
}

impl From<(&str, f64)> for Queue {
    fn from((name, offset): (&str, f64)) -> Self {
        Queue::FollowWithOffset(name.to_string(), offset)
    }
}

/// Resolved queue directive
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueueDirective {
    pub follow: Option<String>,
    pub offset: f64,
}

/// A shape with its placement options
#[derive(Clone, Debug)]
pub struct QueuedShape {
    pub shape: Shape,
    /// Defaults to the shape's index in the layout
    pub name: Option<String>,
    pub queue: Option<Queue>,
}

impl QueuedShape {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            name: None,
            queue: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn queue(mut self, queue: impl Into<Queue>) -> Self {
        self.queue = Some(queue.into());
        self
    }
}

impl From<Shape> for QueuedShape {
    fn from(shape: Shape) -> Self {
        Self::new(shape)
    }
}

/// Where one shape sits on the timeline
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub name: Arc<str>,
    /// Normalized start in `[0, 1]`
    pub start: f64,
    /// Normalized end in `[0, 1]`
    pub end: f64,
}

/// Output of [`layout`]
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// One entry per input shape, in input order
    pub placements: Vec<Placement>,
    /// `max end - min start` in milliseconds
    pub duration: f64,
}

struct Placed<'a> {
    name: Arc<str>,
    shape: &'a Shape,
    start: f64,
    end: f64,
}

/// Lay `shapes` out on one timeline
///
/// Fails without side effects on an already attached shape, a duplicate
/// name, a non-finite offset, or a `follow` that names nothing placed
/// before it.
pub fn layout(shapes: &[QueuedShape]) -> Result<Layout> {
    let mut placed: Vec<Placed<'_>> = Vec::with_capacity(shapes.len());
    let mut timeline_min = 0.0_f64;
    let mut timeline_max = 0.0_f64;

    for (index, queued) in shapes.iter().enumerate() {
        let name: Arc<str> = match &queued.name {
            Some(name) => name.as_str().into(),
            None => index.to_string().into(),
        };
        if queued.shape.is_attached() {
            return Err(TimelineError::AlreadyAttached(name.to_string()));
        }
        if placed.iter().any(|p| p.name == name) {
            return Err(TimelineError::DuplicateName(name.to_string()));
        }

        let directive = queued
            .queue
            .as_ref()
            .map(Queue::resolve)
            .unwrap_or_default();
        if !directive.offset.is_finite() {
            return Err(TimelineError::Validation(format!(
                "queue offset of `{}` must be finite, got {}",
                name, directive.offset
            )));
        }

        let anchor = match &directive.follow {
            Some(follow) => resolve_follow(&placed, follow)?,
            None => timeline_max,
        };
        let start = anchor + directive.offset;
        let end = start + queued.shape.duration();

        timeline_min = timeline_min.min(start);
        timeline_max = timeline_max.max(end);
        tracing::trace!("Placed shape `{}` at {}..{}", name, start, end);

        placed.push(Placed {
            name,
            shape: &queued.shape,
            start,
            end,
        });
    }

    let duration = timeline_max - timeline_min;
    let placements = placed
        .into_iter()
        .map(|p| {
            let (start, end) = if duration > 0.0 {
                (
                    (p.start - timeline_min) / duration,
                    (p.end - timeline_min) / duration,
                )
            } else {
                (0.0, 1.0)
            };
            Placement {
                name: p.name,
                start,
                end,
            }
        })
        .collect();

    Ok(Layout {
        placements,
        duration,
    })
}

/// Absolute time a `follow` reference points at
///
/// Shape names take precedence; keyframes are searched shape by shape in
/// placement order.
fn resolve_follow(placed: &[Placed<'_>], follow: &str) -> Result<f64> {
    if let Some(shape) = placed.iter().find(|p| &*p.name == follow) {
        return Ok(shape.end);
    }
    placed
        .iter()
        .find_map(|p| {
            p.shape
                .keyframe(follow)
                .map(|keyframe| p.start + p.shape.duration() * keyframe.position)
        })
        .ok_or_else(|| TimelineError::ReferenceNotFound(follow.to_string()))
}
