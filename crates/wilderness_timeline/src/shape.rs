//! Shapes and their keyframes
//!
//! A [`Shape`] is an authored sequence of keyframes on its own local
//! timeline. It is a cheap shared handle: the timeline that adopts it keeps
//! only a weak back-reference, and the handle records that it was adopted so
//! the same shape cannot be attached twice.

use crate::error::{Result, TimelineError};
use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use wilderness_core::{Easing, Value};

/// Segment duration used when a keyframe does not set one
pub const DEFAULT_KEYFRAME_DURATION: f64 = 250.0;

/// Authored keyframe, before positions are derived
#[derive(Clone, Debug)]
pub struct KeyframeSpec {
    /// Defaults to the keyframe's index
    pub name: Option<String>,
    pub value: Value,
    /// Milliseconds from the previous keyframe; ignored on the first one
    pub duration: f64,
    /// Curve for the segment arriving at this keyframe
    pub easing: Easing,
}

impl KeyframeSpec {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            name: None,
            value: value.into(),
            duration: DEFAULT_KEYFRAME_DURATION,
            easing: Easing::linear(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// A keyframe placed on its shape's local timeline
#[derive(Clone, Debug)]
pub struct Keyframe {
    pub name: Arc<str>,
    /// Normalized position within the shape, `0` first, `1` last
    pub position: f64,
    pub value: Value,
    pub duration: f64,
    pub easing: Easing,
}

#[derive(Debug)]
pub(crate) struct ShapeInner {
    keyframes: Vec<Keyframe>,
    duration: f64,
    attached: AtomicBool,
}

/// Shared handle to an authored keyframe sequence
#[derive(Clone, Debug)]
pub struct Shape {
    inner: Arc<ShapeInner>,
}

impl Shape {
    /// Derive keyframe positions from the authored segment durations
    pub fn new(specs: impl IntoIterator<Item = KeyframeSpec>) -> Result<Self> {
        let specs: Vec<KeyframeSpec> = specs.into_iter().collect();
        if specs.is_empty() {
            return Err(TimelineError::Validation(
                "a shape needs at least one keyframe".to_string(),
            ));
        }

        let mut seen = FxHashSet::default();
        let mut offsets = Vec::with_capacity(specs.len());
        let mut total = 0.0;
        for (index, spec) in specs.iter().enumerate() {
            if !spec.duration.is_finite() || spec.duration < 0.0 {
                return Err(TimelineError::Validation(format!(
                    "keyframe duration must be a finite number >= 0, got {}",
                    spec.duration
                )));
            }
            if index > 0 {
                total += spec.duration;
            }
            offsets.push(total);
        }

        let last = (specs.len() - 1).max(1) as f64;
        let mut keyframes = Vec::with_capacity(specs.len());
        for (index, (spec, offset)) in specs.into_iter().zip(offsets).enumerate() {
            let name: Arc<str> = match spec.name {
                Some(name) => name.into(),
                None => index.to_string().into(),
            };
            if !seen.insert(name.clone()) {
                return Err(TimelineError::DuplicateName(name.to_string()));
            }
            let position = if total > 0.0 {
                offset / total
            } else {
                index as f64 / last
            };
            keyframes.push(Keyframe {
                name,
                position,
                value: spec.value,
                duration: if index == 0 { 0.0 } else { spec.duration },
                easing: spec.easing,
            });
        }

        Ok(Self {
            inner: Arc::new(ShapeInner {
                keyframes,
                duration: total,
                attached: AtomicBool::new(false),
            }),
        })
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.inner.keyframes
    }

    pub fn keyframe(&self, name: &str) -> Option<&Keyframe> {
        self.inner.keyframes.iter().find(|k| &*k.name == name)
    }

    /// Sum of the segment durations
    pub fn duration(&self) -> f64 {
        self.inner.duration
    }

    pub fn is_attached(&self) -> bool {
        self.inner.attached.load(Ordering::Acquire)
    }

    /// Both handles point at the same shape
    pub fn ptr_eq(&self, other: &Shape) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Claim the shape for a timeline; false if something already has
    pub(crate) fn try_attach(&self) -> bool {
        self.inner
            .attached
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Undo a claim made by a timeline build that later failed
    pub(crate) fn release(&self) {
        self.inner.attached.store(false, Ordering::Release);
    }

    pub(crate) fn downgrade(&self) -> Weak<ShapeInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<ShapeInner>) -> Option<Shape> {
        weak.upgrade().map(|inner| Shape { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(shape: &Shape) -> Vec<f64> {
        shape.keyframes().iter().map(|k| k.position).collect()
    }

    #[test]
    fn test_positions_follow_segment_durations() {
        let shape = Shape::new([
            KeyframeSpec::new(0.0).duration(9999.0),
            KeyframeSpec::new(1.0).duration(100.0),
            KeyframeSpec::new(2.0).duration(300.0),
        ])
        .unwrap();

        // First keyframe's duration has no incoming segment
        assert_eq!(shape.duration(), 400.0);
        assert_eq!(positions(&shape), vec![0.0, 0.25, 1.0]);
    }

    #[test]
    fn test_default_names_are_indices() {
        let shape = Shape::new([
            KeyframeSpec::new(0.0),
            KeyframeSpec::new(1.0).name("peak"),
            KeyframeSpec::new(2.0),
        ])
        .unwrap();
        let names: Vec<&str> = shape.keyframes().iter().map(|k| &*k.name).collect();
        assert_eq!(names, vec!["0", "peak", "2"]);
        assert_eq!(shape.keyframe("peak").unwrap().position, 0.5);
    }

    #[test]
    fn test_zero_duration_spreads_evenly() {
        let shape = Shape::new([
            KeyframeSpec::new(0.0).duration(0.0),
            KeyframeSpec::new(1.0).duration(0.0),
            KeyframeSpec::new(2.0).duration(0.0),
        ])
        .unwrap();
        assert_eq!(shape.duration(), 0.0);
        assert_eq!(positions(&shape), vec![0.0, 0.5, 1.0]);

        let single = Shape::new([KeyframeSpec::new(1.0)]).unwrap();
        assert_eq!(positions(&single), vec![0.0]);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            Shape::new(Vec::new()),
            Err(TimelineError::Validation(_))
        ));
        assert!(matches!(
            Shape::new([KeyframeSpec::new(0.0), KeyframeSpec::new(1.0).duration(-1.0)]),
            Err(TimelineError::Validation(_))
        ));
        assert_eq!(
            Shape::new([
                KeyframeSpec::new(0.0).name("a"),
                KeyframeSpec::new(1.0).name("a"),
            ])
            .unwrap_err(),
            TimelineError::DuplicateName("a".to_string())
        );
    }

    #[test]
    fn test_attach_once() {
        let shape = Shape::new([KeyframeSpec::new(0.0)]).unwrap();
        let handle = shape.clone();
        assert!(shape.try_attach());
        assert!(handle.is_attached());
        assert!(!handle.try_attach());

        shape.release();
        assert!(handle.try_attach());
    }

    #[test]
    fn test_weak_back_reference() {
        let shape = Shape::new([KeyframeSpec::new(0.0)]).unwrap();
        let weak = shape.downgrade();
        assert!(Shape::upgrade(&weak).unwrap().ptr_eq(&shape));
        drop(shape);
        assert!(Shape::upgrade(&weak).is_none());
    }
}
