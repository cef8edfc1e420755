//! Timeline: laid-out shapes, playback options and event bookkeeping
//!
//! A [`Timeline`] is driven from outside. Each tick the driver calls
//! [`Timeline::sample_position`] (where are we now) and then
//! [`Timeline::collect_events`] (what happened since the previous tick).
//! Rendering collaborators call [`Timeline::frame`] to get every shape's
//! interpolated value in its authored form.
//!
//! A timeline is not meant to be ticked from several threads at once; wrap
//! it in a mutex if it has to be shared.

use crate::config::PlaybackConfig;
use crate::error::{Result, TimelineError};
use crate::events::{event_queue, Event, EventName, Snapshot};
use crate::layout::{layout, QueuedShape};
use crate::playback::{
    iterations_complete, mirrored_cycles, position, PlaybackOptions, PlaybackState,
};
use crate::shape::{Keyframe, Shape, ShapeInner};
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::sync::{Arc, Weak};
use wilderness_core::{tween, MiddlewareStack, Value};

new_key_type! {
    /// Handle returned by [`Timeline::subscribe`]
    pub struct SubscriptionId;
}

type Callback = Box<dyn FnMut(&Event) + Send>;

struct Subscription {
    name: EventName,
    callback: Callback,
}

/// A shape placed on a timeline
#[derive(Debug)]
pub struct TimelineShape {
    pub name: Arc<str>,
    /// Normalized start within the timeline
    pub start: f64,
    /// Normalized end within the timeline
    pub end: f64,
    /// Keyframes with middleware-encoded values
    pub keyframes: Vec<Keyframe>,
    shape: Weak<ShapeInner>,
}

impl TimelineShape {
    /// The authored shape, if its owner still holds it
    pub fn shape(&self) -> Option<Shape> {
        Shape::upgrade(&self.shape)
    }

    /// Map a timeline position onto this shape's own `[0, 1]`
    pub fn local_position(&self, timeline_position: f64) -> f64 {
        let span = self.end - self.start;
        if span > 0.0 {
            ((timeline_position - self.start) / span).clamp(0.0, 1.0)
        } else if timeline_position >= self.end {
            1.0
        } else {
            0.0
        }
    }

    /// Encoded value at `local` (in `[0, 1]`)
    fn value_at(&self, local: f64) -> Result<Value> {
        let Some(first) = self.keyframes.first() else {
            return Err(TimelineError::Validation(format!(
                "shape `{}` has no keyframes",
                self.name
            )));
        };
        if local <= first.position {
            return Ok(first.value.clone());
        }
        for pair in self.keyframes.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            if local <= to.position {
                let span = to.position - from.position;
                let t = if span > 0.0 {
                    (local - from.position) / span
                } else {
                    1.0
                };
                return Ok(tween(&from.value, &to.value, &to.easing, t)?);
            }
        }
        Ok(self.keyframes[self.keyframes.len() - 1].value.clone())
    }
}

/// One shape's interpolated value at a sampled position
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeFrame {
    pub name: Arc<str>,
    /// Position within the shape's own timeline
    pub position: f64,
    /// Value in its authored form
    pub value: Value,
}

/// Collects shapes and options, then lays them out
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    shapes: Vec<QueuedShape>,
    playback: PlaybackConfig,
    middleware: Option<MiddlewareStack>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a shape at the current end of the timeline
    pub fn shape(self, shape: Shape) -> Self {
        self.queued(QueuedShape::new(shape))
    }

    /// Queue a shape with explicit placement options
    pub fn queued(mut self, queued: QueuedShape) -> Self {
        self.shapes.push(queued);
        self
    }

    pub fn playback(mut self, playback: PlaybackConfig) -> Self {
        self.playback = playback;
        self
    }

    /// Replace the default `color` + `unit` middleware
    pub fn middleware(mut self, middleware: MiddlewareStack) -> Self {
        self.middleware = Some(middleware);
        self
    }

    /// Lay out the shapes and attach them
    ///
    /// Either every shape ends up attached to the new timeline, or none of
    /// them is touched.
    pub fn build(self) -> Result<Timeline> {
        let layout = layout(&self.shapes)?;
        let options = self.playback.resolve(layout.duration)?;
        let middleware = self.middleware.unwrap_or_default();

        for (index, queued) in self.shapes.iter().enumerate() {
            if !queued.shape.try_attach() {
                for claimed in &self.shapes[..index] {
                    claimed.shape.release();
                }
                return Err(TimelineError::AlreadyAttached(
                    layout.placements[index].name.to_string(),
                ));
            }
        }

        let shapes = self
            .shapes
            .iter()
            .zip(layout.placements)
            .map(|(queued, placement)| -> Result<TimelineShape> {
                let keyframes = queued
                    .shape
                    .keyframes()
                    .iter()
                    .map(|keyframe| -> Result<Keyframe> {
                        Ok(Keyframe {
                            value: middleware.input(keyframe.value.clone())?,
                            ..keyframe.clone()
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(TimelineShape {
                    name: placement.name,
                    start: placement.start,
                    end: placement.end,
                    keyframes,
                    shape: queued.shape.downgrade(),
                })
            })
            .collect::<Result<Vec<_>>>();
        let shapes = match shapes {
            Ok(shapes) => shapes,
            Err(err) => {
                for queued in &self.shapes {
                    queued.shape.release();
                }
                return Err(err);
            }
        };

        tracing::debug!(
            "Built timeline: {} shapes, {}ms, {:?}",
            shapes.len(),
            layout.duration,
            options
        );

        Ok(Timeline {
            shapes,
            duration: layout.duration,
            options,
            middleware,
            state: PlaybackState::default(),
            previous: None,
            subscriptions: SlotMap::with_key(),
            order: Vec::new(),
        })
    }
}

/// A set of shapes sharing one playback clock
pub struct Timeline {
    shapes: Vec<TimelineShape>,
    duration: f64,
    options: PlaybackOptions,
    middleware: MiddlewareStack,
    state: PlaybackState,
    /// Written only by `collect_events`
    previous: Option<Snapshot>,
    subscriptions: SlotMap<SubscriptionId, Subscription>,
    order: Vec<SubscriptionId>,
}

impl Timeline {
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    pub fn shapes(&self) -> &[TimelineShape] {
        &self.shapes
    }

    pub fn shape(&self, name: &str) -> Option<&TimelineShape> {
        self.shapes.iter().find(|s| &*s.name == name)
    }

    /// Laid-out duration in milliseconds (before any override)
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn playback_options(&self) -> &PlaybackOptions {
        &self.options
    }

    pub fn middleware(&self) -> &MiddlewareStack {
        &self.middleware
    }

    /// State observed by the last [`Timeline::sample_position`]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Start or resume playback at `at`
    ///
    /// Progress made so far is kept, so a paused timeline continues
    /// mid-cycle. A finished timeline starts over. `overrides` may change
    /// any option except `started`; an explicit `initial_iterations`
    /// replaces the kept progress.
    pub fn play(&mut self, at: f64, overrides: PlaybackConfig) -> Result<()> {
        let mut next = self.fold(at, &overrides);
        if next.initial_iterations >= next.iterations {
            next.initial_iterations = 0.0;
        }
        if let Some(initial_iterations) = overrides.initial_iterations {
            next.initial_iterations = initial_iterations;
        }
        next.started = Some(at);
        next.validate()?;

        tracing::debug!(
            "Play at {} from iteration {}",
            at,
            next.initial_iterations
        );
        self.options = next;
        Ok(())
    }

    /// Stop playback at `at`, keeping the position reached
    pub fn pause(&mut self, at: f64, overrides: PlaybackConfig) -> Result<()> {
        let mut next = self.fold(at, &overrides);
        if let Some(initial_iterations) = overrides.initial_iterations {
            next.initial_iterations = initial_iterations;
        }
        next.started = None;
        next.validate()?;

        tracing::debug!("Pause at {} on iteration {}", at, next.initial_iterations);
        self.options = next;
        Ok(())
    }

    /// Current options with progress at `at` folded into `initial_iterations`
    fn fold(&self, at: f64, overrides: &PlaybackConfig) -> PlaybackOptions {
        let mut cycles = iterations_complete(&self.options, at);
        if overrides
            .reverse
            .map_or(false, |reverse| reverse != self.options.reverse)
        {
            cycles = mirrored_cycles(&self.options, cycles);
        }

        let mut next = overrides.apply_to(self.options);
        next.initial_iterations = cycles.min(next.iterations).max(0.0);
        next
    }

    /// Timeline position at `at`, recording the playback state
    pub fn sample_position(&mut self, at: f64) -> f64 {
        self.state = PlaybackState::at(&self.options, at);
        let position = position(&self.options, at);
        tracing::trace!("Sampled {} at {}: {:?}", position, at, self.state);
        position
    }

    /// Register `callback` for events named `name`
    pub fn subscribe<F>(&mut self, name: EventName, callback: F) -> SubscriptionId
    where
        F: FnMut(&Event) + Send + 'static,
    {
        let id = self.subscriptions.insert(Subscription {
            name,
            callback: Box::new(callback),
        });
        self.order.push(id);
        id
    }

    /// Remove a subscription; false if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if self.subscriptions.remove(id).is_none() {
            return false;
        }
        self.order.retain(|other| *other != id);
        true
    }

    /// Event names with at least one subscriber, in first-subscribed order
    pub fn subscribed_names(&self) -> Vec<EventName> {
        let mut names = Vec::new();
        for id in &self.order {
            if let Some(sub) = self.subscriptions.get(*id) {
                if !names.contains(&sub.name) {
                    names.push(sub.name);
                }
            }
        }
        names
    }

    /// Events since the previous call, dispatched to subscribers
    ///
    /// The window ends at the state recorded by the last
    /// [`Timeline::sample_position`]. The returned events have already been
    /// delivered.
    pub fn collect_events(&mut self) -> Vec<Event> {
        let names = self.subscribed_names();
        self.collect_events_for(&names)
    }

    /// Like [`Timeline::collect_events`], but enumerating `names` whether or
    /// not anything subscribed to them
    pub fn collect_events_for(&mut self, names: &[EventName]) -> Vec<Event> {
        if self
            .previous
            .as_ref()
            .map_or(false, |prev| prev.options != self.options)
        {
            tracing::debug!("Playback options changed, resetting event window");
        }

        let events = event_queue(
            &self.options,
            &self.shapes,
            &self.state,
            self.previous.as_ref(),
            names,
        );
        self.previous = Some(Snapshot::observe(
            &self.options,
            &self.state,
            self.previous.as_ref(),
        ));

        for event in &events {
            tracing::trace!("Dispatch {} at {} {:?}", event.name, event.at, event.args);
            for id in &self.order {
                if let Some(sub) = self.subscriptions.get_mut(*id) {
                    if sub.name == event.name {
                        (sub.callback)(event);
                    }
                }
            }
        }
        events
    }

    /// Every shape's value at time `at`
    pub fn frame(&self, at: f64) -> Result<Vec<ShapeFrame>> {
        self.frame_at_position(position(&self.options, at))
    }

    /// Every shape's value at timeline position `position`
    pub fn frame_at_position(&self, position: f64) -> Result<Vec<ShapeFrame>> {
        self.shapes
            .iter()
            .map(|shape| -> Result<ShapeFrame> {
                let local = shape.local_position(position);
                let value = self.middleware.output(shape.value_at(local)?)?;
                Ok(ShapeFrame {
                    name: shape.name.clone(),
                    position: local,
                    value,
                })
            })
            .collect()
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("shapes", &self.shapes)
            .field("duration", &self.duration)
            .field("options", &self.options)
            .field("middleware", &self.middleware)
            .field("state", &self.state)
            .field("subscriptions", &self.order.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::KeyframeSpec;
    use std::sync::Mutex;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn fade() -> Shape {
        Shape::new([
            KeyframeSpec::new(Value::map([("fill", Value::from("#000000"))])).name("dark"),
            KeyframeSpec::new(Value::map([("fill", Value::from("#ffffff"))]))
                .name("light")
                .duration(1000.0),
        ])
        .unwrap()
    }

    fn recorder() -> (Arc<Mutex<Vec<(EventName, f64)>>>, impl FnMut(&Event) + Send) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        (log, move |e: &Event| sink.lock().unwrap().push((e.name, e.at)))
    }

    #[test]
    fn test_build_defaults() {
        let timeline = Timeline::builder().shape(fade()).build().unwrap();
        assert_eq!(timeline.duration(), 1000.0);
        assert_eq!(*timeline.playback_options(), PlaybackOptions::new(1000.0));
        assert_eq!(timeline.middleware().names(), vec!["color", "unit"]);
        assert_eq!(&*timeline.shapes()[0].name, "0");
    }

    #[test]
    fn test_shape_attaches_once() {
        let shape = fade();
        let _timeline = Timeline::builder().shape(shape.clone()).build().unwrap();
        assert!(shape.is_attached());
        assert!(matches!(
            Timeline::builder().shape(shape).build(),
            Err(TimelineError::AlreadyAttached(_))
        ));
    }

    #[test]
    fn test_unencodable_keyframe_fails_build() {
        let mut value = Value::from("10px");
        for _ in 0..=wilderness_core::tree::MAX_DEPTH {
            value = Value::List(vec![value]);
        }
        let deep = Shape::new([KeyframeSpec::new(value)]).unwrap();

        let err = Timeline::builder()
            .shape(fade())
            .shape(deep.clone())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            TimelineError::Core(wilderness_core::CoreError::Validation(_))
        ));
        assert!(!deep.is_attached());
    }

    #[test]
    fn test_failed_build_releases_claims() {
        let first = fade();
        let second = fade();
        let err = Timeline::builder()
            .shape(first.clone())
            .shape(second.clone())
            .shape(first.clone())
            .build()
            .unwrap_err();
        assert!(matches!(err, TimelineError::AlreadyAttached(ref name) if name == "2"));
        assert!(!first.is_attached());
        assert!(!second.is_attached());

        // Options fail before anything is claimed
        let err = Timeline::builder()
            .shape(first.clone())
            .playback(PlaybackConfig::default().delay(-1.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, TimelineError::Validation(_)));
        assert!(!first.is_attached());
    }

    #[test]
    fn test_weak_shape_reference() {
        let shape = fade();
        let timeline = Timeline::builder().shape(shape.clone()).build().unwrap();
        assert!(timeline.shapes()[0].shape().unwrap().ptr_eq(&shape));
        drop(shape);
        assert!(timeline.shapes()[0].shape().is_none());
        // Encoded keyframes are owned by the timeline
        assert!(timeline.frame_at_position(0.5).is_ok());
    }

    #[test]
    fn test_frame_tweens_authored_values() {
        let timeline = Timeline::builder()
            .shape(fade())
            .playback(PlaybackConfig::default().started(0.0))
            .build()
            .unwrap();

        let frame = timeline.frame(500.0).unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame[0].position, 0.5);
        assert_eq!(frame[0].value, Value::map([("fill", Value::from("#808080"))]));

        let end = timeline.frame(2000.0).unwrap();
        assert_eq!(end[0].value, Value::map([("fill", Value::from("#ffffff"))]));
    }

    #[test]
    fn test_frame_outside_shape_window() {
        let grow = |from: &str, to: &str| {
            Shape::new([
                KeyframeSpec::new(from),
                KeyframeSpec::new(to).duration(100.0),
            ])
            .unwrap()
        };
        let timeline = Timeline::builder()
            .shape(grow("0px", "10px"))
            .shape(grow("10px", "20px"))
            .build()
            .unwrap();

        let frame = timeline.frame_at_position(0.25).unwrap();
        assert_eq!(frame[0].value, Value::from("5px"));
        assert_eq!(frame[1].value, Value::from("10px"));
        assert_eq!(frame[1].position, 0.0);

        let frame = timeline.frame_at_position(1.0).unwrap();
        assert_eq!(frame[0].value, Value::from("10px"));
        assert_eq!(frame[1].value, Value::from("20px"));
    }

    #[test]
    fn test_frame_reports_structure_mismatch() {
        let shape = Shape::new([
            KeyframeSpec::new(vec![1.0, 2.0]),
            KeyframeSpec::new(vec![1.0]),
        ])
        .unwrap();
        let timeline = Timeline::builder().shape(shape).build().unwrap();
        assert!(matches!(
            timeline.frame_at_position(0.5),
            Err(TimelineError::Core(_))
        ));
    }

    #[test]
    fn test_events_dispatched_in_subscription_order() {
        let mut timeline = Timeline::builder()
            .shape(fade())
            .playback(PlaybackConfig::default().duration(100.0).iterations(2.0))
            .build()
            .unwrap();
        timeline.play(0.0, PlaybackConfig::default()).unwrap();

        let order = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = (order.clone(), order.clone());
        timeline.subscribe(EventName::TimelineFinish, move |_| a.lock().unwrap().push("a"));
        let second = timeline.subscribe(EventName::TimelineFinish, move |_| {
            b.lock().unwrap().push("b")
        });

        timeline.sample_position(150.0);
        let events = timeline.collect_events();
        assert_eq!(events.len(), 1);
        assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);

        assert!(timeline.unsubscribe(second));
        assert!(!timeline.unsubscribe(second));
        timeline.sample_position(250.0);
        timeline.collect_events();
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_keyframe_and_shape_events_carry_names() {
        let mut timeline = Timeline::builder()
            .queued(QueuedShape::new(fade()).name("fade"))
            .playback(PlaybackConfig::default().started(0.0))
            .build()
            .unwrap();
        timeline.sample_position(1000.0);
        let events =
            timeline.collect_events_for(&[EventName::Keyframe, EventName::ShapeFinish]);

        let seen: Vec<(EventName, f64, Vec<&str>)> = events
            .iter()
            .map(|e| (e.name, e.at, e.args.iter().map(|a| &**a).collect()))
            .collect();
        assert_eq!(
            seen,
            vec![
                (EventName::Keyframe, 0.0, vec!["fade", "dark"]),
                (EventName::Keyframe, 1000.0, vec!["fade", "light"]),
                (EventName::ShapeFinish, 1000.0, vec!["fade"]),
            ]
        );
    }

    #[test]
    fn test_no_events_while_paused() {
        let mut timeline = Timeline::builder().shape(fade()).build().unwrap();
        let (log, sink) = recorder();
        timeline.subscribe(EventName::Frame, sink);

        timeline.sample_position(100.0);
        assert!(timeline.collect_events().is_empty());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_pause_and_resume_mid_cycle() {
        let mut timeline = Timeline::builder().shape(fade()).build().unwrap();
        timeline.play(0.0, PlaybackConfig::default()).unwrap();
        assert!(approx(timeline.sample_position(400.0), 0.4));

        timeline.pause(400.0, PlaybackConfig::default()).unwrap();
        assert_eq!(timeline.playback_options().started, None);
        assert!(approx(timeline.sample_position(9000.0), 0.4));

        timeline.play(10_000.0, PlaybackConfig::default()).unwrap();
        assert!(approx(timeline.sample_position(10_000.0), 0.4));
        assert!(approx(timeline.sample_position(10_300.0), 0.7));
    }

    #[test]
    fn test_reverse_toggle_keeps_position() {
        let mut timeline = Timeline::builder().shape(fade()).build().unwrap();
        timeline.play(0.0, PlaybackConfig::default()).unwrap();
        timeline.sample_position(300.0);

        timeline
            .play(300.0, PlaybackConfig::default().reverse(true))
            .unwrap();
        assert!(approx(timeline.sample_position(300.0), 0.3));
        assert!(approx(timeline.sample_position(400.0), 0.2));
        assert!(approx(timeline.sample_position(600.0), 0.0));
        assert!(timeline.state().finished);
    }

    #[test]
    fn test_play_restarts_when_finished() {
        let mut timeline = Timeline::builder().shape(fade()).build().unwrap();
        timeline.play(0.0, PlaybackConfig::default()).unwrap();
        timeline.sample_position(5000.0);
        assert!(timeline.state().finished);

        timeline.play(6000.0, PlaybackConfig::default()).unwrap();
        assert_eq!(timeline.playback_options().initial_iterations, 0.0);
        assert!(approx(timeline.sample_position(6250.0), 0.25));
    }

    #[test]
    fn test_play_with_explicit_offset() {
        let mut timeline = Timeline::builder().shape(fade()).build().unwrap();
        timeline
            .play(
                0.0,
                PlaybackConfig::default().iterations(3.0).initial_iterations(1.5),
            )
            .unwrap();
        assert!(approx(timeline.sample_position(0.0), 0.5));

        assert!(matches!(
            timeline.play(0.0, PlaybackConfig::default().initial_iterations(-1.0)),
            Err(TimelineError::Validation(_))
        ));
    }

    #[test]
    fn test_play_resets_event_window() {
        let mut timeline = Timeline::builder().shape(fade()).build().unwrap();
        let (log, sink) = recorder();
        timeline.subscribe(EventName::TimelineStart, sink);

        timeline.play(0.0, PlaybackConfig::default()).unwrap();
        timeline.sample_position(500.0);
        timeline.collect_events();
        timeline.pause(500.0, PlaybackConfig::default()).unwrap();
        timeline.play(800.0, PlaybackConfig::default()).unwrap();
        timeline.sample_position(900.0);
        timeline.collect_events();

        // Resuming mid-cycle does not replay the start
        assert_eq!(*log.lock().unwrap(), vec![(EventName::TimelineStart, 0.0)]);
    }

    #[test]
    fn test_resume_on_cycle_boundary_does_not_repeat_start() {
        let mut timeline = Timeline::builder()
            .shape(fade())
            .playback(PlaybackConfig::default().iterations(3.0))
            .build()
            .unwrap();
        let (log, sink) = recorder();
        timeline.subscribe(EventName::TimelineStart, sink);

        timeline.play(0.0, PlaybackConfig::default()).unwrap();
        timeline.sample_position(1000.0);
        timeline.collect_events();
        timeline.pause(1000.0, PlaybackConfig::default()).unwrap();
        timeline.sample_position(1500.0);
        timeline.collect_events();
        timeline.play(2000.0, PlaybackConfig::default()).unwrap();
        timeline.sample_position(2100.0);
        timeline.collect_events();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                (EventName::TimelineStart, 0.0),
                (EventName::TimelineStart, 1000.0)
            ]
        );
    }

    #[test]
    fn test_restart_after_finish_fires_start() {
        let mut timeline = Timeline::builder().shape(fade()).build().unwrap();
        let (log, sink) = recorder();
        timeline.subscribe(EventName::TimelineStart, sink);

        timeline.play(0.0, PlaybackConfig::default()).unwrap();
        timeline.sample_position(1000.0);
        timeline.collect_events();
        assert!(timeline.state().finished);

        timeline.play(1500.0, PlaybackConfig::default()).unwrap();
        timeline.sample_position(1600.0);
        timeline.collect_events();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                (EventName::TimelineStart, 0.0),
                (EventName::TimelineStart, 1500.0)
            ]
        );
    }

    #[test]
    fn test_collect_before_play_keeps_start() {
        let mut timeline = Timeline::builder().shape(fade()).build().unwrap();
        let (log, sink) = recorder();
        timeline.subscribe(EventName::TimelineStart, sink);

        timeline.sample_position(0.0);
        assert!(timeline.collect_events().is_empty());
        timeline.play(0.0, PlaybackConfig::default()).unwrap();
        timeline.sample_position(10.0);
        timeline.collect_events();

        assert_eq!(*log.lock().unwrap(), vec![(EventName::TimelineStart, 0.0)]);
    }

    #[test]
    fn test_fractional_start_reaches_finish() {
        let mut timeline = Timeline::builder().shape(fade()).build().unwrap();
        let (log, sink) = recorder();
        timeline.subscribe(EventName::TimelineFinish, sink);

        timeline.play(123.456, PlaybackConfig::default()).unwrap();
        let mut at = 123.456;
        while at <= 1500.0 {
            timeline.sample_position(at);
            timeline.collect_events();
            at += 16.0;
        }

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert!(approx(log[0].1, 1123.456));
    }
}
