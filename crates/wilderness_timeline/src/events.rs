//! Event scheduling
//!
//! Events are never stored. On every sampling tick the scheduler works out
//! the window of time covered since the previous tick, enumerates every
//! moment in that window at which a watched position was crossed, and
//! returns them sorted.
//!
//! All timestamps derive from the timeline's virtual origin, the moment at
//! which the cycle count would have been zero: a position `p` is crossed in
//! cycle `k` at `origin + duration * (k + p)`, or `k + 1 - p` when the cycle
//! is reversed.

use crate::error::{Result, TimelineError};
use crate::playback::{position_at_cycles, PlaybackOptions, PlaybackState};
use crate::timeline::TimelineShape;
use smallvec::SmallVec;
use std::fmt;
use std::ops::Bound;
use std::str::FromStr;
use std::sync::Arc;

/// Kinds of event a timeline emits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventName {
    TimelineStart,
    TimelineFinish,
    ShapeStart,
    ShapeFinish,
    Keyframe,
    Frame,
}

impl EventName {
    pub const ALL: [EventName; 6] = [
        EventName::TimelineStart,
        EventName::TimelineFinish,
        EventName::ShapeStart,
        EventName::ShapeFinish,
        EventName::Keyframe,
        EventName::Frame,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::TimelineStart => "timeline.start",
            EventName::TimelineFinish => "timeline.finish",
            EventName::ShapeStart => "shape.start",
            EventName::ShapeFinish => "shape.finish",
            EventName::Keyframe => "keyframe",
            EventName::Frame => "frame",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self> {
        EventName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| TimelineError::Validation(format!("unknown event name `{}`", s)))
    }
}

/// One occurrence, handed to subscribers and then dropped
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub name: EventName,
    pub at: f64,
    /// Shape name, then keyframe name, where they apply
    pub args: SmallVec<[Arc<str>; 2]>,
}

impl Event {
    fn new(name: EventName, at: f64, args: SmallVec<[Arc<str>; 2]>) -> Self {
        Self { name, at, args }
    }
}

/// Span of progress covered by one scheduling call, in cycles
///
/// Bounds are cycle counts (see [`crate::playback::iterations_complete`]),
/// not timestamps, so a crossing that lands exactly on a bound is never lost
/// to rounding on the way to milliseconds and back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventWindow {
    /// Exclusive lower bound; `None` when nothing before the window fired
    pub after: Option<f64>,
    /// Inclusive upper bound
    pub until: f64,
}

impl EventWindow {
    pub fn contains(&self, cycles: f64) -> bool {
        cycles <= self.until && self.after.map_or(true, |after| cycles > after)
    }

    fn lower(&self) -> Bound<f64> {
        match self.after {
            Some(after) => Bound::Excluded(after),
            None => Bound::Unbounded,
        }
    }
}

/// Options and state observed on the previous scheduling call
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    pub options: PlaybackOptions,
    pub state: PlaybackState,
    /// Position reached by the last live tick, if playback was still running
    ///
    /// Survives option changes and idle ticks, so resuming from exactly this
    /// position does not fire its events a second time.
    pub resume_position: Option<f64>,
}

impl Snapshot {
    /// Snapshot to keep after a scheduling call observed `state`
    pub fn observe(
        opts: &PlaybackOptions,
        state: &PlaybackState,
        previous: Option<&Snapshot>,
    ) -> Self {
        let resume_position = if is_live(opts, state, previous) {
            (!state.finished).then(|| position_at_cycles(opts, state.iterations_complete))
        } else {
            previous.and_then(|prev| prev.resume_position)
        };
        Self {
            options: *opts,
            state: *state,
            resume_position,
        }
    }
}

fn same_options<'a>(opts: &PlaybackOptions, previous: Option<&'a Snapshot>) -> Option<&'a Snapshot> {
    previous.filter(|prev| prev.options == *opts)
}

fn is_live(opts: &PlaybackOptions, state: &PlaybackState, previous: Option<&Snapshot>) -> bool {
    state.started
        && (!state.finished
            || same_options(opts, previous).map_or(true, |prev| !prev.state.finished))
}

/// Window to enumerate for `state`, or `None` if the timeline is idle
///
/// A timeline is live once started, and stays live for the one tick on
/// which it becomes finished. Changing any option discards the previous
/// window so nothing fires or is suppressed retroactively; the one thing
/// carried over is the resume point, when playback picks up exactly where
/// the last live tick left it.
pub fn event_window(
    opts: &PlaybackOptions,
    state: &PlaybackState,
    previous: Option<&Snapshot>,
) -> Option<EventWindow> {
    if !is_live(opts, state, previous) {
        return None;
    }

    let after = match previous {
        Some(prev) if prev.options == *opts => {
            prev.state.started.then_some(prev.state.iterations_complete)
        }
        Some(prev) => {
            let resumed = position_at_cycles(opts, opts.initial_iterations);
            prev.resume_position
                .filter(|position| (position - resumed).abs() < POSITION_EPSILON)
                .map(|_| opts.initial_iterations)
        }
        None => None,
    };
    Some(EventWindow {
        after,
        until: state.iterations_complete,
    })
}

const POSITION_EPSILON: f64 = 1e-9;

/// Cycle counts within `(lower, upper]` at which the timeline reaches `target`
///
/// Candidates are walked cycle by cycle from `initial_iterations`. With
/// `alternate`, positions 0 and 1 are shared by neighbouring cycles and
/// recur every second cycle. A boundary that coincides with the final
/// position of a finite timeline is only reported if playback actually ends
/// on it.
pub fn crossings(opts: &PlaybackOptions, target: f64, lower: Bound<f64>, upper: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if opts.duration <= 0.0 {
        return out;
    }

    let upper = upper.min(opts.iterations);
    let edge = target == 0.0 || target == 1.0;
    let stride = if opts.alternate && edge { 2.0 } else { 1.0 };
    let final_position = opts
        .iterations
        .is_finite()
        .then(|| position_at_cycles(opts, opts.iterations));

    let crossing = |k: f64| {
        if opts.is_reversed(k) {
            k + 1.0 - target
        } else {
            k + target
        }
    };
    let below = |cycles: f64| match lower {
        Bound::Included(min) => cycles < min,
        Bound::Excluded(min) => cycles <= min,
        Bound::Unbounded => false,
    };

    let mut k = opts.initial_iterations.floor();
    if crossing(k) < opts.initial_iterations {
        k += stride;
    }
    // Skip whole back-and-forth pairs that end before the window
    if let Bound::Included(min) | Bound::Excluded(min) = lower {
        let pairs = ((min - k) / 2.0).floor() - 1.0;
        if pairs > 0.0 {
            k += pairs * 2.0;
        }
    }

    loop {
        let cycles = crossing(k);
        if cycles > upper {
            break;
        }
        k += stride;

        if edge && cycles == opts.iterations && final_position != Some(target) {
            continue;
        }
        if below(cycles) {
            continue;
        }
        out.push(cycles);
    }
    out
}

/// Every timestamp in `[min, max]` at which the timeline reaches `target`
///
/// Convenience over [`crossings`] for callers that think in milliseconds.
/// Empty while playback has not started.
pub fn timestamps(opts: &PlaybackOptions, target: f64, min: Option<f64>, max: f64) -> Vec<f64> {
    let Some(origin) = opts.origin() else {
        return Vec::new();
    };
    if opts.duration <= 0.0 {
        return Vec::new();
    }
    let to_cycles = |at: f64| (at - origin) / opts.duration;
    let lower = min.map_or(Bound::Unbounded, |min| Bound::Included(to_cycles(min)));
    crossings(opts, target, lower, to_cycles(max))
        .into_iter()
        .map(|cycles| origin + opts.duration * cycles)
        .collect()
}

/// Events for `names` within the window implied by `state` and `previous`
///
/// Groups are enumerated in the order of `names` and then stably sorted by
/// timestamp, so simultaneous events keep that order. `frame` fires once, at
/// the end of the window.
pub fn event_queue(
    opts: &PlaybackOptions,
    shapes: &[TimelineShape],
    state: &PlaybackState,
    previous: Option<&Snapshot>,
    names: &[EventName],
) -> Vec<Event> {
    let Some(window) = event_window(opts, state, previous) else {
        return Vec::new();
    };
    let Some(origin) = opts.origin() else {
        return Vec::new();
    };
    tracing::trace!("Event window ({:?}, {}] cycles", window.after, window.until);

    let mut scheduler = Scheduler {
        opts,
        window,
        origin,
        events: Vec::new(),
    };
    for &name in names {
        match name {
            EventName::TimelineStart => scheduler.push(name, 0.0, SmallVec::new()),
            EventName::TimelineFinish => scheduler.push(name, 1.0, SmallVec::new()),
            EventName::ShapeStart | EventName::ShapeFinish => {
                for shape in shapes {
                    let target = if name == EventName::ShapeStart {
                        shape.start
                    } else {
                        shape.end
                    };
                    scheduler.push(name, target, smallvec::smallvec![shape.name.clone()]);
                }
            }
            EventName::Keyframe => {
                for shape in shapes {
                    for keyframe in &shape.keyframes {
                        let target = shape.start + (shape.end - shape.start) * keyframe.position;
                        let args = smallvec::smallvec![shape.name.clone(), keyframe.name.clone()];
                        scheduler.push(name, target, args);
                    }
                }
            }
            EventName::Frame => {
                if window.contains(window.until) {
                    let at = scheduler.at(window.until);
                    scheduler.events.push(Event::new(name, at, SmallVec::new()));
                }
            }
        }
    }

    let mut events = scheduler.events;
    events.sort_by(|a, b| a.at.total_cmp(&b.at));
    tracing::trace!("Collected {} events", events.len());
    events
}

struct Scheduler<'a> {
    opts: &'a PlaybackOptions,
    window: EventWindow,
    origin: f64,
    events: Vec<Event>,
}

impl Scheduler<'_> {
    fn at(&self, cycles: f64) -> f64 {
        self.origin + self.opts.duration * cycles
    }

    fn push(&mut self, name: EventName, target: f64, args: SmallVec<[Arc<str>; 2]>) {
        let found = crossings(self.opts, target, self.window.lower(), self.window.until);
        for cycles in found {
            let at = self.at(cycles);
            self.events.push(Event::new(name, at, args.clone()));
        }
    }
}
