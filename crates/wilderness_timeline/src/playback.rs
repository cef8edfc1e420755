//! Playback options and the position engine
//!
//! Position is a pure function of the resolved [`PlaybackOptions`] and an
//! absolute timestamp. Time is measured in milliseconds on whatever clock the
//! caller ticks with; this module never reads a clock itself.
//!
//! Progress is tracked as a count of *cycles* (iterations). The count starts
//! at `initial_iterations` when playback starts and grows by one per
//! `duration`, up to `iterations`. Each cycle runs 0 → 1, or 1 → 0 when it is
//! reversed (`reverse` XOR (`alternate` AND odd cycle)).

use crate::error::{Result, TimelineError};

/// Iteration count used when none is configured
pub const DEFAULT_ITERATIONS: f64 = 1.0;

/// Resolved playback parameters for one playback session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackOptions {
    /// Odd cycles run in the opposite direction
    pub alternate: bool,
    /// Milliseconds between `started` and the first cycle beginning
    pub delay: f64,
    /// Milliseconds per cycle
    pub duration: f64,
    /// Cycles already complete when playback starts (may be fractional)
    pub initial_iterations: f64,
    /// Total cycles; `f64::INFINITY` loops forever
    pub iterations: f64,
    /// Cycle 0 runs 1 → 0
    pub reverse: bool,
    /// Timestamp playback started at; `None` while paused
    pub started: Option<f64>,
}

impl PlaybackOptions {
    /// Defaults for a timeline of the given duration
    pub fn new(duration: f64) -> Self {
        Self {
            alternate: false,
            delay: 0.0,
            duration,
            initial_iterations: 0.0,
            iterations: DEFAULT_ITERATIONS,
            reverse: false,
            started: None,
        }
    }

    pub fn alternate(mut self, alternate: bool) -> Self {
        self.alternate = alternate;
        self
    }

    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn initial_iterations(mut self, initial_iterations: f64) -> Self {
        self.initial_iterations = initial_iterations;
        self
    }

    pub fn iterations(mut self, iterations: f64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Loop forever
    pub fn infinite(self) -> Self {
        self.iterations(f64::INFINITY)
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn started(mut self, at: f64) -> Self {
        self.started = Some(at);
        self
    }

    /// Check every range invariant
    pub fn validate(&self) -> Result<()> {
        non_negative_finite("delay", self.delay)?;
        non_negative_finite("duration", self.duration)?;
        non_negative_finite("initial_iterations", self.initial_iterations)?;
        if self.iterations.is_nan() || self.iterations < 0.0 {
            return Err(TimelineError::Validation(format!(
                "iterations must be >= 0, got {}",
                self.iterations
            )));
        }
        if self.initial_iterations > self.iterations {
            return Err(TimelineError::Validation(format!(
                "initial_iterations ({}) exceeds iterations ({})",
                self.initial_iterations, self.iterations
            )));
        }
        if let Some(started) = self.started {
            if !started.is_finite() {
                return Err(TimelineError::Validation(format!(
                    "started must be a finite timestamp, got {}",
                    started
                )));
            }
        }
        Ok(())
    }

    pub fn is_infinite(&self) -> bool {
        self.iterations.is_infinite()
    }

    /// Timestamp at which the first cycle begins (`started + delay`)
    pub fn effective_start(&self) -> Option<f64> {
        self.started.map(|started| started + self.delay)
    }

    /// Timestamp at which the cycle count would have been zero
    ///
    /// Every event timestamp is `origin + duration * cycles`.
    pub fn origin(&self) -> Option<f64> {
        self.effective_start()
            .map(|start| start - self.initial_iterations * self.duration)
    }

    /// Timestamp of the terminal position, if playback is finite and running
    pub fn finish_at(&self) -> Option<f64> {
        if self.is_infinite() {
            return None;
        }
        self.origin()
            .map(|origin| origin + self.duration * self.iterations)
    }

    /// Whether cycle `index` runs 1 → 0
    pub fn is_reversed(&self, index: f64) -> bool {
        self.reverse ^ (self.alternate && index % 2.0 == 1.0)
    }
}

fn non_negative_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TimelineError::Validation(format!(
            "{} must be a finite number >= 0, got {}",
            name, value
        )))
    }
}

/// Split a cycle count into `(cycle index, progress within cycle)`
///
/// A positive whole count belongs to the cycle that just ended, at progress
/// 1, not to the next cycle at progress 0.
pub fn cycle_progress(cycles: f64) -> (f64, f64) {
    if cycles <= 0.0 {
        return (0.0, 0.0);
    }
    let index = cycles.floor();
    let progress = cycles - index;
    if progress == 0.0 {
        (index - 1.0, 1.0)
    } else {
        (index, progress)
    }
}

/// Cycles complete at `at`, including `initial_iterations`
///
/// Clamped to `iterations`. While paused (`started` unset) this is the
/// configured starting offset and `at` is ignored. A zero duration never
/// progresses.
pub fn iterations_complete(opts: &PlaybackOptions, at: f64) -> f64 {
    let cycles = match opts.effective_start() {
        Some(start) if opts.duration > 0.0 => (at - start).max(0.0) / opts.duration,
        _ => 0.0,
    };
    (opts.initial_iterations + cycles).min(opts.iterations)
}

/// Position in `[0, 1]` after `cycles` cycles
pub fn position_at_cycles(opts: &PlaybackOptions, cycles: f64) -> f64 {
    let (index, progress) = cycle_progress(cycles.min(opts.iterations));
    let position = if opts.is_reversed(index) {
        1.0 - progress
    } else {
        progress
    };
    position.clamp(0.0, 1.0)
}

/// Normalized timeline position at `at`
pub fn position(opts: &PlaybackOptions, at: f64) -> f64 {
    position_at_cycles(opts, iterations_complete(opts, at))
}

/// Cycle count that shows the same position as `cycles` but travels the
/// other way once `reverse` is flipped
///
/// For finite playback this is the mirrored count `iterations - cycles`,
/// which plays the remaining time back over the time already played, as long
/// as that shows the same position. Otherwise the count is mirrored within
/// its own cycle.
pub fn mirrored_cycles(opts: &PlaybackOptions, cycles: f64) -> f64 {
    let flipped = PlaybackOptions {
        reverse: !opts.reverse,
        ..*opts
    };
    let shown = position_at_cycles(opts, cycles);

    if opts.iterations.is_finite() {
        let mirrored = opts.iterations - cycles;
        if (position_at_cycles(&flipped, mirrored) - shown).abs() < 1e-9 {
            return mirrored;
        }
    }

    let (index, progress) = cycle_progress(cycles);
    (index + 1.0 - progress).min(opts.iterations)
}

/// Coarse playback state observed at one sampling tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackState {
    /// Playback is running and the delay has elapsed
    pub started: bool,
    /// The iteration budget is used up
    pub finished: bool,
    /// Cycles complete, including `initial_iterations`
    pub iterations_complete: f64,
}

impl PlaybackState {
    /// Observe `opts` at `at`
    pub fn at(opts: &PlaybackOptions, at: f64) -> Self {
        let iterations_complete = iterations_complete(opts, at);
        Self {
            started: opts.effective_start().map_or(false, |start| at >= start),
            finished: iterations_complete >= opts.iterations,
            iterations_complete,
        }
    }
}
