//! Wilderness Timeline
//!
//! Multi-shape animation timelines driven by an external clock.
//!
//! # Features
//!
//! - **Position Engine**: normalized position at any instant, with fractional
//!   or infinite iterations, alternation, reverse and mid-cycle resume
//! - **Event Scheduler**: every start/finish/keyframe crossing between two
//!   ticks, in order
//! - **Layout**: shapes queued after each other, after named shapes or
//!   keyframes, with offsets
//! - **Frames**: interpolated shape values in their authored form
//! - **Configuration**: TOML or JSON timeline documents
//!
//! ```
//! use wilderness_timeline::{EventName, KeyframeSpec, PlaybackConfig, Shape, Timeline};
//!
//! let fade = Shape::new([
//!     KeyframeSpec::new("#000000"),
//!     KeyframeSpec::new("#ffffff").duration(1000.0),
//! ])?;
//! let mut timeline = Timeline::builder().shape(fade).build()?;
//! timeline.subscribe(EventName::TimelineFinish, |event| println!("done at {}", event.at));
//!
//! timeline.play(0.0, PlaybackConfig::default())?;
//! assert_eq!(timeline.sample_position(250.0), 0.25);
//! timeline.collect_events();
//! # Ok::<(), wilderness_timeline::TimelineError>(())
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod layout;
pub mod playback;
pub mod shape;
pub mod timeline;

pub use config::{Iterations, PlaybackConfig, ShapeConfig, TimelineConfig};
pub use error::{Result, TimelineError};
pub use events::{crossings, event_queue, timestamps, Event, EventName};
pub use layout::{layout, Layout, Placement, Queue, QueueDirective, QueuedShape};
pub use playback::{position, PlaybackOptions, PlaybackState};
pub use shape::{Keyframe, KeyframeSpec, Shape};
pub use timeline::{ShapeFrame, SubscriptionId, Timeline, TimelineBuilder, TimelineShape};

pub use wilderness_core::{Easing, EasingRegistry, MiddlewareStack, Value};
