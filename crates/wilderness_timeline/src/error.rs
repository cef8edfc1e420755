//! Timeline error types

use thiserror::Error;
use wilderness_core::CoreError;

/// Errors raised while building, configuring or sampling a timeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// Malformed option value (out of range, NaN, wrong kind)
    #[error("Invalid option: {0}")]
    Validation(String),

    /// A `follow` directive names no shape or keyframe placed before it
    #[error("Reference not found: `{0}`")]
    ReferenceNotFound(String),

    /// The shape already belongs to a timeline
    #[error("Shape is already attached to a timeline: `{0}`")]
    AlreadyAttached(String),

    /// Two shapes (or two keyframes of one shape) share a name
    #[error("Duplicate name: `{0}`")]
    DuplicateName(String),

    /// A configuration document could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tween, easing or middleware failure
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;
