//! Value pipeline error types

use thiserror::Error;

/// Errors raised while converting, easing or tweening values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// `from` and `to` differ in shape somewhere in the tree
    #[error("Structure mismatch at `{path}`: {reason}")]
    StructureMismatch {
        /// Dotted path of the first mismatching node (`$` is the root)
        path: String,
        reason: String,
    },

    /// No easing curve registered under this name
    #[error("Unknown easing: {0}")]
    UnknownEasing(String),

    /// A value that a codec cannot represent
    #[error("Invalid value: {0}")]
    Validation(String),
}

/// Result type for value pipeline operations
pub type Result<T> = std::result::Result<T, CoreError>;
