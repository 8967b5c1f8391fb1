//! Animation error types
//!
//! Only construction can fail. Once a spring, range or mapping exists, every
//! runtime input is absorbed (clamped or ignored) instead of reported.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Range bounds are non-finite or not strictly increasing
    #[error("Invalid scroll range [{start}, {end}]: start must be below end")]
    InvalidRange { start: f32, end: f32 },

    /// Sequence index outside `0..count`, or an empty sequence
    #[error("Invalid sequence slot {index} of {count}")]
    InvalidSequence { index: usize, count: usize },

    /// Interpolation endpoints of different kinds
    #[error("Cannot interpolate between {from} and {to}")]
    MismatchedValues {
        from: &'static str,
        to: &'static str,
    },

    /// Colour text could not be parsed
    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    /// Scroll offset text could not be parsed
    #[error("Invalid scroll offset '{0}'")]
    InvalidOffset(String),

    /// Unknown easing name
    #[error("Invalid easing '{0}'")]
    InvalidEasing(String),

    /// Spring parameters outside their physical domain
    #[error("Invalid spring: {0}")]
    InvalidSpring(String),

    /// Keyframe track without stops, or with unsorted/non-finite stops
    #[error("Invalid keyframe track: {0}")]
    InvalidTrack(String),
}

/// Result type for animation construction
pub type Result<T> = std::result::Result<T, AnimationError>;
