//! Motion error types

use crate::drag::DragConstraints;
use aethel_animation::AnimationError;
use aethel_core::CoreError;
use thiserror::Error;

/// Errors raised while configuring or mounting motion components
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Magnetic strength is NaN or infinite
    #[error("Invalid magnetic strength {0}")]
    InvalidStrength(f32),

    /// Hover category without a name
    #[error("Hover category name must not be empty")]
    EmptyCategoryName,

    /// Hover category with a negative or non-finite size
    #[error("Invalid size {size} for hover category '{name}'")]
    InvalidCategorySize { name: String, size: f32 },

    /// Input source name not recognised
    #[error("Unknown input source '{0}'")]
    UnknownInput(String),

    /// Component mounted on a node that is not in the tree
    #[error("Cannot mount on a node outside the tree")]
    UnknownNode,

    /// Drag box with an inverted or non-finite edge
    #[error("Invalid drag constraints {0:?}")]
    InvalidDragConstraints(DragConstraints),

    #[error(transparent)]
    Animation(#[from] AnimationError),

    /// Selector text could not be parsed
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
