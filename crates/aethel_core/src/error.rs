//! Core error types

use thiserror::Error;

/// Errors raised while building element trees and selectors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Selector text could not be parsed
    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    /// Node id does not belong to the tree
    #[error("Unknown node")]
    UnknownNode,
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
