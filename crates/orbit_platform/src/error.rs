//! Platform error types

use thiserror::Error;

/// Host-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// The element id does not refer to a live element
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// A 2D context was requested from something that is not a canvas
    #[error("Element is not a canvas: {0}")]
    NotACanvas(String),

    /// The host cannot provide a 2D drawing context
    #[error("2D context unavailable: {0}")]
    ContextUnavailable(String),

    /// A style declaration list could not be parsed
    #[error("Invalid style declarations: {0}")]
    InvalidStyle(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
