//! Component error types

use orbit_platform::PlatformError;
use thiserror::Error;

/// Errors raised while constructing or driving a progress ring
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RingError {
    /// The selector or element did not resolve to a live container
    #[error("Mount target missing: {0}")]
    MountTargetMissing(String),

    /// The host could not provide a 2D drawing context for the canvas
    #[error("Missing render context: {0}")]
    MissingRenderContext(#[source] PlatformError),

    /// An option failed validation
    #[error("Invalid option `{option}`: {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for component operations
pub type Result<T> = std::result::Result<T, RingError>;
