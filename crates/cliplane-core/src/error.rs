//! Error types for Cliplane.

use thiserror::Error;

/// Main error type for Cliplane operations.
#[derive(Error, Debug)]
pub enum CliplaneError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CliplaneError {
    /// Shorthand for a missing track.
    pub fn track_not_found(track_id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("track {track_id}"))
    }

    /// Shorthand for a missing clip on a track.
    pub fn clip_not_found(track_id: impl std::fmt::Display, clip_id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("clip {clip_id} on track {track_id}"))
    }

    /// True for the `NotFound` variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias for Cliplane operations.
pub type Result<T> = std::result::Result<T, CliplaneError>;
