//! Cliplane Core - Foundation types for the clip timeline
//!
//! This crate provides the small set of types every other crate shares:
//! - The workspace error type and `Result` alias
//! - Time ranges measured in seconds
//! - Editing limits and the clamping helpers that enforce them

pub mod error;
pub mod time;

pub use error::{CliplaneError, Result};
pub use time::{clamp_unit, Seconds, TimeRange};

/// Editing and playback limits shared across the workspace.
pub mod limits {
    use crate::time::Seconds;

    /// Timeline length of a freshly created session.
    pub const DEFAULT_PROJECT_DURATION: Seconds = 120.0;

    /// Shortest clip a resize may produce.
    pub const MIN_CLIP_DURATION: Seconds = 1.0;

    /// Longest fade-in or fade-out a clip may carry.
    pub const MAX_FADE: Seconds = 10.0;

    /// Playback speed bounds.
    pub const MIN_PLAYBACK_SPEED: f64 = 0.5;
    pub const MAX_PLAYBACK_SPEED: f64 = 2.0;

    /// Timeline zoom bounds (1.0 = unzoomed).
    pub const MIN_ZOOM: f64 = 0.1;
    pub const MAX_ZOOM: f64 = 10.0;

    /// Number of tracks a new session starts with.
    pub const DEFAULT_TRACK_COUNT: usize = 3;
}
