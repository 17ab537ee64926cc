//! Cliplane Playback - Transport clock and clip activation
//!
//! Architecture:
//! - `TimelineClock`: play/pause/stop state machine with loop wraparound
//! - `TickScheduler`: cancelable "tick me until told to stop" host contract
//! - `activation`: pure per-track decision of which clip is live and how loud
//! - `Session`: the single-writer state object tying store, clipboard, view
//!   and clock together

pub mod activation;
pub mod clock;
pub mod scheduler;
pub mod session;

pub use activation::{activate, activate_track, clip_at, fade_multiplier, ActivationFrame, TrackActivation};
pub use clock::{LoopRegion, PlaybackState, TickOutcome, TimelineClock};
pub use scheduler::{ManualScheduler, ThreadScheduler, Tick, TickHandle, TickScheduler};
pub use session::{PlaybackFrame, Session};
