//! The transport clock.
//!
//! While playing, `current_time = now - anchor`, recomputed on each tick.
//! Wall-clock `now` values are supplied by the caller in seconds, so the
//! clock is driven identically by a real host and by tests.

use cliplane_core::time::clamp_between;
use cliplane_core::{CliplaneError, Result, Seconds};
use tracing::{debug, info, warn};

use crate::scheduler::{Tick, TickHandle, TickScheduler};

/// Transport state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// A validated loop region: `0 <= start < end <= project_duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopRegion {
    start: Seconds,
    end: Seconds,
}

impl LoopRegion {
    /// Clamp both bounds into the project and swap them if reversed.
    /// An empty region is rejected.
    pub fn new(start: Seconds, end: Seconds, project_duration: Seconds) -> Result<Self> {
        let a = clamp_between(start, 0.0, project_duration);
        let b = clamp_between(end, 0.0, project_duration);
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        if !(end > start) {
            return Err(CliplaneError::InvalidParameter(format!(
                "loop region {start}..{end} is empty"
            )));
        }
        Ok(Self { start, end })
    }

    /// The whole project.
    pub fn full(project_duration: Seconds) -> Self {
        Self {
            start: 0.0,
            end: project_duration,
        }
    }

    pub fn start(&self) -> Seconds {
        self.start
    }

    pub fn end(&self) -> Seconds {
        self.end
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Stale or late tick; nothing changed.
    Ignored,
    /// Time moved forward normally.
    Advanced(Seconds),
    /// The loop end was reached and time jumped back to the loop start.
    Looped(Seconds),
    /// The project end was reached without looping; the clock paused there.
    Ended(Seconds),
}

/// Play/pause/stop state machine with optional loop wraparound.
#[derive(Debug)]
pub struct TimelineClock {
    state: PlaybackState,
    current_time: Seconds,
    project_duration: Seconds,
    looping: bool,
    loop_region: LoopRegion,
    loop_restart_count: u64,
    /// Wall-clock instant at which `current_time` would have been zero.
    anchor: Seconds,
    /// Bumped on every `play()`; ticks from other generations are stale.
    generation: u64,
    handle: Option<TickHandle>,
}

impl TimelineClock {
    pub fn new(project_duration: Seconds) -> Self {
        Self {
            state: PlaybackState::Stopped,
            current_time: 0.0,
            project_duration,
            looping: false,
            loop_region: LoopRegion::full(project_duration),
            loop_restart_count: 0,
            anchor: 0.0,
            generation: 0,
            handle: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn current_time(&self) -> Seconds {
        self.current_time
    }

    pub fn project_duration(&self) -> Seconds {
        self.project_duration
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn loop_region(&self) -> LoopRegion {
        self.loop_region
    }

    /// Incremented exactly once per loop wraparound. Renderers watch it to
    /// resynchronize their own media position.
    pub fn loop_restart_count(&self) -> u64 {
        self.loop_restart_count
    }

    /// Generation of the current (or most recent) playing period.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start or resume playback from the current position.
    ///
    /// Resuming at the very end of a non-looping timeline rewinds to zero.
    pub fn play(&mut self, now: Seconds, scheduler: &mut dyn TickScheduler) {
        if self.is_playing() {
            return;
        }
        if !self.looping && self.current_time >= self.project_duration {
            self.current_time = 0.0;
        }
        self.cancel_ticks();
        self.generation += 1;
        self.anchor = now - self.current_time;
        self.state = PlaybackState::Playing;
        self.handle = Some(scheduler.start(self.generation));
        info!(
            at = self.current_time,
            looping = self.looping,
            loop_start = self.loop_region.start,
            loop_end = self.loop_region.end,
            "Playback started"
        );
    }

    /// Freeze at the last computed time.
    pub fn pause(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.cancel_ticks();
        self.state = PlaybackState::Paused;
        info!(at = self.current_time, "Playback paused");
    }

    /// Stop and rewind to zero.
    pub fn stop(&mut self) {
        self.cancel_ticks();
        self.state = PlaybackState::Stopped;
        self.current_time = 0.0;
        info!("Playback stopped");
    }

    /// Jump to `time`, clamped into the project. Playback continues from
    /// there when playing.
    pub fn seek(&mut self, time: Seconds, now: Seconds) {
        self.current_time = clamp_between(time, 0.0, self.project_duration);
        if self.is_playing() {
            self.anchor = now - self.current_time;
        }
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Flip looping. Returns the new value.
    pub fn toggle_loop(&mut self) -> bool {
        self.looping = !self.looping;
        self.looping
    }

    /// Set the loop bounds. Reversed bounds are swapped; an empty region is
    /// rejected and leaves the previous one in place.
    pub fn set_loop_region(&mut self, start: Seconds, end: Seconds) -> Result<()> {
        match LoopRegion::new(start, end, self.project_duration) {
            Ok(region) => {
                self.loop_region = region;
                Ok(())
            }
            Err(e) => {
                warn!(start, end, "Rejected loop region");
                Err(e)
            }
        }
    }

    /// Resize the project. The playhead and loop region are pulled inside.
    pub fn set_project_duration(&mut self, duration: Seconds) {
        self.project_duration = duration;
        self.current_time = self.current_time.min(duration);
        self.loop_region = LoopRegion::new(self.loop_region.start, self.loop_region.end, duration)
            .unwrap_or_else(|_| LoopRegion::full(duration));
    }

    /// Advance on a scheduler tick.
    ///
    /// A tick performs at most one loop wraparound; ticks from a previous
    /// playing period, or that arrive after a pause or stop, are ignored.
    pub fn tick(&mut self, tick: Tick, now: Seconds) -> TickOutcome {
        if !self.is_playing() || tick.generation() != self.generation {
            return TickOutcome::Ignored;
        }

        let elapsed = now - self.anchor;

        if self.looping && elapsed >= self.loop_region.end {
            self.anchor = now - self.loop_region.start;
            self.current_time = self.loop_region.start;
            self.loop_restart_count += 1;
            debug!(
                from = self.loop_region.end,
                to = self.loop_region.start,
                restarts = self.loop_restart_count,
                "Loop restart"
            );
            return TickOutcome::Looped(self.current_time);
        }

        if elapsed >= self.project_duration {
            self.current_time = self.project_duration;
            self.cancel_ticks();
            self.state = PlaybackState::Paused;
            info!(at = self.current_time, "Reached end of timeline");
            return TickOutcome::Ended(self.current_time);
        }

        self.current_time = elapsed.max(0.0);
        TickOutcome::Advanced(self.current_time)
    }

    fn cancel_ticks(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

impl Drop for TimelineClock {
    fn drop(&mut self) {
        self.cancel_ticks();
    }
}
