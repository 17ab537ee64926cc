//! Tick scheduling: the clock's contract with its host.
//!
//! The clock asks the host to "call back as soon as possible, repeatedly,
//! until cancelled". A scheduler only *delivers* tick tokens; the host feeds
//! them to the clock on its own thread, so edits and ticks stay serialized.
//!
//! Every tick carries the generation of the `play()` that requested it. The
//! clock drops ticks from older generations, so a token that was already in
//! flight when playback paused can never advance a later playing period.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::debug;

/// A request to advance the clock once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
}

impl Tick {
    pub fn new(generation: u64) -> Self {
        Self { generation }
    }

    /// The playing period this tick belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Cancellation handle for one run of ticks.
#[derive(Debug, Clone)]
pub struct TickHandle {
    generation: u64,
    cancelled: Arc<AtomicBool>,
}

impl TickHandle {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop further ticks. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A tick token for this run.
    pub fn tick(&self) -> Tick {
        Tick::new(self.generation)
    }
}

/// Host-provided repeating callback.
pub trait TickScheduler {
    /// Start delivering ticks stamped with `generation` until the returned
    /// handle is cancelled.
    fn start(&mut self, generation: u64) -> TickHandle;
}

// ── Manual scheduler ────────────────────────────────────────────

/// Test-harness scheduler: ticks are pulled by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    active: Option<TickHandle>,
    starts: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next tick, if a run is active and not cancelled.
    pub fn next_tick(&self) -> Option<Tick> {
        self.active
            .as_ref()
            .filter(|handle| !handle.is_cancelled())
            .map(TickHandle::tick)
    }

    /// Whether a run is active.
    pub fn is_running(&self) -> bool {
        self.next_tick().is_some()
    }

    /// Number of runs started so far.
    pub fn starts(&self) -> usize {
        self.starts
    }
}

impl TickScheduler for ManualScheduler {
    fn start(&mut self, generation: u64) -> TickHandle {
        let handle = TickHandle::new(generation);
        self.active = Some(handle.clone());
        self.starts += 1;
        handle
    }
}

// ── Thread scheduler ────────────────────────────────────────────

/// Default frame interval, roughly 60 ticks per second.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Scheduler backed by a sleeping worker thread per run.
///
/// Ticks arrive on [`ThreadScheduler::ticks`]; the host drains that channel
/// and hands each tick to the clock. The channel holds a single pending
/// tick: while the host is busy, further ticks are dropped rather than
/// queued.
#[derive(Debug)]
pub struct ThreadScheduler {
    interval: Duration,
    sender: Sender<Tick>,
    receiver: Receiver<Tick>,
}

impl ThreadScheduler {
    pub fn new(interval: Duration) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        Self {
            interval,
            sender,
            receiver,
        }
    }

    /// Channel the worker threads deliver ticks on.
    pub fn ticks(&self) -> &Receiver<Tick> {
        &self.receiver
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl TickScheduler for ThreadScheduler {
    fn start(&mut self, generation: u64) -> TickHandle {
        let handle = TickHandle::new(generation);
        let worker = handle.clone();
        let sender = self.sender.clone();
        let interval = self.interval;

        thread::spawn(move || {
            debug!(generation, "Tick worker started");
            while !worker.is_cancelled() {
                match sender.try_send(worker.tick()) {
                    // An unconsumed tick already asks for the same update.
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    // The receiver is gone once the scheduler is dropped.
                    Err(TrySendError::Disconnected(_)) => break,
                }
                thread::sleep(interval);
            }
            debug!(generation, "Tick worker finished");
        });

        handle
    }
}
