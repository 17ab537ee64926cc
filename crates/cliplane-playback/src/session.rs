//! The session: one explicit state object owning the clip store, clipboard,
//! view and transport clock.
//!
//! All mutation goes through `&mut Session`, which serializes edits and
//! ticks onto the caller's thread without any locking.

use std::path::Path;

use cliplane_core::limits::DEFAULT_PROJECT_DURATION;
use cliplane_core::{Result, Seconds};
use cliplane_timeline::{
    ClipData, ClipId, ClipPatch, ClipStore, Clipboard, EditCommand, SessionFile, TrackId, ViewState,
};
use tracing::debug;

use crate::activation::{activate, ActivationFrame};
use crate::clock::{LoopRegion, PlaybackState, TickOutcome, TimelineClock};
use crate::scheduler::{Tick, TickScheduler};

/// Everything the renderer needs after a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackFrame {
    pub current_time: Seconds,
    pub is_playing: bool,
    /// Changes exactly when the loop wrapped; renderers resync on change.
    pub loop_restart_count: u64,
    pub tracks: ActivationFrame,
}

/// Clip store, clipboard, view and clock for one editing session.
#[derive(Debug)]
pub struct Session {
    store: ClipStore,
    clipboard: Clipboard,
    view: ViewState,
    clock: TimelineClock,
}

impl Session {
    /// A fresh session with the default tracks.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session around an existing store.
    pub fn with_store(store: ClipStore) -> Self {
        let clock = TimelineClock::new(store.project_duration());
        Self {
            store,
            clipboard: Clipboard::new(),
            view: ViewState::default(),
            clock,
        }
    }

    pub fn store(&self) -> &ClipStore {
        &self.store
    }

    pub fn clock(&self) -> &TimelineClock {
        &self.clock
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Whether a paste would do anything.
    pub fn has_clipboard(&self) -> bool {
        !self.clipboard.is_empty()
    }

    pub fn project_duration(&self) -> Seconds {
        self.store.project_duration()
    }

    pub fn set_project_duration(&mut self, duration: Seconds) {
        self.store.set_project_duration(duration);
        self.clock.set_project_duration(self.store.project_duration());
    }

    // ── Clip store ──────────────────────────────────────────────

    pub fn add_track(&mut self, name: impl Into<String>) -> TrackId {
        self.store.add_track(name)
    }

    pub fn add_clip(&mut self, track_id: TrackId, data: ClipData) -> Result<ClipId> {
        self.store.add_clip(track_id, data)
    }

    pub fn update_clip(&mut self, track_id: TrackId, clip_id: ClipId, patch: &ClipPatch) -> Result<()> {
        self.store.update_clip(track_id, clip_id, patch)
    }

    /// Remove a clip; a missing clip is a no-op.
    pub fn remove_clip(&mut self, track_id: TrackId, clip_id: ClipId) {
        self.store.remove_clip(track_id, clip_id);
    }

    pub fn set_track_volume(&mut self, track_id: TrackId, volume: f64) -> Result<()> {
        self.store.set_track_volume(track_id, volume)
    }

    // ── Edits ───────────────────────────────────────────────────

    /// Apply an edit command and hand it back with any created ids filled in.
    pub fn edit(&mut self, mut command: EditCommand) -> Result<EditCommand> {
        command.apply(&mut self.store, &mut self.clipboard, self.clock.current_time())?;
        Ok(command)
    }

    pub fn move_clip(&mut self, track_id: TrackId, clip_id: ClipId, new_start: Seconds) -> Result<()> {
        self.edit(EditCommand::move_clip(track_id, clip_id, new_start))
            .map(|_| ())
    }

    /// Move a clip between tracks. Returns its id on the destination track.
    pub fn move_clip_to_track(
        &mut self,
        src_track_id: TrackId,
        clip_id: ClipId,
        dst_track_id: TrackId,
        new_start: Seconds,
    ) -> Result<ClipId> {
        let command = self.edit(EditCommand::move_to_track(src_track_id, clip_id, dst_track_id, new_start))?;
        Ok(command.created_clip().unwrap_or(clip_id))
    }

    pub fn resize_clip(&mut self, track_id: TrackId, clip_id: ClipId, new_end: Seconds) -> Result<()> {
        self.edit(EditCommand::resize(track_id, clip_id, new_end)).map(|_| ())
    }

    pub fn trim_clip_source(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        source_start: Seconds,
        source_end: Seconds,
    ) -> Result<()> {
        self.edit(EditCommand::trim_source(track_id, clip_id, source_start, source_end))
            .map(|_| ())
    }

    /// Split a clip. Returns the id of the right-hand piece.
    pub fn cut_clip(&mut self, track_id: TrackId, clip_id: ClipId, position: Seconds) -> Result<ClipId> {
        let command = self.edit(EditCommand::cut(track_id, clip_id, position))?;
        Ok(command.created_clip().unwrap_or(clip_id))
    }

    pub fn copy_clip(&mut self, track_id: TrackId, clip_id: ClipId) -> Result<()> {
        self.edit(EditCommand::copy(track_id, clip_id)).map(|_| ())
    }

    /// Paste at `position`, or at the playhead. `None` when the clipboard
    /// was empty.
    pub fn paste_clip(&mut self, track_id: TrackId, position: Option<Seconds>) -> Result<Option<ClipId>> {
        self.edit(EditCommand::paste(track_id, position))
            .map(|command| command.created_clip())
    }

    // ── Transport ───────────────────────────────────────────────

    pub fn play(&mut self, now: Seconds, scheduler: &mut dyn TickScheduler) {
        self.clock.play(now, scheduler);
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    pub fn seek(&mut self, time: Seconds, now: Seconds) {
        self.clock.seek(time, now);
    }

    pub fn state(&self) -> PlaybackState {
        self.clock.state()
    }

    pub fn current_time(&self) -> Seconds {
        self.clock.current_time()
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.clock.set_looping(looping);
    }

    pub fn toggle_loop(&mut self) -> bool {
        self.clock.toggle_loop()
    }

    pub fn set_loop_region(&mut self, start: Seconds, end: Seconds) -> Result<()> {
        self.clock.set_loop_region(start, end)
    }

    pub fn loop_region(&self) -> LoopRegion {
        self.clock.loop_region()
    }

    /// Feed a scheduler tick to the clock.
    pub fn tick(&mut self, tick: Tick, now: Seconds) -> TickOutcome {
        self.clock.tick(tick, now)
    }

    /// Activations for the current playhead against the current clip set.
    pub fn activations(&self) -> ActivationFrame {
        activate(&self.store, self.clock.current_time())
    }

    /// Snapshot for the renderer.
    pub fn frame(&self) -> PlaybackFrame {
        PlaybackFrame {
            current_time: self.clock.current_time(),
            is_playing: self.clock.is_playing(),
            loop_restart_count: self.clock.loop_restart_count(),
            tracks: self.activations(),
        }
    }

    // ── View ────────────────────────────────────────────────────

    pub fn set_zoom(&mut self, zoom: f64) {
        self.view.set_zoom(zoom);
    }

    pub fn set_scroll(&mut self, scroll: f64) {
        self.view.set_scroll(scroll);
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    // ── Persistence ─────────────────────────────────────────────

    /// Serialize tracks, clips, project length and view.
    pub fn to_file(&self) -> SessionFile {
        SessionFile::new(&self.store, &self.view)
    }

    /// Replace tracks, clips, project length and view from a blob.
    ///
    /// Transport state is kept; the playhead and loop region are pulled
    /// inside the restored project length. A blob that cannot be restored
    /// leaves the session untouched.
    pub fn restore(&mut self, file: &SessionFile) -> Result<()> {
        self.store = file.to_store()?;
        self.view = file.view();
        self.clock.set_project_duration(self.store.project_duration());
        debug!(tracks = self.store.tracks().len(), clips = self.store.clip_count(), "Session restored");
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_file().save_to_file(path)
    }

    pub fn load(&mut self, path: &Path) -> Result<()> {
        let file = SessionFile::load_from_file(path)?;
        self.restore(&file)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::with_store(ClipStore::with_default_tracks(DEFAULT_PROJECT_DURATION))
    }
}
