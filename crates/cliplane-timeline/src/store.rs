//! The clip store: sole owner of every track and clip.
//!
//! All mutation of the clip set goes through here. The store enforces id
//! uniqueness and per-field clamping, but accepts overlapping
//! clips and unchecked placement in `update_clip`; the edit commands in
//! [`crate::edit`] are where placement invariants are kept.

use cliplane_core::limits::{DEFAULT_PROJECT_DURATION, DEFAULT_TRACK_COUNT, MIN_CLIP_DURATION};
use cliplane_core::{CliplaneError, Result, Seconds};
use tracing::debug;

use crate::clip::{Clip, ClipData, ClipId, ClipPatch};
use crate::track::{Track, TrackId};

/// Ordered collection of tracks plus the project length they live in.
#[derive(Debug, Clone)]
pub struct ClipStore {
    tracks: Vec<Track>,
    project_duration: Seconds,
    next_clip_id: u64,
    next_track_id: u64,
}

impl ClipStore {
    /// Create a store with no tracks.
    pub fn new(project_duration: Seconds) -> Self {
        Self {
            tracks: Vec::new(),
            project_duration: project_duration.max(MIN_CLIP_DURATION),
            next_clip_id: 1,
            next_track_id: 1,
        }
    }

    /// Create a store with the default three empty tracks.
    pub fn with_default_tracks(project_duration: Seconds) -> Self {
        let mut store = Self::new(project_duration);
        for n in 1..=DEFAULT_TRACK_COUNT {
            store.add_track(format!("Track {n}"));
        }
        store
    }

    /// Replace the whole clip set, e.g. after loading a session.
    ///
    /// The id allocators resume above the highest restored ids so new clips
    /// never collide with loaded ones. A set whose highest id leaves no room
    /// for another is rejected. The project is never shorter than its
    /// furthest clip end.
    pub fn restore(tracks: Vec<Track>, project_duration: Seconds) -> Result<Self> {
        let max_clip = tracks
            .iter()
            .filter_map(Track::max_clip_id)
            .map(|id| id.0)
            .max()
            .unwrap_or(0);
        let max_track = tracks.iter().map(|t| t.id.0).max().unwrap_or(0);
        let next_clip_id = max_clip.checked_add(1).ok_or_else(|| {
            CliplaneError::Serialization(format!("clip id {max_clip} leaves no room for new clips"))
        })?;
        let next_track_id = max_track.checked_add(1).ok_or_else(|| {
            CliplaneError::Serialization(format!("track id {max_track} leaves no room for new tracks"))
        })?;

        let mut store = Self {
            tracks,
            project_duration: MIN_CLIP_DURATION,
            next_clip_id,
            next_track_id,
        };
        store.set_project_duration(project_duration);
        Ok(store)
    }

    /// Total timeline length.
    pub fn project_duration(&self) -> Seconds {
        self.project_duration
    }

    /// Change the timeline length. Never shorter than one minimum clip, nor
    /// than the furthest clip end.
    pub fn set_project_duration(&mut self, duration: Seconds) {
        let floor = self.content_end().max(MIN_CLIP_DURATION);
        if duration < floor {
            debug!(requested = duration, floor, "Project duration raised to fit clips");
        }
        self.project_duration = if duration.is_nan() { floor } else { duration.max(floor) };
    }

    /// Latest end time of any clip on any track.
    pub fn content_end(&self) -> Seconds {
        self.tracks.iter().map(Track::end_time).fold(0.0, f64::max)
    }

    /// All tracks in display order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Append a new empty track.
    pub fn add_track(&mut self, name: impl Into<String>) -> TrackId {
        let id = TrackId(self.next_track_id);
        self.next_track_id += 1;
        self.tracks.push(Track::new(id, name));
        debug!(track = %id, "Track added");
        id
    }

    /// Look up a track.
    pub fn track(&self, track_id: TrackId) -> Result<&Track> {
        self.tracks
            .iter()
            .find(|t| t.id == track_id)
            .ok_or_else(|| CliplaneError::track_not_found(track_id))
    }

    fn track_mut(&mut self, track_id: TrackId) -> Result<&mut Track> {
        self.tracks
            .iter_mut()
            .find(|t| t.id == track_id)
            .ok_or_else(|| CliplaneError::track_not_found(track_id))
    }

    /// Look up a clip on a specific track.
    pub fn clip(&self, track_id: TrackId, clip_id: ClipId) -> Result<&Clip> {
        self.track(track_id)?
            .clip(clip_id)
            .ok_or_else(|| CliplaneError::clip_not_found(track_id, clip_id))
    }

    /// Find a clip on any track.
    pub fn find_clip(&self, clip_id: ClipId) -> Option<(TrackId, &Clip)> {
        self.tracks
            .iter()
            .find_map(|t| t.clip(clip_id).map(|clip| (t.id, clip)))
    }

    /// Total number of clips across all tracks.
    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(Track::clip_count).sum()
    }

    /// Add a clip to a track under a fresh id.
    pub fn add_clip(&mut self, track_id: TrackId, data: ClipData) -> Result<ClipId> {
        let id = ClipId(self.next_clip_id);
        let track = self.track_mut(track_id)?;
        track.push_clip(Clip::from_data(id, data));
        self.next_clip_id += 1;
        debug!(track = %track_id, clip = %id, "Clip added");
        Ok(id)
    }

    /// Merge a partial update into an existing clip.
    pub fn update_clip(&mut self, track_id: TrackId, clip_id: ClipId, patch: &ClipPatch) -> Result<()> {
        let clip = self
            .track_mut(track_id)?
            .find_clip_mut(clip_id)
            .ok_or_else(|| CliplaneError::clip_not_found(track_id, clip_id))?;
        if patch.is_empty() {
            return Ok(());
        }
        patch.apply_to(clip);
        debug!(track = %track_id, clip = %clip_id, "Clip updated");
        Ok(())
    }

    /// Remove a clip. Missing tracks or clips are a no-op.
    pub fn remove_clip(&mut self, track_id: TrackId, clip_id: ClipId) -> Option<Clip> {
        let removed = self
            .tracks
            .iter_mut()
            .find(|t| t.id == track_id)
            .and_then(|t| t.remove_clip(clip_id));
        if removed.is_some() {
            debug!(track = %track_id, clip = %clip_id, "Clip removed");
        }
        removed
    }

    /// Set a track's gain, clamped into [0, 1].
    pub fn set_track_volume(&mut self, track_id: TrackId, volume: f64) -> Result<()> {
        self.track_mut(track_id)?.set_volume(volume);
        Ok(())
    }
}

impl Default for ClipStore {
    fn default() -> Self {
        Self::with_default_tracks(DEFAULT_PROJECT_DURATION)
    }
}
