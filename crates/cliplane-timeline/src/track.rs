//! Track types for the timeline.

use std::fmt;

use cliplane_core::{clamp_unit, Seconds};
use serde::{Deserialize, Serialize};

use crate::clip::{Clip, ClipId};

/// Track identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn unity_gain() -> f64 {
    1.0
}

/// A track holding clips in insertion order.
///
/// Order carries no timing meaning; placement comes from each clip's
/// start and end times. Clips on one track may overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: TrackId,
    /// Track name
    pub name: String,
    /// Clips in insertion order
    #[serde(default)]
    pub clips: Vec<Clip>,
    /// Track gain in [0, 1]
    #[serde(default = "unity_gain")]
    pub volume: f64,
}

impl Track {
    /// Create an empty track at unity gain.
    pub fn new(id: TrackId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            clips: Vec::new(),
            volume: 1.0,
        }
    }

    /// Track gain, clamped.
    pub fn gain(&self) -> f64 {
        clamp_unit(self.volume)
    }

    /// Set the track gain, clamping into [0, 1].
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = clamp_unit(volume);
    }

    /// Append a clip.
    pub fn push_clip(&mut self, clip: Clip) {
        self.clips.push(clip);
    }

    /// Remove a clip by id. Returns the removed clip.
    pub fn remove_clip(&mut self, id: ClipId) -> Option<Clip> {
        let index = self.clips.iter().position(|clip| clip.id == id)?;
        Some(self.clips.remove(index))
    }

    /// Find a clip by id. Returns (index, &Clip).
    pub fn find_clip(&self, id: ClipId) -> Option<(usize, &Clip)> {
        self.clips.iter().enumerate().find(|(_, clip)| clip.id == id)
    }

    /// Find a clip mutably by id.
    pub fn find_clip_mut(&mut self, id: ClipId) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|clip| clip.id == id)
    }

    /// Get a clip by id.
    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.find_clip(id).map(|(_, clip)| clip)
    }

    /// Every clip live at `time`, in insertion order.
    pub fn clips_at(&self, time: Seconds) -> impl Iterator<Item = &Clip> {
        self.clips.iter().filter(move |clip| clip.contains(time))
    }

    /// Latest end time of any clip, zero for an empty track.
    pub fn end_time(&self) -> Seconds {
        self.clips
            .iter()
            .map(|clip| clip.end_time)
            .fold(0.0, f64::max)
    }

    /// Number of clips on this track.
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Highest clip id on this track.
    pub fn max_clip_id(&self) -> Option<ClipId> {
        self.clips.iter().map(|clip| clip.id).max()
    }
}
