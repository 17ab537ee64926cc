//! Playback activation: which clip is live on each track, and how loud.
//!
//! Everything here is a pure function of the playhead and the current clip
//! set. Nothing is cached, so an edit made between two ticks shows up in
//! the very next activation.

use cliplane_core::{clamp_unit, Seconds};
use cliplane_timeline::{Clip, ClipId, ClipStore, Track, TrackId};
use serde::Serialize;
use smallvec::SmallVec;

/// Per-track decision handed to the media renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackActivation {
    pub track_id: TrackId,
    /// The live clip, if any.
    pub active_clip_id: Option<ClipId>,
    /// Clip gain × track gain × fade, in [0, 1]. Zero when nothing is live.
    pub effective_volume: f64,
    /// Where the renderer should be in the source media.
    pub source_playback_offset: Option<Seconds>,
    /// Rate the renderer should play the source at.
    pub playback_speed: f64,
}

impl TrackActivation {
    /// Nothing playing on this track.
    pub fn silent(track_id: TrackId) -> Self {
        Self {
            track_id,
            active_clip_id: None,
            effective_volume: 0.0,
            source_playback_offset: None,
            playback_speed: 1.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_clip_id.is_some()
    }
}

/// One activation per track, in track order.
pub type ActivationFrame = SmallVec<[TrackActivation; 4]>;

/// Linear fade envelope at `time_in_clip` seconds into the clip.
///
/// When the fade-in and fade-out windows overlap (a clip shorter than its
/// two fades), the fade-out wins.
pub fn fade_multiplier(clip: &Clip, time_in_clip: Seconds) -> f64 {
    let duration = clip.duration();
    let fade_in = clip.fade_in_secs();
    let fade_out = clip.fade_out_secs();

    let multiplier = if fade_out > 0.0 && time_in_clip >= duration - fade_out {
        (1.0 - (time_in_clip - (duration - fade_out)) / fade_out).max(0.0)
    } else if fade_in > 0.0 && time_in_clip < fade_in {
        (time_in_clip / fade_in).min(1.0)
    } else {
        1.0
    };
    clamp_unit(multiplier)
}

/// The clip live on `track` at `time`. Overlaps resolve to the lowest id.
pub fn clip_at(track: &Track, time: Seconds) -> Option<&Clip> {
    track.clips_at(time).min_by_key(|clip| clip.id)
}

/// Activation for a single track.
pub fn activate_track(track: &Track, time: Seconds) -> TrackActivation {
    let Some(clip) = clip_at(track, time) else {
        return TrackActivation::silent(track.id);
    };
    let time_in_clip = time - clip.start_time;
    let volume = clip.gain() * track.gain() * fade_multiplier(clip, time_in_clip);

    TrackActivation {
        track_id: track.id,
        active_clip_id: Some(clip.id),
        effective_volume: clamp_unit(volume),
        source_playback_offset: Some(clip.source_start + time_in_clip),
        playback_speed: clip.speed(),
    }
}

/// Activations for every track in the store.
pub fn activate(store: &ClipStore, time: Seconds) -> ActivationFrame {
    store
        .tracks()
        .iter()
        .map(|track| activate_track(track, time))
        .collect()
}
