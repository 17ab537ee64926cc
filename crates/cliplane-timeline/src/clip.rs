//! Clip types for the timeline.

use std::fmt;

use cliplane_core::limits::{MAX_FADE, MAX_PLAYBACK_SPEED, MIN_PLAYBACK_SPEED};
use cliplane_core::time::clamp_between;
use cliplane_core::{clamp_unit, Seconds, TimeRange};
use serde::{Deserialize, Serialize};

/// Project-wide clip identifier. Ids are never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(pub u64);

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn clamp_fade(seconds: Seconds) -> Seconds {
    clamp_between(seconds, 0.0, MAX_FADE)
}

fn clamp_speed(speed: f64) -> f64 {
    clamp_between(speed, MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED)
}

/// Everything a clip carries except its id.
///
/// Used to add new clips and as the clipboard payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipData {
    /// Source media reference (opaque to the timeline)
    pub url: String,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Timeline start, inclusive
    pub start_time: Seconds,
    /// Timeline end, exclusive
    pub end_time: Seconds,
    /// Trim in point within the source
    #[serde(default)]
    pub source_start: Seconds,
    /// Trim out point within the source
    #[serde(default)]
    pub source_end: Seconds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<Seconds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<Seconds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_speed: Option<f64>,
}

impl ClipData {
    /// Create clip data spanning `[start_time, end_time)` that plays its
    /// source from the beginning.
    pub fn new(url: impl Into<String>, title: impl Into<String>, start_time: Seconds, end_time: Seconds) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            start_time,
            end_time,
            source_start: 0.0,
            source_end: (end_time - start_time).max(0.0),
            volume: None,
            fade_in: None,
            fade_out: None,
            playback_speed: None,
        }
    }

    /// Set the trimmed source window.
    pub fn with_source(mut self, source_start: Seconds, source_end: Seconds) -> Self {
        self.source_start = source_start;
        self.source_end = source_end;
        self
    }

    /// Set the clip gain.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Set fade-in and fade-out lengths.
    pub fn with_fades(mut self, fade_in: Seconds, fade_out: Seconds) -> Self {
        self.fade_in = Some(fade_in);
        self.fade_out = Some(fade_out);
        self
    }

    /// Set the playback speed.
    pub fn with_playback_speed(mut self, speed: f64) -> Self {
        self.playback_speed = Some(speed);
        self
    }

    /// Length on the timeline.
    pub fn duration(&self) -> Seconds {
        self.end_time - self.start_time
    }

    /// Clamp every independently bounded field into range.
    ///
    /// Timeline placement is left alone: the store accepts whatever the
    /// caller supplies and edit commands own the placement invariants.
    pub fn normalized(mut self) -> Self {
        self.volume = self.volume.map(clamp_unit);
        self.fade_in = self.fade_in.map(clamp_fade);
        self.fade_out = self.fade_out.map(clamp_fade);
        self.playback_speed = self.playback_speed.map(clamp_speed);
        self.source_start = self.source_start.max(0.0);
        self.source_end = self.source_end.max(self.source_start);
        self
    }
}

/// A clip on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub start_time: Seconds,
    pub end_time: Seconds,
    #[serde(default)]
    pub source_start: Seconds,
    #[serde(default)]
    pub source_end: Seconds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<Seconds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<Seconds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_speed: Option<f64>,
}

impl Clip {
    /// Build a clip from its payload and a freshly allocated id.
    pub fn from_data(id: ClipId, data: ClipData) -> Self {
        let data = data.normalized();
        Self {
            id,
            url: data.url,
            title: data.title,
            start_time: data.start_time,
            end_time: data.end_time,
            source_start: data.source_start,
            source_end: data.source_end,
            volume: data.volume,
            fade_in: data.fade_in,
            fade_out: data.fade_out,
            playback_speed: data.playback_speed,
        }
    }

    /// Snapshot of everything but the id.
    pub fn data(&self) -> ClipData {
        ClipData {
            url: self.url.clone(),
            title: self.title.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            source_start: self.source_start,
            source_end: self.source_end,
            volume: self.volume,
            fade_in: self.fade_in,
            fade_out: self.fade_out,
            playback_speed: self.playback_speed,
        }
    }

    /// Length on the timeline.
    pub fn duration(&self) -> Seconds {
        self.range().duration()
    }

    /// Timeline range covered by the clip.
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }

    /// Whether the clip is live at `time`.
    pub fn contains(&self, time: Seconds) -> bool {
        self.range().contains(time)
    }

    /// Clip gain, defaulting to unity.
    pub fn gain(&self) -> f64 {
        clamp_unit(self.volume.unwrap_or(1.0))
    }

    /// Fade-in length, zero when unset.
    pub fn fade_in_secs(&self) -> Seconds {
        self.fade_in.map(clamp_fade).unwrap_or(0.0)
    }

    /// Fade-out length, zero when unset.
    pub fn fade_out_secs(&self) -> Seconds {
        self.fade_out.map(clamp_fade).unwrap_or(0.0)
    }

    /// Playback speed, defaulting to 1.0.
    pub fn speed(&self) -> f64 {
        self.playback_speed.map(clamp_speed).unwrap_or(1.0)
    }
}

/// A partial clip update. Absent fields leave the clip untouched.
///
/// Each field is clamped on its own (gain, fades, speed, source bounds);
/// relationships between fields are not checked here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipPatch {
    pub url: Option<String>,
    pub title: Option<String>,
    pub start_time: Option<Seconds>,
    pub end_time: Option<Seconds>,
    pub source_start: Option<Seconds>,
    pub source_end: Option<Seconds>,
    pub volume: Option<f64>,
    pub fade_in: Option<Seconds>,
    pub fade_out: Option<Seconds>,
    pub playback_speed: Option<f64>,
}

impl ClipPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn start_time(mut self, seconds: Seconds) -> Self {
        self.start_time = Some(seconds);
        self
    }

    pub fn end_time(mut self, seconds: Seconds) -> Self {
        self.end_time = Some(seconds);
        self
    }

    /// Set both timeline bounds at once.
    pub fn placement(self, start_time: Seconds, end_time: Seconds) -> Self {
        self.start_time(start_time).end_time(end_time)
    }

    pub fn source_start(mut self, seconds: Seconds) -> Self {
        self.source_start = Some(seconds);
        self
    }

    pub fn source_end(mut self, seconds: Seconds) -> Self {
        self.source_end = Some(seconds);
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn fade_in(mut self, seconds: Seconds) -> Self {
        self.fade_in = Some(seconds);
        self
    }

    pub fn fade_out(mut self, seconds: Seconds) -> Self {
        self.fade_out = Some(seconds);
        self
    }

    pub fn playback_speed(mut self, speed: f64) -> Self {
        self.playback_speed = Some(speed);
        self
    }

    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the supplied fields into `clip`. Last write wins.
    pub fn apply_to(&self, clip: &mut Clip) {
        if let Some(url) = &self.url {
            clip.url.clone_from(url);
        }
        if let Some(title) = &self.title {
            clip.title.clone_from(title);
        }
        if let Some(start) = self.start_time {
            clip.start_time = start;
        }
        if let Some(end) = self.end_time {
            clip.end_time = end;
        }
        if let Some(start) = self.source_start {
            clip.source_start = start.max(0.0);
        }
        if let Some(end) = self.source_end {
            clip.source_end = end.max(0.0);
        }
        if let Some(volume) = self.volume {
            clip.volume = Some(clamp_unit(volume));
        }
        if let Some(fade) = self.fade_in {
            clip.fade_in = Some(clamp_fade(fade));
        }
        if let Some(fade) = self.fade_out {
            clip.fade_out = Some(clamp_fade(fade));
        }
        if let Some(speed) = self.playback_speed {
            clip.playback_speed = Some(clamp_speed(speed));
        }
    }
}
