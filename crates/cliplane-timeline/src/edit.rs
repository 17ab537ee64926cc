//! Edit operations on the clip store.
//!
//! Every user-facing edit is an `EditCommand` that knows how to apply itself
//! to a store. Commands keep the placement invariants the store itself does
//! not check: clips stay inside `[0, project_duration]` and never shrink
//! below the minimum duration. Commands that create a clip record its id
//! once applied.

use cliplane_core::limits::MIN_CLIP_DURATION;
use cliplane_core::time::clamp_between;
use cliplane_core::{CliplaneError, Result, Seconds, TimeRange};
use tracing::debug;

use crate::clip::{ClipData, ClipId, ClipPatch};
use crate::store::ClipStore;
use crate::track::TrackId;

// ── Clipboard ───────────────────────────────────────────────────

/// Holds at most one copied clip payload.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    payload: Option<ClipData>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents.
    pub fn set(&mut self, data: ClipData) {
        self.payload = Some(data);
    }

    /// The copied payload, if any.
    pub fn payload(&self) -> Option<&ClipData> {
        self.payload.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }
}

// ── Edit commands ───────────────────────────────────────────────

/// An edit operation on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Move a clip along its track, keeping its duration.
    MoveClip {
        track_id: TrackId,
        clip_id: ClipId,
        new_start: Seconds,
    },
    /// Move a clip to another track (or along the same one).
    MoveClipToTrack {
        src_track_id: TrackId,
        clip_id: ClipId,
        dst_track_id: TrackId,
        new_start: Seconds,
        /// Id of the clip on the destination track. Populated after execution.
        moved: Option<ClipId>,
    },
    /// Drag the right edge of a clip. The left edge is never resized.
    ResizeClip {
        track_id: TrackId,
        clip_id: ClipId,
        new_end: Seconds,
    },
    /// Change the source window and fit the timeline length to it.
    TrimSource {
        track_id: TrackId,
        clip_id: ClipId,
        source_start: Seconds,
        source_end: Seconds,
    },
    /// Split a clip at an absolute timeline position.
    CutClip {
        track_id: TrackId,
        clip_id: ClipId,
        position: Seconds,
        /// Id of the right-hand piece. Populated after execution.
        created: Option<ClipId>,
    },
    /// Copy a clip's payload to the clipboard.
    CopyClip { track_id: TrackId, clip_id: ClipId },
    /// Paste the clipboard onto a track at `position`, or at the playhead.
    PasteClip {
        track_id: TrackId,
        position: Option<Seconds>,
        /// Id of the pasted clip. Stays `None` when the clipboard was empty.
        created: Option<ClipId>,
    },
}

impl EditCommand {
    pub fn move_clip(track_id: TrackId, clip_id: ClipId, new_start: Seconds) -> Self {
        Self::MoveClip {
            track_id,
            clip_id,
            new_start,
        }
    }

    pub fn move_to_track(
        src_track_id: TrackId,
        clip_id: ClipId,
        dst_track_id: TrackId,
        new_start: Seconds,
    ) -> Self {
        Self::MoveClipToTrack {
            src_track_id,
            clip_id,
            dst_track_id,
            new_start,
            moved: None,
        }
    }

    pub fn resize(track_id: TrackId, clip_id: ClipId, new_end: Seconds) -> Self {
        Self::ResizeClip {
            track_id,
            clip_id,
            new_end,
        }
    }

    pub fn trim_source(track_id: TrackId, clip_id: ClipId, source_start: Seconds, source_end: Seconds) -> Self {
        Self::TrimSource {
            track_id,
            clip_id,
            source_start,
            source_end,
        }
    }

    pub fn cut(track_id: TrackId, clip_id: ClipId, position: Seconds) -> Self {
        Self::CutClip {
            track_id,
            clip_id,
            position,
            created: None,
        }
    }

    pub fn copy(track_id: TrackId, clip_id: ClipId) -> Self {
        Self::CopyClip { track_id, clip_id }
    }

    pub fn paste(track_id: TrackId, position: Option<Seconds>) -> Self {
        Self::PasteClip {
            track_id,
            position,
            created: None,
        }
    }

    /// The clip this command brought into existence, once applied.
    pub fn created_clip(&self) -> Option<ClipId> {
        match self {
            Self::MoveClipToTrack { moved, .. } => *moved,
            Self::CutClip { created, .. } | Self::PasteClip { created, .. } => *created,
            _ => None,
        }
    }

    /// Apply this command.
    ///
    /// Mutable `&mut self` because creating variants record the new clip id.
    /// `playhead` is the transport position, used by paste when no explicit
    /// position was given.
    pub fn apply(&mut self, store: &mut ClipStore, clipboard: &mut Clipboard, playhead: Seconds) -> Result<()> {
        match self {
            Self::MoveClip {
                track_id,
                clip_id,
                new_start,
            } => {
                let clip = store.clip(*track_id, *clip_id)?;
                let (start, end) = place(clip.duration(), *new_start, store.project_duration());
                store.update_clip(*track_id, *clip_id, &ClipPatch::new().placement(start, end))
            }
            Self::MoveClipToTrack {
                src_track_id,
                clip_id,
                dst_track_id,
                new_start,
                moved,
            } => {
                if src_track_id == dst_track_id {
                    Self::move_clip(*src_track_id, *clip_id, *new_start).apply(store, clipboard, playhead)?;
                    *moved = Some(*clip_id);
                    return Ok(());
                }
                // Check the destination before touching the source so a bad
                // target never loses the clip.
                store.track(*dst_track_id)?;
                let mut data = store.clip(*src_track_id, *clip_id)?.data();
                let (start, end) = place(data.duration(), *new_start, store.project_duration());
                data.start_time = start;
                data.end_time = end;

                store.remove_clip(*src_track_id, *clip_id);
                let id = store.add_clip(*dst_track_id, data)?;
                debug!(from = %src_track_id, to = %dst_track_id, old = %clip_id, new = %id, "Clip moved across tracks");
                *moved = Some(id);
                Ok(())
            }
            Self::ResizeClip {
                track_id,
                clip_id,
                new_end,
            } => {
                let clip = store.clip(*track_id, *clip_id)?;
                let end = clamp_between(
                    *new_end,
                    clip.start_time + MIN_CLIP_DURATION,
                    store.project_duration(),
                );
                ensure_placement(*clip_id, clip.start_time, end)?;
                store.update_clip(*track_id, *clip_id, &ClipPatch::new().end_time(end))
            }
            Self::TrimSource {
                track_id,
                clip_id,
                source_start,
                source_end,
            } => {
                let clip = store.clip(*track_id, *clip_id)?;
                let src_start = source_start.max(0.0);
                let src_end = source_end.max(src_start);
                let end = clamp_between(
                    clip.start_time + (src_end - src_start),
                    clip.start_time + MIN_CLIP_DURATION,
                    store.project_duration(),
                );
                ensure_placement(*clip_id, clip.start_time, end)?;
                let patch = ClipPatch::new()
                    .source_start(src_start)
                    .source_end(src_end)
                    .end_time(end);
                store.update_clip(*track_id, *clip_id, &patch)
            }
            Self::CutClip {
                track_id,
                clip_id,
                position,
                created,
            } => {
                let clip = store.clip(*track_id, *clip_id)?;
                let cut = *position;
                if !(cut > clip.start_time && cut < clip.end_time) {
                    return Err(CliplaneError::InvalidParameter(format!(
                        "cut position {cut} outside clip {clip_id} ({}..{})",
                        clip.start_time, clip.end_time
                    )));
                }
                let boundary = clip.source_start + (cut - clip.start_time);

                let mut right = clip.data();
                right.start_time = cut;
                right.source_start = boundary;

                store.update_clip(
                    *track_id,
                    *clip_id,
                    &ClipPatch::new().end_time(cut).source_end(boundary),
                )?;
                let id = store.add_clip(*track_id, right)?;
                debug!(track = %track_id, left = %clip_id, right = %id, at = cut, "Clip cut");
                *created = Some(id);
                Ok(())
            }
            Self::CopyClip { track_id, clip_id } => {
                let data = store.clip(*track_id, *clip_id)?.data();
                clipboard.set(data);
                Ok(())
            }
            Self::PasteClip {
                track_id,
                position,
                created,
            } => {
                let Some(payload) = clipboard.payload() else {
                    debug!(track = %track_id, "Paste with empty clipboard ignored");
                    return Ok(());
                };
                let mut data = payload.clone();
                let (start, end) = place(
                    data.duration(),
                    position.unwrap_or(playhead),
                    store.project_duration(),
                );
                data.start_time = start;
                data.end_time = end;
                *created = Some(store.add_clip(*track_id, data)?);
                Ok(())
            }
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Refuse a placement that would leave the clip empty or inverted.
fn ensure_placement(clip_id: ClipId, start: Seconds, end: Seconds) -> Result<()> {
    if TimeRange::new(start, end).is_empty() {
        return Err(CliplaneError::InvalidParameter(format!(
            "clip {clip_id} would span {start}..{end}"
        )));
    }
    Ok(())
}

/// Place a clip of `duration` as close to `start` as the project allows,
/// keeping its length. A clip longer than the project is pinned to zero and
/// cut off at the project end.
fn place(duration: Seconds, start: Seconds, project_duration: Seconds) -> (Seconds, Seconds) {
    let latest_start = (project_duration - duration).max(0.0);
    let start = clamp_between(start, 0.0, latest_start);
    (start, (start + duration).min(project_duration))
}

// ── Tests ───────────────────────────────────────────────────────
