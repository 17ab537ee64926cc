//! Integration tests for the clip store and edit commands.
//!
//! Exercises cliplane-timeline through the session API in
//! cliplane-playback, the way a host drives it.

use cliplane_core::CliplaneError;
use cliplane_playback::Session;
use cliplane_timeline::{ClipData, ClipId, ClipPatch, SessionFile, TrackId};

// ── Helpers ────────────────────────────────────────────────────

const T1: TrackId = TrackId(1);
const T2: TrackId = TrackId(2);
const T3: TrackId = TrackId(3);

fn clip(start: f64, end: f64) -> ClipData {
    ClipData::new("media/test.mp4", "Test", start, end)
}

fn assert_placement_invariants(session: &Session) {
    let duration = session.project_duration();
    for track in session.store().tracks() {
        for c in &track.clips {
            assert!(c.start_time >= 0.0, "{} starts before zero", c.id);
            assert!(c.end_time <= duration, "{} ends past the project", c.id);
            assert!(c.start_time < c.end_time, "{} is empty", c.id);
        }
    }
}

// ── Store ──────────────────────────────────────────────────────

#[test]
fn default_session_has_three_empty_tracks() {
    let session = Session::new();
    let names: Vec<_> = session
        .store()
        .tracks()
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, ["Track 1", "Track 2", "Track 3"]);
    assert_eq!(session.project_duration(), 120.0);
    assert_eq!(session.store().clip_count(), 0);
}

#[test]
fn clip_ids_are_unique_across_tracks() {
    let mut session = Session::new();
    let a = session.add_clip(T1, clip(0.0, 5.0)).unwrap();
    let b = session.add_clip(T2, clip(0.0, 5.0)).unwrap();
    let c = session.add_clip(T1, clip(10.0, 15.0)).unwrap();
    assert!(a != b && b != c && a != c);
    assert_eq!(session.store().find_clip(b).map(|(t, _)| t), Some(T2));
}

#[test]
fn add_to_missing_track_is_not_found() {
    let mut session = Session::new();
    let err = session.add_clip(TrackId(42), clip(0.0, 5.0)).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(session.store().clip_count(), 0);
}

#[test]
fn update_merges_only_supplied_fields() {
    let mut session = Session::new();
    let id = session
        .add_clip(T1, clip(0.0, 10.0).with_volume(0.4))
        .unwrap();
    session
        .update_clip(T1, id, &ClipPatch::new().title("Renamed").fade_in(2.0))
        .unwrap();

    let c = session.store().clip(T1, id).unwrap();
    assert_eq!(c.title, "Renamed");
    assert_eq!(c.fade_in, Some(2.0));
    assert_eq!(c.volume, Some(0.4));
    assert_eq!((c.start_time, c.end_time), (0.0, 10.0));
}

#[test]
fn remove_is_idempotent() {
    let mut session = Session::new();
    let id = session.add_clip(T1, clip(0.0, 10.0)).unwrap();
    session.remove_clip(T1, id);
    session.remove_clip(T1, id);
    session.remove_clip(TrackId(99), id);
    assert_eq!(session.store().clip_count(), 0);
}

#[test]
fn track_volume_is_clamped_and_missing_track_errors() {
    let mut session = Session::new();
    session.set_track_volume(T2, 1.7).unwrap();
    assert_eq!(session.store().track(T2).unwrap().volume, 1.0);
    assert!(matches!(
        session.set_track_volume(TrackId(9), 0.5),
        Err(CliplaneError::NotFound(_))
    ));
}

// ── Move & resize ──────────────────────────────────────────────

#[test]
fn move_preserves_duration_and_clamps() {
    let mut session = Session::new();
    let id = session.add_clip(T1, clip(10.0, 25.0)).unwrap();

    session.move_clip(T1, id, 40.0).unwrap();
    let c = session.store().clip(T1, id).unwrap();
    assert_eq!((c.start_time, c.end_time), (40.0, 55.0));

    session.move_clip(T1, id, 115.0).unwrap();
    let c = session.store().clip(T1, id).unwrap();
    assert_eq!((c.start_time, c.end_time), (105.0, 120.0));

    session.move_clip(T1, id, -8.0).unwrap();
    let c = session.store().clip(T1, id).unwrap();
    assert_eq!((c.start_time, c.end_time), (0.0, 15.0));
    assert_placement_invariants(&session);
}

#[test]
fn move_to_other_track_keeps_content() {
    let mut session = Session::new();
    let id = session
        .add_clip(T1, clip(5.0, 15.0).with_source(3.0, 13.0).with_volume(0.5))
        .unwrap();

    let moved = session.move_clip_to_track(T1, id, T3, 60.0).unwrap();
    assert!(session.store().clip(T1, id).is_err());

    let c = session.store().clip(T3, moved).unwrap();
    assert_eq!((c.start_time, c.end_time), (60.0, 70.0));
    assert_eq!((c.source_start, c.source_end), (3.0, 13.0));
    assert_eq!(c.volume, Some(0.5));
}

#[test]
fn move_to_missing_track_keeps_source_clip() {
    let mut session = Session::new();
    let id = session.add_clip(T1, clip(5.0, 15.0)).unwrap();
    assert!(session.move_clip_to_track(T1, id, TrackId(7), 0.0).is_err());
    assert!(session.store().clip(T1, id).is_ok());
}

#[test]
fn resize_respects_minimum_and_project_end() {
    let mut session = Session::new();
    let id = session.add_clip(T1, clip(10.0, 20.0)).unwrap();

    session.resize_clip(T1, id, 10.2).unwrap();
    assert_eq!(session.store().clip(T1, id).unwrap().end_time, 11.0);

    session.resize_clip(T1, id, 500.0).unwrap();
    assert_eq!(session.store().clip(T1, id).unwrap().end_time, 120.0);

    session.resize_clip(T1, id, 30.0).unwrap();
    let c = session.store().clip(T1, id).unwrap();
    assert_eq!((c.start_time, c.end_time), (10.0, 30.0));
    assert_placement_invariants(&session);
}

#[test]
fn trim_source_reshapes_clip() {
    let mut session = Session::new();
    let id = session.add_clip(T1, clip(10.0, 20.0)).unwrap();
    session.trim_clip_source(T1, id, 5.0, 9.0).unwrap();

    let c = session.store().clip(T1, id).unwrap();
    assert_eq!((c.source_start, c.source_end), (5.0, 9.0));
    assert_eq!((c.start_time, c.end_time), (10.0, 14.0));
}

// ── Cut, copy, paste ───────────────────────────────────────────

#[test]
fn cut_splits_exactly_at_position() {
    let mut session = Session::new();
    let id = session
        .add_clip(T1, clip(10.0, 30.0).with_source(5.0, 25.0).with_fades(1.0, 3.0))
        .unwrap();

    let right = session.cut_clip(T1, id, 18.0).unwrap();
    let l = session.store().clip(T1, id).unwrap();
    let r = session.store().clip(T1, right).unwrap();

    assert_eq!((l.start_time, l.end_time), (10.0, 18.0));
    assert_eq!((l.source_start, l.source_end), (5.0, 13.0));
    assert_eq!((r.start_time, r.end_time), (18.0, 30.0));
    assert_eq!((r.source_start, r.source_end), (13.0, 25.0));
    assert_eq!(l.url, r.url);
    assert_eq!(r.fade_out, Some(3.0));
    assert_eq!(session.store().track(T1).unwrap().clip_count(), 2);
}

#[test]
fn cut_outside_clip_is_rejected() {
    let mut session = Session::new();
    let id = session.add_clip(T1, clip(10.0, 30.0)).unwrap();
    for position in [5.0, 10.0, 30.0, 45.0] {
        assert!(matches!(
            session.cut_clip(T1, id, position),
            Err(CliplaneError::InvalidParameter(_))
        ));
    }
    assert_eq!(session.store().clip_count(), 1);
}

#[test]
fn paste_keeps_duration_at_position() {
    let mut session = Session::new();
    let id = session.add_clip(T1, clip(3.0, 10.5)).unwrap();
    session.copy_clip(T1, id).unwrap();

    let pasted = session.paste_clip(T2, Some(20.0)).unwrap().unwrap();
    let c = session.store().clip(T2, pasted).unwrap();
    assert_eq!((c.start_time, c.end_time), (20.0, 27.5));
    assert_ne!(pasted, id);
}

#[test]
fn clipboard_survives_source_removal() {
    let mut session = Session::new();
    let id = session.add_clip(T1, clip(0.0, 4.0)).unwrap();
    session.copy_clip(T1, id).unwrap();
    session.remove_clip(T1, id);

    let pasted = session.paste_clip(T1, Some(50.0)).unwrap();
    assert!(pasted.is_some());
    assert!(session.has_clipboard());
}

#[test]
fn paste_with_empty_clipboard_is_noop() {
    let mut session = Session::new();
    assert_eq!(session.paste_clip(T1, Some(5.0)).unwrap(), None);
    assert_eq!(session.store().clip_count(), 0);
}

#[test]
fn edits_on_missing_clip_are_not_found() {
    let mut session = Session::new();
    let ghost = ClipId(77);
    assert!(session.move_clip(T1, ghost, 0.0).unwrap_err().is_not_found());
    assert!(session.resize_clip(T1, ghost, 5.0).unwrap_err().is_not_found());
    assert!(session.cut_clip(T1, ghost, 5.0).unwrap_err().is_not_found());
    assert!(session.copy_clip(T1, ghost).unwrap_err().is_not_found());
}

// ── Persistence ────────────────────────────────────────────────

#[test]
fn session_roundtrip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut session = Session::new();
    let id = session
        .add_clip(T1, clip(0.0, 12.0).with_fades(1.0, 1.0))
        .unwrap();
    session.cut_clip(T1, id, 4.0).unwrap();
    session.set_track_volume(T3, 0.3).unwrap();
    session.set_zoom(2.0);
    session.set_scroll(80.0);
    session.save(&path).unwrap();

    let mut loaded = Session::new();
    loaded.load(&path).unwrap();
    assert_eq!(loaded.store().tracks(), session.store().tracks());
    assert_eq!(loaded.view(), session.view());

    // Fresh ids keep counting above the restored ones.
    let next = loaded.add_clip(T2, clip(50.0, 60.0)).unwrap();
    assert!(session.store().find_clip(next).is_none());
}

#[test]
fn legacy_blob_loads_with_defaults() {
    let json = serde_json::json!({
        "tracks": [
            {
                "id": 1,
                "name": "Track 1",
                "clips": [{
                    "id": 1700000000001u64,
                    "url": "https://example.com/a",
                    "title": "A",
                    "startTime": 0.0,
                    "endTime": 10.0,
                    "clipStart": 2.0,
                    "clipEnd": 12.0
                }]
            }
        ],
        "duration": 60
    });
    let file = SessionFile::from_json(&serde_json::to_vec(&json).unwrap()).unwrap();

    let mut session = Session::new();
    session.restore(&file).unwrap();
    assert_eq!(session.project_duration(), 60.0);
    assert_eq!(session.view().zoom(), 1.0);

    let frame = session.activations();
    assert_eq!(frame[0].active_clip_id, Some(ClipId(1_700_000_000_001)));
    assert_eq!(frame[0].source_playback_offset, Some(2.0));
    assert_eq!(frame[0].effective_volume, 1.0);
}

#[test]
fn shrinking_project_then_resizing_keeps_invariants() {
    let mut session = Session::new();
    let id = session.add_clip(T1, clip(50.0, 60.0)).unwrap();
    session.add_clip(T2, clip(5.0, 12.0)).unwrap();

    session.set_project_duration(30.0);
    session.resize_clip(T1, id, 70.0).unwrap();
    session.move_clip(T1, id, 200.0).unwrap();
    assert_placement_invariants(&session);
}

#[test]
fn blob_with_exhausted_ids_is_rejected() {
    let json = serde_json::json!({
        "version": 1,
        "tracks": [{
            "id": 1,
            "name": "Track 1",
            "clips": [{
                "id": 18_446_744_073_709_551_615u64,
                "url": "a.mp4",
                "title": "A",
                "startTime": 0.0,
                "endTime": 5.0
            }]
        }],
        "projectDuration": 30.0
    });
    let file = SessionFile::from_json(&serde_json::to_vec(&json).unwrap()).unwrap();

    let mut session = Session::new();
    assert!(matches!(
        session.restore(&file),
        Err(CliplaneError::Serialization(_))
    ));
    assert_eq!(session.project_duration(), 120.0);
}

#[test]
fn oversized_version_is_rejected() {
    let json = serde_json::json!({
        "version": 4_294_967_296u64,
        "tracks": [],
        "projectDuration": 30.0
    });
    let result = SessionFile::from_json(&serde_json::to_vec(&json).unwrap());
    assert!(matches!(result, Err(CliplaneError::Serialization(_))));
}

#[test]
fn view_state_is_clamped() {
    let mut session = Session::new();
    session.set_zoom(50.0);
    session.set_scroll(-3.0);
    assert_eq!(session.view().zoom(), 10.0);
    assert_eq!(session.view().scroll(), 0.0);

    session.reset_view();
    assert_eq!(session.view().zoom(), 1.0);
}
