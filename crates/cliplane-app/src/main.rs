//! Cliplane - multi-track clip sequencer
//!
//! Headless host: loads (or builds) a session, plays it against a real-time
//! tick scheduler and logs what the renderer would be told on every change.
//!
//! Usage: `cliplane [session.json] [seconds]`

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use cliplane_playback::{PlaybackFrame, Session, ThreadScheduler, TickOutcome};
use cliplane_timeline::{ClipData, ClipId, TrackId};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// How long to play when no duration is given on the command line.
const DEFAULT_RUN_SECONDS: f64 = 10.0;

fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Cliplane starting...");

    let session_path = std::env::args().nth(1).map(PathBuf::from);
    let run_for = match std::env::args().nth(2) {
        Some(arg) => arg
            .parse::<f64>()
            .with_context(|| format!("Invalid run length: {}", arg))?,
        None => DEFAULT_RUN_SECONDS,
    };

    let mut session = match &session_path {
        Some(path) if path.exists() => {
            let mut session = Session::new();
            session
                .load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            session
        }
        _ => demo_session()?,
    };

    run(&mut session, run_for)?;

    if let Some(path) = &session_path {
        session
            .save(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
    }

    info!("Cliplane finished");
    Ok(())
}

/// A short looping session so a bare `cliplane` run has something to show.
fn demo_session() -> Result<Session> {
    let mut session = Session::new();
    session.set_project_duration(30.0);

    let intro = session.add_clip(
        TrackId(1),
        ClipData::new("media/intro.mp4", "Intro", 0.0, 6.0).with_fades(1.0, 1.0),
    )?;
    session.cut_clip(TrackId(1), intro, 3.0)?;
    session.add_clip(
        TrackId(2),
        ClipData::new("media/music.mp3", "Music", 1.0, 8.0)
            .with_volume(0.6)
            .with_fades(2.0, 2.0),
    )?;
    session.add_clip(
        TrackId(3),
        ClipData::new("media/broll.mp4", "B-roll", 4.0, 7.5)
            .with_source(12.0, 15.5)
            .with_playback_speed(1.5),
    )?;

    session.set_loop_region(2.0, 8.0)?;
    session.set_looping(true);
    info!(clips = session.store().clip_count(), "Built demo session");
    Ok(session)
}

/// Play for `run_for` wall-clock seconds, feeding scheduler ticks to the session.
fn run(session: &mut Session, run_for: f64) -> Result<()> {
    let mut scheduler = ThreadScheduler::default();
    let started = Instant::now();
    let now = || started.elapsed().as_secs_f64();

    session.play(now(), &mut scheduler);
    let mut last = session.frame();
    report(&last);

    while now() < run_for {
        let tick = match scheduler.ticks().recv_timeout(scheduler.interval() * 4) {
            Ok(tick) => tick,
            Err(_) => {
                if !session.clock().is_playing() {
                    break;
                }
                warn!("Tick scheduler stalled");
                continue;
            }
        };

        match session.tick(tick, now()) {
            TickOutcome::Ignored => continue,
            TickOutcome::Looped(time) => info!(time, "Loop restarted"),
            TickOutcome::Ended(time) => info!(time, "Reached end of timeline"),
            TickOutcome::Advanced(_) => {}
        }

        let frame = session.frame();
        if active_clips(&frame) != active_clips(&last)
            || frame.loop_restart_count != last.loop_restart_count
        {
            report(&frame);
        } else {
            debug!(time = frame.current_time, "Tick");
        }
        let ended = !frame.is_playing;
        last = frame;
        if ended {
            break;
        }
    }

    session.stop();
    Ok(())
}

fn active_clips(frame: &PlaybackFrame) -> Vec<Option<ClipId>> {
    frame.tracks.iter().map(|t| t.active_clip_id).collect()
}

fn report(frame: &PlaybackFrame) {
    for track in &frame.tracks {
        match track.active_clip_id {
            Some(clip) => info!(
                time = frame.current_time,
                track = %track.track_id,
                clip = %clip,
                volume = track.effective_volume,
                offset = track.source_playback_offset.unwrap_or_default(),
                speed = track.playback_speed,
                "Active"
            ),
            None => debug!(track = %track.track_id, "Silent"),
        }
    }
}
