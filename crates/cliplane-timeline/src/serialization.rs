//! Session serialization with versioning and migration.
//!
//! Uses JSON with a schema version field for forward-compatible persistence.
//! Blobs written before versioning (camel-cased keys `duration`,
//! `timelineZoom`, `timelineScroll`, and per-clip `clipStart`/`clipEnd`) are
//! migrated on load.

use cliplane_core::{CliplaneError, Result, Seconds};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::store::ClipStore;
use crate::track::Track;
use crate::view::ViewState;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned session blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
    /// Schema version for migration.
    pub version: u32,
    /// Every track with its clips.
    pub tracks: Vec<Track>,
    /// Timeline length in seconds.
    pub project_duration: Seconds,
    /// View zoom; absent means 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_zoom: Option<f64>,
    /// View scroll; absent means 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_scroll: Option<f64>,
}

impl SessionFile {
    /// Snapshot a store and view into a blob.
    pub fn new(store: &ClipStore, view: &ViewState) -> Self {
        Self {
            version: CURRENT_VERSION,
            tracks: store.tracks().to_vec(),
            project_duration: store.project_duration(),
            view_zoom: Some(view.zoom()),
            view_scroll: Some(view.scroll()),
        }
    }

    /// Rebuild the clip store this blob describes.
    pub fn to_store(&self) -> Result<ClipStore> {
        ClipStore::restore(self.tracks.clone(), self.project_duration)
    }

    /// The view state, defaulting missing values.
    pub fn view(&self) -> ViewState {
        ViewState::new(self.view_zoom.unwrap_or(1.0), self.view_scroll.unwrap_or(0.0))
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| CliplaneError::Serialization(format!("Failed to serialize session: {}", e)))
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: Value = serde_json::from_slice(data)
            .map_err(|e| CliplaneError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = match raw.get("version") {
            None => 0,
            Some(v) => v
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| CliplaneError::Serialization(format!("Invalid session version: {}", v)))?,
        };

        if version > CURRENT_VERSION {
            return Err(CliplaneError::Serialization(format!(
                "Session version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| CliplaneError::Serialization(format!("Failed to parse session: {}", e)))
    }

    /// Save the session to a file path.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        info!(path = %path.display(), tracks = self.tracks.len(), "Session saved");
        Ok(())
    }

    /// Load a session from a file path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let file = Self::from_json(&data)?;
        info!(path = %path.display(), tracks = file.tracks.len(), "Session loaded");
        Ok(file)
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: Value, from_version: u32) -> Result<Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: rename top-level keys and per-clip trim keys
                let Some(root) = data.as_object_mut() else {
                    return Err(CliplaneError::Serialization(
                        "Session root must be an object".into(),
                    ));
                };
                rename_key(root, "duration", "projectDuration");
                rename_key(root, "timelineZoom", "viewZoom");
                rename_key(root, "timelineScroll", "viewScroll");

                if let Some(tracks) = root.get_mut("tracks").and_then(Value::as_array_mut) {
                    let clips = tracks
                        .iter_mut()
                        .filter_map(|t| t.get_mut("clips"))
                        .filter_map(Value::as_array_mut)
                        .flatten()
                        .filter_map(Value::as_object_mut);
                    for clip in clips {
                        rename_key(clip, "clipStart", "sourceStart");
                        rename_key(clip, "clipEnd", "sourceEnd");
                    }
                }
                root.insert("version".into(), Value::from(1));
                version = 1;
            }
            _ => {
                return Err(CliplaneError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}

fn rename_key(object: &mut Map<String, Value>, from: &str, to: &str) {
    if let Some(value) = object.remove(from) {
        object.entry(to).or_insert(value);
    }
}
