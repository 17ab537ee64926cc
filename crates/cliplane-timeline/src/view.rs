//! Timeline view state (zoom and horizontal scroll).

use cliplane_core::limits::{MAX_ZOOM, MIN_ZOOM};
use cliplane_core::time::clamp_between;
use serde::{Deserialize, Serialize};

/// Zoom factor and scroll offset of the timeline view.
///
/// Purely numeric: the timeline never interprets these beyond clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    zoom: f64,
    scroll: f64,
}

impl ViewState {
    /// Build a view, clamping both values.
    pub fn new(zoom: f64, scroll: f64) -> Self {
        let mut view = Self::default();
        view.set_zoom(zoom);
        view.set_scroll(scroll);
        view
    }

    /// Zoom factor (1.0 = unzoomed, >1 zoomed in).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Horizontal scroll offset in pixels.
    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_between(zoom, MIN_ZOOM, MAX_ZOOM);
    }

    pub fn set_scroll(&mut self, scroll: f64) {
        self.scroll = if scroll.is_nan() { 0.0 } else { scroll.max(0.0) };
    }

    /// Back to unzoomed, scrolled to the start.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            scroll: 0.0,
        }
    }
}
