//! Playback type definitions
//!
//! Configuration, state and the read-only views handed to a renderer.

use serde::{Deserialize, Serialize};

use crate::error::TabError;
use crate::model::FretNote;

/// Horizontal extent of one fretboard and the range the capo marker may occupy.
///
/// The marker lives in `[margin, width - edge_inset]`: the margin keeps it
/// off the string labels and the inset keeps it inside the right edge.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FretboardGeometry {
    pub width: f64,
    pub margin: f64,
    pub edge_inset: f64,
}

impl Default for FretboardGeometry {
    fn default() -> Self {
        Self {
            width: 600.0,
            margin: 20.0,
            edge_inset: 4.0,
        }
    }
}

impl FretboardGeometry {
    /// Leftmost marker position, where every traversal starts.
    pub fn start_bound(&self) -> f64 {
        self.margin
    }

    /// Rightmost marker position, where every traversal ends.
    pub fn end_bound(&self) -> f64 {
        self.width - self.edge_inset
    }

    /// Clamp a raw tap coordinate into the marker range.
    pub fn clamp(&self, raw_x: f64) -> f64 {
        if raw_x.is_nan() {
            return self.start_bound();
        }
        raw_x.max(self.start_bound()).min(self.end_bound())
    }
}

/// Timing and layout for capo playback.
///
/// Deserialized from the `playback:` block of a tab file; every field has a
/// default so the block may be partial or absent.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PlaybackConfig {
    pub fretboard: FretboardGeometry,
    /// Seconds for the marker to cross one measure.
    pub traversal_seconds: f64,
    pub ticks_per_second: u32,
    /// Most ticks a single scheduler poll will replay after a stall.
    pub max_catch_up_ticks: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fretboard: FretboardGeometry::default(),
            traversal_seconds: 3.0,
            ticks_per_second: 60,
            max_catch_up_ticks: 60,
        }
    }
}

impl PlaybackConfig {
    /// Ticks in one full traversal (180 with the defaults).
    pub fn total_ticks(&self) -> u32 {
        ((self.traversal_seconds * self.ticks_per_second as f64).round() as u32).max(1)
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.ticks_per_second.max(1) as f64)
    }

    /// Reject configurations that would leave no room to move or no clock to move by.
    pub fn validate(&self) -> Result<(), TabError> {
        let g = &self.fretboard;
        if !(g.width.is_finite() && g.width > 0.0) {
            return Err(TabError::ConfigError(format!(
                "fretboard width must be positive, got {}",
                g.width
            )));
        }
        if !(g.margin.is_finite() && g.margin >= 0.0) || !(g.edge_inset.is_finite() && g.edge_inset >= 0.0) {
            return Err(TabError::ConfigError(
                "fretboard margin and edge-inset must be non-negative".to_string(),
            ));
        }
        if g.start_bound() >= g.end_bound() {
            return Err(TabError::ConfigError(format!(
                "marker range is empty: margin {} leaves nothing before {}",
                g.margin,
                g.end_bound()
            )));
        }
        if self.ticks_per_second == 0 {
            return Err(TabError::ConfigError("ticks-per-second must be at least 1".to_string()));
        }
        if !(self.traversal_seconds.is_finite() && self.traversal_seconds > 0.0) {
            return Err(TabError::ConfigError(format!(
                "traversal-seconds must be positive, got {}",
                self.traversal_seconds
            )));
        }
        Ok(())
    }
}

/// Whether the marker is being animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Running,
}

/// The mutable part of a session besides loop flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    /// Flattened index of the measure holding the marker.
    pub active_measure: Option<usize>,
    pub marker_position: f64,
    pub is_playing: bool,
}

impl PlaybackState {
    pub fn new(geometry: &FretboardGeometry) -> Self {
        Self {
            active_measure: None,
            marker_position: geometry.start_bound(),
            is_playing: false,
        }
    }
}

/// What a renderer needs for one measure.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureView {
    pub index: usize,
    /// Set on the first measure of a named section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
    pub tempo: u16,
    pub loop_selected: bool,
    pub notes: Vec<FretNote>,
}

/// Read-only copy of everything a renderer draws.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub measures: Vec<MeasureView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_measure: Option<usize>,
    pub marker_position: f64,
    pub status: PlaybackStatus,
}

/// State changes announced to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// A tap moved the marker.
    Activated { measure: usize, position: f64 },
    /// The animation (re)started from `from_tick`.
    Started { measure: usize, from_tick: u32 },
    Stopped,
    MarkerMoved { position: f64 },
    /// A loop-selected measure reached its end and restarted.
    LoopRestarted { measure: usize },
    /// Sequential playback moved on to the next measure.
    Advanced { from: usize, to: usize },
    /// Sequential playback ran past the last measure and went back to 0.
    Wrapped { from: usize },
    LoopSelectionChanged { selected: Option<usize> },
}
