//! # Tab Model
//!
//! Types describing a guitar tab: sections of measures, each measure a set of
//! fretted notes placed along its length.
//!
//! ## Type Hierarchy
//! ```text
//! Tab
//!   ├── title: Option<String>
//!   └── Vec<TabSection>
//!         ├── name: Option<String>
//!         └── Vec<TabMeasure>
//!               ├── tempo (BPM, informational)
//!               ├── is_loop_selected
//!               └── Vec<FretNote>
//!                     ├── string_index (0 = high e ... 5 = low E)
//!                     ├── fret_number: Option<u8>
//!                     └── position (0.0 ..= 1.0 along the measure)
//! ```
//!
//! Notes and the section tree are fixed once built. Only the loop flag on a
//! measure changes during a session, and only through
//! [`crate::selection::LoopSelection`].
//!
//! ## Related Modules
//! - `loader` - Builds these types from YAML or the built-in demo
//! - `validate` - Checks string indices, positions and the single-loop rule
//! - `selection` - Flattens sections into an indexed measure list

use serde::{Deserialize, Serialize};

/// Tempo given to measures that don't set one.
pub const DEFAULT_TEMPO: u16 = 71;

/// Number of strings on the fretboard.
pub const STRING_COUNT: usize = 6;

/// Highest fret a note may name.
pub const MAX_FRET: u8 = 24;

/// One string of the instrument, as labelled on the fretboard.
#[derive(Debug, Clone, PartialEq)]
pub struct GuitarString {
    pub name: &'static str,
    pub position: usize,
}

impl GuitarString {
    /// Standard tuning, top line first (high e is index 0).
    pub fn standard() -> [GuitarString; STRING_COUNT] {
        [
            GuitarString { name: "e", position: 0 },
            GuitarString { name: "B", position: 1 },
            GuitarString { name: "G", position: 2 },
            GuitarString { name: "D", position: 3 },
            GuitarString { name: "A", position: 4 },
            GuitarString { name: "E", position: 5 },
        ]
    }
}

/// A fretted (or empty) slot on one string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FretNote {
    pub string_index: usize,
    /// `None` leaves the slot blank.
    pub fret_number: Option<u8>,
    /// Fraction of the measure, 0.0 at the left edge.
    pub position: f64,
}

impl FretNote {
    pub fn new(string_index: usize, fret_number: u8, position: f64) -> Self {
        Self {
            string_index,
            fret_number: Some(fret_number),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabMeasure {
    pub notes: Vec<FretNote>,
    pub tempo: u16,
    pub is_loop_selected: bool,
}

impl TabMeasure {
    pub fn new(notes: Vec<FretNote>) -> Self {
        Self {
            notes,
            tempo: DEFAULT_TEMPO,
            is_loop_selected: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabSection {
    pub measures: Vec<TabMeasure>,
    pub name: Option<String>,
}

impl TabSection {
    pub fn new(measures: Vec<TabMeasure>, name: Option<&str>) -> Self {
        Self {
            measures,
            name: name.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tab {
    pub title: Option<String>,
    pub sections: Vec<TabSection>,
}

impl Tab {
    /// Number of measures across all sections.
    pub fn measure_count(&self) -> usize {
        self.sections.iter().map(|s| s.measures.len()).sum()
    }

    /// Measures in playback order, section by section.
    pub fn measures(&self) -> impl Iterator<Item = &TabMeasure> {
        self.sections.iter().flat_map(|s| s.measures.iter())
    }
}

/// Raw tab document for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RawTab {
    pub title: Option<String>,
    pub tempo: Option<u16>,
    #[serde(default)]
    pub playback: Option<crate::playback::PlaybackConfig>,
    #[serde(default)]
    pub sections: Vec<RawSection>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RawSection {
    pub name: Option<String>,
    #[serde(default)]
    pub measures: Vec<RawMeasure>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RawMeasure {
    pub tempo: Option<u16>,
    #[serde(default, rename = "loop")]
    pub loop_selected: bool,
    #[serde(default)]
    pub notes: Vec<RawNote>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub struct RawNote {
    pub string: usize,
    pub fret: Option<u8>,
    pub position: f64,
}
