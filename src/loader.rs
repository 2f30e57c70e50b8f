//! # Tab Loader
//!
//! Builds a [`Tab`] and its [`PlaybackConfig`] from a YAML document, or from
//! the built-in demo.
//!
//! ## Format
//! ```yaml
//! title: Let Ring Study
//! tempo: 71              # default for measures without their own
//! playback:              # optional, every key defaulted
//!   traversal-seconds: 3.0
//!   ticks-per-second: 60
//!   fretboard: { width: 600, margin: 20, edge-inset: 4 }
//! sections:
//!   - name: Intro
//!     measures:
//!       - loop: false
//!         notes:
//!           - { string: 0, fret: 0, position: 0.25 }
//!           - { string: 3, position: 0.5 }   # no fret: blank slot
//! ```

use crate::error::TabError;
use crate::model::{FretNote, RawTab, Tab, TabMeasure, TabSection, DEFAULT_TEMPO};
use crate::playback::PlaybackConfig;

/// Parse and convert a YAML tab document. No semantic checks are made here.
pub fn parse(source: &str) -> Result<(Tab, PlaybackConfig), TabError> {
    let raw: RawTab =
        serde_yaml::from_str(source).map_err(|e| TabError::ParseError(e.to_string()))?;

    let default_tempo = raw.tempo.unwrap_or(DEFAULT_TEMPO);
    let sections = raw
        .sections
        .into_iter()
        .map(|section| TabSection {
            name: section.name,
            measures: section
                .measures
                .into_iter()
                .map(|measure| TabMeasure {
                    tempo: measure.tempo.unwrap_or(default_tempo),
                    is_loop_selected: measure.loop_selected,
                    notes: measure
                        .notes
                        .into_iter()
                        .map(|note| FretNote {
                            string_index: note.string,
                            fret_number: note.fret,
                            position: note.position,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    let tab = Tab {
        title: raw.title,
        sections,
    };
    Ok((tab, raw.playback.unwrap_or_default()))
}

/// The built-in tab: a one-measure intro followed by four measures in E minor.
pub fn demo_tab() -> Tab {
    let intro = TabMeasure::new(vec![
        FretNote::new(0, 0, 0.25),
        FretNote::new(1, 0, 0.5),
        FretNote::new(2, 0, 0.75),
        FretNote::new(3, 6, 0.0),
        FretNote::new(4, 8, 0.0),
        FretNote::new(5, 8, 0.0),
        FretNote::new(5, 0, 1.0),
    ]);

    let em_open = TabMeasure::new(vec![
        FretNote::new(3, 3, 0.25),
        FretNote::new(2, 0, 0.5),
        FretNote::new(1, 0, 0.75),
        FretNote::new(0, 7, 1.0),
        FretNote::new(5, 0, 0.0),
    ]);

    let em_climb = TabMeasure::new(vec![
        FretNote::new(0, 7, 0.0),
        FretNote::new(1, 0, 0.25),
        FretNote::new(2, 0, 0.5),
        FretNote::new(3, 7, 0.75),
        FretNote::new(4, 0, 1.0),
        FretNote::new(5, 0, 0.0),
    ]);

    let em_ring = TabMeasure::new(vec![
        FretNote::new(0, 0, 0.25),
        FretNote::new(1, 0, 0.5),
        FretNote::new(2, 0, 0.75),
        FretNote::new(0, 7, 1.0),
        FretNote::new(5, 0, 0.0),
    ]);

    Tab {
        title: Some("Let Ring Study".to_string()),
        sections: vec![
            TabSection::new(vec![intro], Some("Intro")),
            TabSection::new(
                vec![em_open, em_climb.clone(), em_ring, em_climb],
                Some("Em"),
            ),
        ],
    }
}
