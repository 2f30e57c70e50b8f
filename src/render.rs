//! Plain-text rendering of a playback snapshot
//!
//! Each measure becomes a header line and six string lines. Fret numbers are
//! placed at their note positions and the capo marker is drawn as a `|` column
//! on the active measure.

use crate::model::GuitarString;
use crate::playback::{FretboardGeometry, MeasureView, PlaybackSnapshot, PlaybackStatus};

/// Fewest cells a string line may have.
pub const MIN_COLUMNS: usize = 8;

/// Most cells a string line may have.
pub const MAX_COLUMNS: usize = 512;

const MARKER: char = '|';
const LINE: char = '-';

/// Render every measure of `snapshot`, `columns` cells wide per string line.
pub fn render_tab(snapshot: &PlaybackSnapshot, geometry: &FretboardGeometry, columns: usize) -> String {
    let columns = columns.clamp(MIN_COLUMNS, MAX_COLUMNS);
    let mut out = String::new();

    if let Some(title) = &snapshot.title {
        out.push_str(title);
        out.push('\n');
    }
    out.push_str(&status_line(snapshot));
    out.push('\n');

    for measure in &snapshot.measures {
        out.push('\n');
        let marker = if snapshot.active_measure == Some(measure.index) {
            Some(marker_column(snapshot.marker_position, geometry, columns))
        } else {
            None
        };
        out.push_str(&measure_to_text(measure, columns, marker));
    }

    out
}

/// One-line summary: play state, active measure and marker position.
pub fn status_line(snapshot: &PlaybackSnapshot) -> String {
    let state = match snapshot.status {
        PlaybackStatus::Running => "playing",
        PlaybackStatus::Idle => "paused",
    };
    match snapshot.active_measure {
        Some(active) => {
            let looped = snapshot
                .measures
                .get(active)
                .map(|m| m.loop_selected)
                .unwrap_or(false);
            format!(
                "[{}] measure {} at x={:.1}{}",
                state,
                active + 1,
                snapshot.marker_position,
                if looped { " (loop)" } else { "" }
            )
        }
        None => format!("[{}] tap a measure to place the capo", state),
    }
}

fn measure_to_text(measure: &MeasureView, columns: usize, marker: Option<usize>) -> String {
    let mut text = String::new();

    if let Some(name) = &measure.section_name {
        text.push_str(name);
        text.push_str("  ");
    }
    text.push_str(&format!("Measure {}  \u{2669} = {}", measure.index + 1, measure.tempo));
    if measure.loop_selected {
        text.push_str("  LOOP SELECTED");
    }
    text.push('\n');

    for string in GuitarString::standard() {
        let mut cells = vec![LINE; columns];
        for note in measure.notes.iter().filter(|n| n.string_index == string.position) {
            if let Some(fret) = note.fret_number {
                let start = note_column(note.position, columns);
                let digits = fret.to_string();
                let start = start.min(columns - digits.len());
                for (offset, digit) in digits.chars().enumerate() {
                    cells[start + offset] = digit;
                }
            }
        }
        if let Some(col) = marker {
            if cells[col] == LINE {
                cells[col] = MARKER;
            }
        }
        text.push_str(&format!("{:<2}|", string.name));
        text.extend(cells);
        text.push_str("|\n");
    }

    text
}

fn note_column(position: f64, columns: usize) -> usize {
    let last = (columns - 1) as f64;
    (position.clamp(0.0, 1.0) * last).round() as usize
}

fn marker_column(position: f64, geometry: &FretboardGeometry, columns: usize) -> usize {
    let span = geometry.end_bound() - geometry.start_bound();
    let progress = (position - geometry.start_bound()) / span;
    note_column(progress, columns)
}
