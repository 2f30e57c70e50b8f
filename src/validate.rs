//! # Semantic Validation
//!
//! Checks a [`Tab`] before playback is built over it.
//!
//! ## Rules
//! - The tab has at least one measure
//! - Every note sits on a string `0..=5`
//! - Every note position is finite and inside `[0, 1]`
//! - Fret numbers go no higher than 24
//! - At most one measure starts out loop-selected
//!
//! Measure numbers in errors are 1-indexed in flattened order, the way a
//! reader counts them on screen.

use crate::error::TabError;
use crate::model::{Tab, TabMeasure, MAX_FRET, STRING_COUNT};

pub fn validate(tab: &Tab) -> Result<(), TabError> {
    if tab.measure_count() == 0 {
        return Err(TabError::SemanticError {
            measure: 0,
            message: "tab has no measures".to_string(),
        });
    }

    let mut first_loop: Option<usize> = None;
    for (i, measure) in tab.measures().enumerate() {
        let number = i + 1;
        validate_measure(measure, number)?;

        if measure.is_loop_selected {
            if let Some(first) = first_loop {
                return Err(TabError::SemanticError {
                    measure: number,
                    message: format!("measure {} is already loop-selected; only one loop is allowed", first),
                });
            }
            first_loop = Some(number);
        }
    }
    Ok(())
}

fn validate_measure(measure: &TabMeasure, number: usize) -> Result<(), TabError> {
    for note in &measure.notes {
        if note.string_index >= STRING_COUNT {
            return Err(TabError::SemanticError {
                measure: number,
                message: format!(
                    "string index {} is out of range (0-{})",
                    note.string_index,
                    STRING_COUNT - 1
                ),
            });
        }
        if !note.position.is_finite() || !(0.0..=1.0).contains(&note.position) {
            return Err(TabError::SemanticError {
                measure: number,
                message: format!("note position {} is outside 0.0-1.0", note.position),
            });
        }
        if let Some(fret) = note.fret_number {
            if fret > MAX_FRET {
                return Err(TabError::SemanticError {
                    measure: number,
                    message: format!("fret {} is above the {}th fret", fret, MAX_FRET),
                });
            }
        }
    }
    Ok(())
}
