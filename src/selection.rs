//! # Loop Selection
//!
//! Flattened, indexed view of a tab's measures and the single-measure loop flag.
//!
//! ## Purpose
//! Playback addresses measures by one index `0..N-1` running through every
//! section in order. [`LoopSelection`] builds that list once from the section
//! tree and keeps the span of each section, so lookups never walk the tree.
//!
//! ## Invariant
//! At most one measure has `is_loop_selected` set. Selecting a measure clears
//! every other flag first.
//!
//! ## Out-of-range indices
//! Every operation taking an index ignores (or answers `false`/`None` for)
//! indices past the end. Nothing here fails.

use log::{info, warn};

use crate::model::{Tab, TabMeasure};

/// Where a section sits in the flattened measure list.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpan {
    pub name: Option<String>,
    pub start: usize,
    pub len: usize,
}

#[derive(Debug, Clone)]
pub struct LoopSelection {
    measures: Vec<TabMeasure>,
    sections: Vec<SectionSpan>,
    /// Index of the measure whose flag is set.
    selected: Option<usize>,
}

impl LoopSelection {
    /// Flatten a tab. If the seed carries several loop flags only the first survives.
    pub fn new(tab: Tab) -> Self {
        let mut measures = Vec::with_capacity(tab.measure_count());
        let mut sections = Vec::with_capacity(tab.sections.len());

        for section in tab.sections {
            sections.push(SectionSpan {
                name: section.name,
                start: measures.len(),
                len: section.measures.len(),
            });
            measures.extend(section.measures);
        }

        let mut selected = None;
        for (i, measure) in measures.iter_mut().enumerate() {
            if measure.is_loop_selected {
                if selected.is_none() {
                    selected = Some(i);
                } else {
                    warn!("Measure {} is also loop-selected in the seed; clearing it", i + 1);
                    measure.is_loop_selected = false;
                }
            }
        }

        Self {
            measures,
            sections,
            selected,
        }
    }

    pub fn len(&self) -> usize {
        self.measures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    pub fn measures(&self) -> &[TabMeasure] {
        &self.measures
    }

    pub fn sections(&self) -> &[SectionSpan] {
        &self.sections
    }

    /// Select `index` alone, or deselect it if it is already the loop.
    pub fn toggle_loop(&mut self, index: usize) {
        if index >= self.measures.len() {
            warn!("Ignoring loop toggle for measure index {} (have {})", index, self.measures.len());
            return;
        }
        if self.measures[index].is_loop_selected {
            self.measures[index].is_loop_selected = false;
            self.selected = None;
            info!("Loop cleared from measure {}", index + 1);
        } else {
            self.select_only(index);
            info!("Loop set on measure {}", index + 1);
        }
    }

    /// Clear every loop flag. Idempotent.
    pub fn clear_all(&mut self) {
        for measure in &mut self.measures {
            measure.is_loop_selected = false;
        }
        self.selected = None;
    }

    pub fn is_loop_selected(&self, index: usize) -> bool {
        self.measures
            .get(index)
            .map(|m| m.is_loop_selected)
            .unwrap_or(false)
    }

    /// The loop-selected measure, if any.
    pub fn loop_selected(&self) -> Option<usize> {
        self.selected
    }

    /// Carry the loop from `from` to `to` when `from` holds it.
    ///
    /// Returns true if the selection moved. Nothing changes when `from` is
    /// `None`, isn't the loop, or `to` is out of range.
    pub fn transfer(&mut self, from: Option<usize>, to: usize) -> bool {
        let Some(from) = from else {
            return false;
        };
        if !self.is_loop_selected(from) || to >= self.measures.len() {
            return false;
        }
        self.select_only(to);
        if from != to {
            info!("Loop moved from measure {} to measure {}", from + 1, to + 1);
        }
        true
    }

    /// Name to show above `index`: only the first measure of a named section gets one.
    pub fn section_name_for(&self, index: usize) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.start == index && s.len > 0)
            .and_then(|s| s.name.as_deref())
    }

    /// Position of the section containing `index`.
    pub fn section_of(&self, index: usize) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| index >= s.start && index < s.start + s.len)
    }

    fn select_only(&mut self, index: usize) {
        self.clear_all();
        self.measures[index].is_loop_selected = true;
        self.selected = Some(index);
    }
}
