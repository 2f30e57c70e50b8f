//! Tick arithmetic for one marker traversal
//!
//! A traversal moves the marker from the start bound to the end bound in a
//! fixed number of ticks. The position is always derived from the tick count
//! (`start + (end - start) * elapsed / total`), never accumulated, so it can't drift.

use super::types::PlaybackConfig;

/// Slack for floating-point error when mapping a position back to its tick.
const TICK_EPSILON: f64 = 1e-9;

/// Result of advancing a traversal by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Still inside the measure; the marker belongs at this position.
    Moved(f64),
    /// The traversal reached its last tick and needs an end-of-measure decision.
    Finished,
}

#[derive(Debug, Clone)]
pub struct Traversal {
    start: f64,
    end: f64,
    total_ticks: u32,
    elapsed: u32,
}

impl Traversal {
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            start: config.fretboard.start_bound(),
            end: config.fretboard.end_bound(),
            total_ticks: config.total_ticks(),
            elapsed: 0,
        }
    }

    pub fn start_bound(&self) -> f64 {
        self.start
    }

    pub fn end_bound(&self) -> f64 {
        self.end
    }

    pub fn total_ticks(&self) -> u32 {
        self.total_ticks
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Tick count matching `position`, rounded down.
    ///
    /// `tick_for(position_at(k)) == k` for every tick in the traversal.
    pub fn tick_for(&self, position: f64) -> u32 {
        let span = self.end - self.start;
        let progress = ((position - self.start) / span).clamp(0.0, 1.0);
        (progress * self.total_ticks as f64 + TICK_EPSILON).floor() as u32
    }

    pub fn position_at(&self, tick: u32) -> f64 {
        let progress = tick as f64 / self.total_ticks as f64;
        self.start + (self.end - self.start) * progress
    }

    /// Resume from an arbitrary marker position; returns the tick resumed at.
    pub fn resume_from(&mut self, position: f64) -> u32 {
        self.elapsed = self.tick_for(position);
        self.elapsed
    }

    /// Back to the start bound after an end-of-measure decision.
    pub fn rewind(&mut self) {
        self.elapsed = 0;
    }

    pub fn step(&mut self) -> Step {
        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed >= self.total_ticks {
            Step::Finished
        } else {
            Step::Moved(self.position_at(self.elapsed))
        }
    }
}
