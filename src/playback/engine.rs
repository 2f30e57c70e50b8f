//! Capo playback state machine
//!
//! [`CapoPlayer`] owns the indexed measures, the marker state, the traversal
//! tick counter and the scheduler. Taps, the play button and the loop button
//! call into it; the host's event loop feeds it time through [`CapoPlayer::pump`]
//! (or single steps through [`CapoPlayer::tick`]).
//!
//! ## States
//! - `Idle`: not animating. The marker may still sit on an active measure.
//! - `Running`: one tick moves the marker `1 / total_ticks` of the way across
//!   the active measure.
//!
//! ## End of a measure
//! - The active measure is the loop: the marker goes back to the start bound
//!   and the same measure plays again.
//! - Otherwise the next measure becomes active, wrapping from the last
//!   measure to the first. Playback never halts on its own.

use std::time::Instant;

use log::{debug, info, trace, warn};

use super::scheduler::Ticker;
use super::timeline::{Step, Traversal};
use super::types::{
    MeasureView, PlaybackConfig, PlaybackEvent, PlaybackSnapshot, PlaybackState, PlaybackStatus,
};
use crate::error::TabError;
use crate::model::Tab;
use crate::selection::LoopSelection;

type Subscriber = Box<dyn FnMut(&PlaybackEvent)>;

pub struct CapoPlayer {
    title: Option<String>,
    config: PlaybackConfig,
    selection: LoopSelection,
    state: PlaybackState,
    traversal: Traversal,
    ticker: Ticker,
    subscribers: Vec<Subscriber>,
}

impl std::fmt::Debug for CapoPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapoPlayer")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("elapsed", &self.traversal.elapsed())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl CapoPlayer {
    /// Build a player over `tab`. Fails only on an unusable configuration.
    pub fn new(tab: Tab, config: PlaybackConfig) -> Result<Self, TabError> {
        config.validate()?;
        let title = tab.title.clone();
        Ok(Self {
            title,
            state: PlaybackState::new(&config.fretboard),
            traversal: Traversal::new(&config),
            ticker: Ticker::new(&config),
            selection: LoopSelection::new(tab),
            config,
            subscribers: Vec::new(),
        })
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn selection(&self) -> &LoopSelection {
        &self.selection
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn active_measure(&self) -> Option<usize> {
        self.state.active_measure
    }

    pub fn marker_position(&self) -> f64 {
        self.state.marker_position
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.state.is_playing {
            PlaybackStatus::Running
        } else {
            PlaybackStatus::Idle
        }
    }

    /// Ticks into the current traversal.
    pub fn elapsed_ticks(&self) -> u32 {
        self.traversal.elapsed()
    }

    /// Register a callback run after every state change.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&PlaybackEvent) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Place the marker on `measure` at `raw_x` (clamped to the marker range).
    ///
    /// If the previously active measure held the loop, the loop follows the
    /// marker to `measure`. While playing, the animation restarts from the
    /// new position.
    pub fn on_tap(&mut self, measure: usize, raw_x: f64) {
        if measure >= self.selection.len() {
            warn!("Ignoring tap on measure index {} (have {})", measure, self.selection.len());
            return;
        }

        let position = self.config.fretboard.clamp(raw_x);
        let previous = self.state.active_measure;
        self.state.active_measure = Some(measure);
        self.state.marker_position = position;
        self.emit(PlaybackEvent::Activated { measure, position });

        if self.selection.transfer(previous, measure) {
            self.emit(PlaybackEvent::LoopSelectionChanged {
                selected: Some(measure),
            });
        }

        if self.state.is_playing {
            self.start_animation();
        }
    }

    /// Play/pause. Starting without an active measure does nothing.
    pub fn toggle_playback(&mut self) {
        if self.state.is_playing {
            self.stop();
            return;
        }
        if self.state.active_measure.is_none() {
            debug!("Play requested with no active measure; staying idle");
            return;
        }
        self.state.is_playing = true;
        self.start_animation();
    }

    /// Select `measure` as the loop, or clear it if it already is.
    pub fn toggle_loop(&mut self, measure: usize) {
        if measure >= self.selection.len() {
            warn!("Ignoring loop toggle for measure index {}", measure);
            return;
        }
        self.selection.toggle_loop(measure);
        let selected = self.selection.loop_selected();
        self.emit(PlaybackEvent::LoopSelectionChanged { selected });
    }

    /// The loop button: toggles the loop on the active measure, if there is one.
    pub fn toggle_active_loop(&mut self) {
        if let Some(active) = self.state.active_measure {
            self.toggle_loop(active);
        }
    }

    pub fn clear_loops(&mut self) {
        self.selection.clear_all();
        self.emit(PlaybackEvent::LoopSelectionChanged { selected: None });
    }

    /// Running -> Idle and cancel the timer. Call when the hosting view goes away.
    pub fn teardown(&mut self) {
        if self.state.is_playing || self.ticker.is_armed() {
            self.stop();
        }
    }

    /// Run every tick due at `now`. Returns how many ran.
    pub fn pump(&mut self, now: Instant) -> u32 {
        let due = self.ticker.poll(now);
        for _ in 0..due {
            self.tick();
        }
        due
    }

    /// Advance one scheduler step. No-op unless running.
    pub fn tick(&mut self) {
        if !self.state.is_playing {
            return;
        }
        let Some(active) = self.state.active_measure else {
            self.stop();
            return;
        };

        match self.traversal.step() {
            Step::Moved(position) => {
                trace!("Marker at {:.1} (tick {})", position, self.traversal.elapsed());
                self.state.marker_position = position;
                self.emit(PlaybackEvent::MarkerMoved { position });
            }
            Step::Finished => self.finish_measure(active),
        }
    }

    /// Renderer view of the current state.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let measures = self
            .selection
            .measures()
            .iter()
            .enumerate()
            .map(|(index, measure)| MeasureView {
                index,
                section_name: self.selection.section_name_for(index).map(str::to_string),
                tempo: measure.tempo,
                loop_selected: measure.is_loop_selected,
                notes: measure.notes.clone(),
            })
            .collect();

        PlaybackSnapshot {
            title: self.title.clone(),
            measures,
            active_measure: self.state.active_measure,
            marker_position: self.state.marker_position,
            status: self.status(),
        }
    }

    fn finish_measure(&mut self, active: usize) {
        let start = self.traversal.start_bound();

        if self.selection.is_loop_selected(active) {
            debug!("Measure {} is looped; restarting it", active + 1);
            self.state.marker_position = start;
            self.traversal.rewind();
            self.emit(PlaybackEvent::LoopRestarted { measure: active });
        } else {
            let next = active + 1;
            if next < self.selection.len() {
                debug!("Advancing from measure {} to {}", active + 1, next + 1);
                self.state.active_measure = Some(next);
                self.state.marker_position = start;
                self.traversal.rewind();
                self.emit(PlaybackEvent::Advanced { from: active, to: next });
            } else {
                debug!("Reached the last measure; wrapping to the first");
                self.state.active_measure = Some(0);
                self.state.marker_position = start;
                self.traversal.rewind();
                self.emit(PlaybackEvent::Wrapped { from: active });
            }
        }
        self.emit(PlaybackEvent::MarkerMoved { position: start });
    }

    /// Stop-then-start: the tick count resumes from the marker's current position.
    fn start_animation(&mut self) {
        self.ticker.stop();
        let Some(measure) = self.state.active_measure else {
            return;
        };
        let from_tick = self.traversal.resume_from(self.state.marker_position);
        let generation = self.ticker.start();
        info!(
            "Playback started on measure {} at tick {}/{} (timer {})",
            measure + 1,
            from_tick,
            self.traversal.total_ticks(),
            generation
        );
        self.emit(PlaybackEvent::Started { measure, from_tick });
    }

    fn stop(&mut self) {
        self.ticker.stop();
        self.state.is_playing = false;
        info!("Playback stopped");
        self.emit(PlaybackEvent::Stopped);
    }

    fn emit(&mut self, event: PlaybackEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }
}
