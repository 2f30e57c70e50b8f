//! Fixed-rate tick scheduler
//!
//! [`Ticker`] replaces a repeating UI timer with an explicit object the host
//! polls from its event loop. Only one timer is ever armed: `start` cancels
//! the previous one and issues a new generation, `stop` disarms.
//!
//! Due ticks are counted from the anchor (the first poll after `start`), so
//! late polls catch up instead of slowing playback down.

use std::time::{Duration, Instant};

use log::warn;

use super::types::PlaybackConfig;

#[derive(Debug, Clone)]
struct Armed {
    generation: u64,
    anchor: Option<Instant>,
    emitted: u64,
}

#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    max_catch_up: u32,
    generation: u64,
    armed: Option<Armed>,
}

impl Ticker {
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            interval: config.tick_interval(),
            max_catch_up: config.max_catch_up_ticks.max(1),
            generation: 0,
            armed: None,
        }
    }

    /// Arm a fresh timer, cancelling any armed one. Returns its generation.
    pub fn start(&mut self) -> u64 {
        self.stop();
        self.generation += 1;
        self.armed = Some(Armed {
            generation: self.generation,
            anchor: None,
            emitted: 0,
        });
        self.generation
    }

    pub fn stop(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Generation of the armed timer.
    pub fn generation(&self) -> Option<u64> {
        self.armed.as_ref().map(|a| a.generation)
    }

    /// Number of ticks due at `now`. The first poll after `start` anchors the timer and returns 0.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let interval = self.interval.as_nanos().max(1);
        let max_catch_up = self.max_catch_up as u64;
        let Some(armed) = self.armed.as_mut() else {
            return 0;
        };
        let Some(anchor) = armed.anchor else {
            armed.anchor = Some(now);
            return 0;
        };

        let due = (now.saturating_duration_since(anchor).as_nanos() / interval) as u64;
        let pending = due.saturating_sub(armed.emitted);
        armed.emitted = due;

        if pending > max_catch_up {
            warn!(
                "Scheduler fell behind by {} ticks; dropping {}",
                pending,
                pending - max_catch_up
            );
            return max_catch_up as u32;
        }
        pending as u32
    }
}
