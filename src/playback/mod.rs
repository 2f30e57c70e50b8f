//! # Playback Module
//!
//! Drives the capo marker across the tab.
//!
//! ## Purpose
//! A tap puts the marker on a measure. While playing, the marker crosses the
//! active measure at a fixed tick rate and then either restarts the same
//! measure (when it is the loop) or moves on to the next one, wrapping at the end.
//!
//! ## Sub-modules
//! - `types` - Configuration, state, snapshot and event types
//! - `timeline` - Tick/position arithmetic for one traversal
//! - `scheduler` - The explicit start/stop/poll timer
//! - `engine` - [`CapoPlayer`], the state machine tying them together
//!
//! ## Example
//! ```rust
//! use tabloop::playback::{CapoPlayer, PlaybackConfig, PlaybackStatus};
//! use tabloop::demo_tab;
//!
//! let mut player = CapoPlayer::new(demo_tab(), PlaybackConfig::default()).unwrap();
//! player.on_tap(2, 300.0);
//! player.toggle_active_loop();
//! player.toggle_playback();
//! assert_eq!(player.status(), PlaybackStatus::Running);
//!
//! for _ in 0..180 {
//!     player.tick();
//! }
//! // Looped measure: back at the start bound, same measure.
//! assert_eq!(player.active_measure(), Some(2));
//! ```
//!
//! ## Timing
//! With the defaults a traversal is 3 seconds at 60 ticks per second, so
//! 180 ticks carry the marker from x = 20 to x = 596. Restarting from a tap
//! resumes at the tick matching the tapped position instead of tick 0.

mod engine;
mod scheduler;
mod timeline;
mod types;

#[cfg(test)]
mod tests;

pub use engine::CapoPlayer;
pub use scheduler::Ticker;
pub use timeline::{Step, Traversal};
pub use types::{
    FretboardGeometry, MeasureView, PlaybackConfig, PlaybackEvent, PlaybackSnapshot,
    PlaybackState, PlaybackStatus,
};
