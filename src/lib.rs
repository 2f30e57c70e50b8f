pub mod error;
pub mod loader;
pub mod model;
pub mod playback;
pub mod render;
pub mod selection;
pub mod validate;

pub use error::*;
pub use loader::demo_tab;
pub use model::*;
pub use playback::{CapoPlayer, PlaybackConfig, PlaybackEvent, PlaybackSnapshot, PlaybackStatus};
pub use render::render_tab;
pub use selection::LoopSelection;
pub use validate::validate;

/// Load a YAML tab and its playback settings.
/// This is the main entry point for the library.
pub fn load_tab(source: &str) -> Result<(Tab, PlaybackConfig), TabError> {
    let (tab, config) = loader::parse(source)?;
    validate(&tab)?;
    config.validate()?;
    Ok((tab, config))
}

/// Build a player over a YAML tab, ready for taps.
pub fn open_player(source: &str) -> Result<CapoPlayer, TabError> {
    let (tab, config) = load_tab(source)?;
    CapoPlayer::new(tab, config)
}
