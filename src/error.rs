//! # Error Types
//!
//! Errors raised while building a tab and its playback configuration.
//!
//! Only construction paths fail. Once a [`crate::CapoPlayer`] exists, every
//! playback operation clamps or ignores bad input instead of returning an error.
//!
//! ## Usage
//! ```rust
//! use tabloop::{load_tab, TabError};
//!
//! match load_tab("sections: []") {
//!     Ok(_) => unreachable!(),
//!     Err(TabError::SemanticError { message, .. }) => assert!(message.contains("no measures")),
//!     Err(e) => panic!("unexpected: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    /// The tab YAML could not be read.
    ///
    /// # Example
    /// ```
    /// # use tabloop::TabError;
    /// let err = TabError::ParseError("expected a mapping".to_string());
    /// assert_eq!(err.to_string(), "Parse error: expected a mapping");
    /// ```
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Fretboard or timing configuration that playback cannot run with.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A measure breaks a model rule. `measure` is 1-indexed in flattened order.
    ///
    /// # Example
    /// ```
    /// # use tabloop::TabError;
    /// let err = TabError::SemanticError {
    ///     measure: 3,
    ///     message: "string index 7 is out of range (0-5)".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Semantic error at measure 3: string index 7 is out of range (0-5)"
    /// );
    /// ```
    #[error("Semantic error at measure {measure}: {message}")]
    SemanticError { measure: usize, message: String },
}
