//! Error types
//!
//! Only configuration faults are errors. Leaving the plane or missing a ring
//! are game-rule transitions and travel as `GameEvent`s instead.

use thiserror::Error;

/// Invalid configuration. Always surfaced, never replaced by a default.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Difficulty key that does not name a known difficulty
    #[error("unknown difficulty key: {0:?}")]
    UnknownDifficulty(String),
    /// Tuning value outside its valid range
    #[error("invalid tuning value for {field}: {value}")]
    InvalidTuning {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: f32,
    },
    /// A configured quantity would be used as a zero divisor
    #[error("degenerate division: {0} is zero")]
    DegenerateDivision(&'static str),
}

/// Failure loading or storing the settings record
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings record is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings rejected: {0}")]
    Config(#[from] ConfigError),
}
