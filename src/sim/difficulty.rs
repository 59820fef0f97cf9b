//! Difficulty levels and their balance parameters

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    /// Hardest level: themed sections drive pattern selection
    Extreme,
}

/// Balance knobs for one difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyParams {
    /// Seconds between spawns before section multipliers
    pub spawn_interval: f32,
    pub speed_mult: f32,
    pub size_mult: f32,
    /// Scales pattern amplitude
    pub amplitude_scale: f32,
    /// Inclusive range of rings per pattern run
    pub run_length: (u32, u32),
    /// Scales the ring count at which each pattern unlocks (0 = all unlocked)
    pub unlock_scale: f32,
    /// Whether themed sections drive pattern choice
    pub sections: bool,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }

    /// Parse a persisted key. Unknown keys are a configuration error.
    pub fn from_key(key: &str) -> Result<Self, ConfigError> {
        match key.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            "extreme" => Ok(Difficulty::Extreme),
            _ => {
                log::error!("Unknown difficulty key {key:?}");
                Err(ConfigError::UnknownDifficulty(key.to_string()))
            }
        }
    }

    pub fn params(&self) -> DifficultyParams {
        match self {
            Difficulty::Easy => DifficultyParams {
                spawn_interval: 1.3,
                speed_mult: 0.85,
                size_mult: 1.15,
                amplitude_scale: 0.7,
                run_length: (8, 14),
                unlock_scale: 1.5,
                sections: false,
            },
            Difficulty::Normal => DifficultyParams {
                spawn_interval: 1.1,
                speed_mult: 1.0,
                size_mult: 1.0,
                amplitude_scale: 1.0,
                run_length: (6, 12),
                unlock_scale: 1.0,
                sections: false,
            },
            Difficulty::Hard => DifficultyParams {
                spawn_interval: 0.95,
                speed_mult: 1.15,
                size_mult: 0.9,
                amplitude_scale: 1.15,
                run_length: (5, 10),
                unlock_scale: 0.5,
                sections: false,
            },
            Difficulty::Extreme => DifficultyParams {
                spawn_interval: 0.85,
                speed_mult: 1.25,
                size_mult: 0.85,
                amplitude_scale: 1.25,
                run_length: (3, 6),
                unlock_scale: 0.0,
                sections: true,
            },
        }
    }
}
