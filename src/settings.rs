//! Settings and physics tuning
//!
//! The persisted record is a flat JSON object owned by the settings
//! collaborator. The core reads it every frame and writes it back only when
//! the high score or the difficulty changes.

use std::path::PathBuf;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SettingsError};
use crate::highscores::HighScores;
use crate::sim::Difficulty;
use crate::tuning::{TuningTable, TuningVersion};

/// Numeric physics tuning for the orientation controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Max angular acceleration per axis (pitch, yaw, roll), deg/s²
    pub max_accel_deg: Vec3,
    /// Per-axis angular velocity caps (pitch, yaw, roll), rad/s
    pub max_axis_velocity: Vec3,
    /// Global angular velocity magnitude cap while tornado spin is active, rad/s
    pub global_max_velocity: f32,
    /// Release damping outside tornado spin, 1/s
    pub damping: f32,
    /// Release damping during tornado spin, 1/s
    pub tornado_damping: f32,
    /// Extra release damping, normal mode only, 1/s
    pub brake_on_release: f32,
    /// Exponent applied to the shaped stick magnitude
    pub input_exponent: f32,
    /// Seconds per full roll in directional air roll; 0 disables the spin
    pub free_roll_period: f32,
    /// Which tuning revision supplies gains and air-roll multipliers
    pub tuning: TuningVersion,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_accel_deg: Vec3::new(714.0, 521.0, 2153.0),
            max_axis_velocity: Vec3::splat(5.5),
            global_max_velocity: 5.5,
            damping: 2.96,
            tornado_damping: 4.35,
            brake_on_release: 0.0,
            input_exponent: 1.0,
            free_roll_period: 0.74,
            tuning: TuningVersion::default(),
        }
    }
}

impl PhysicsConfig {
    /// Tuning table for the configured revision
    pub fn table(&self) -> TuningTable {
        self.tuning.table()
    }

    /// Per-axis acceleration limits in rad/s²
    pub fn max_accel_rad(&self, tornado: bool, table: &TuningTable) -> Vec3 {
        let base = self.max_accel_deg * (std::f32::consts::PI / 180.0);
        if tornado { base * table.dar_accel_mult } else { base }
    }

    /// Roll rate commanded by directional air roll (rad/s), `2π / period`
    pub fn tornado_roll_rate(&self) -> f32 {
        if self.free_roll_period > 0.0 {
            std::f32::consts::TAU / self.free_roll_period
        } else {
            0.0
        }
    }

    /// Release damping coefficient for the current mode
    pub fn release_damping(&self, tornado: bool) -> f32 {
        if tornado {
            self.tornado_damping
        } else {
            self.damping + self.brake_on_release
        }
    }

    /// Reject values that would make the controller misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, f32); 13] = [
            ("max_accel_deg.pitch", self.max_accel_deg.x),
            ("max_accel_deg.yaw", self.max_accel_deg.y),
            ("max_accel_deg.roll", self.max_accel_deg.z),
            ("max_axis_velocity.pitch", self.max_axis_velocity.x),
            ("max_axis_velocity.yaw", self.max_axis_velocity.y),
            ("max_axis_velocity.roll", self.max_axis_velocity.z),
            ("global_max_velocity", self.global_max_velocity),
            ("damping", self.damping),
            ("tornado_damping", self.tornado_damping),
            ("brake_on_release", self.brake_on_release),
            ("input_exponent", self.input_exponent),
            ("free_roll_period", self.free_roll_period),
            ("dar_steer_share", self.table().dar_steer_share),
        ];
        for (field, value) in checks {
            if !value.is_finite() || value < 0.0 {
                log::error!("Rejecting tuning {field} = {value}");
                return Err(ConfigError::InvalidTuning { field, value });
            }
        }
        if self.input_exponent == 0.0 {
            return Err(ConfigError::InvalidTuning {
                field: "input_exponent",
                value: 0.0,
            });
        }
        if self.global_max_velocity == 0.0 {
            return Err(ConfigError::DegenerateDivision("global_max_velocity"));
        }
        Ok(())
    }
}

/// Persisted settings record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty key, validated on use
    pub difficulty: String,
    /// Best score per difficulty
    pub high_scores: HighScores,
    /// Controller tuning
    pub physics: PhysicsConfig,
    /// Stick deadzone in raw stick units
    pub deadzone: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal.key().to_string(),
            high_scores: HighScores::new(),
            physics: PhysicsConfig::default(),
            deadzone: 0.08,
        }
    }
}

impl Settings {
    /// Storage key (also the default file stem for the JSON store)
    pub const STORAGE_KEY: &'static str = "aerial_sim_settings";

    /// Parsed difficulty; an unknown key is an error, not a default
    pub fn difficulty(&self) -> Result<Difficulty, ConfigError> {
        Difficulty::from_key(&self.difficulty)
    }

    /// Change difficulty. Returns true when the stored key changed.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.difficulty == difficulty.key() {
            return false;
        }
        log::info!("Difficulty {} -> {}", self.difficulty, difficulty.key());
        self.difficulty = difficulty.key().to_string();
        true
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.difficulty()?;
        self.physics.validate()?;
        if !(0.0..1.0).contains(&self.deadzone) {
            return Err(ConfigError::InvalidTuning {
                field: "deadzone",
                value: self.deadzone,
            });
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Persistence backend owned by the settings collaborator
pub trait SettingsStore {
    /// Load the stored record, or defaults when nothing is stored yet
    fn load(&mut self) -> Result<Settings, SettingsError>;
    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError>;
}

/// In-memory store, used headless and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    json: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
            saves: 0,
        }
    }

    /// Number of write-backs seen so far
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SettingsStore for MemoryStore {
    fn load(&mut self) -> Result<Settings, SettingsError> {
        match &self.json {
            Some(json) => Settings::from_json(json),
            None => Ok(Settings::default()),
        }
    }

    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        self.json = Some(settings.to_json()?);
        self.saves += 1;
        Ok(())
    }
}

/// JSON file store for native builds
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&mut self) -> Result<Settings, SettingsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => {
                let settings = Settings::from_json(&json)?;
                log::info!("Loaded settings from {}", self.path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Ok(Settings::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        std::fs::write(&self.path, settings.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
