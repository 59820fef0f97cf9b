//! Aerial Sim - orientation control and ring-run core
//!
//! Core modules:
//! - `flight`: Orientation controller (stick shaping, PD control, damping, attitude)
//! - `sim`: Deterministic ring-run engine (movement, patterns, spawning, scoring)
//! - `renderer`: Ring visual cache and GPU-ready instance data
//! - `frame`: Per-frame driver enforcing controller-before-engine ordering
//! - `tuning`: Versioned control tuning tables
//! - `settings`: Persisted difficulty, high score and physics tuning

pub mod error;
pub mod flight;
pub mod frame;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, SettingsError};
pub use frame::{FrameInput, FrameOutcome, ModeState, RenderView, Simulator, Vehicle};
pub use highscores::HighScores;
pub use settings::{PhysicsConfig, Settings};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Max fixed steps per rendered frame (prevents spiral of death)
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame time accepted by the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Half-extent of the square movement plane (world units)
    pub const PLANE_HALF_EXTENT: f32 = 600.0;
    /// Downward planar acceleration once a run has started (units/s²)
    pub const GRAVITY: f32 = 650.0;
    /// Boost acceleration along the planar forward vector (units/s²)
    pub const BOOST_ACCEL: f32 = 1400.0;
    /// Planar speed cap (units/s)
    pub const MAX_PLANAR_SPEED: f32 = 900.0;

    /// Starting lives
    pub const START_LIVES: u8 = 3;
    /// Extra lives from bonus rings never push past this
    pub const MAX_LIVES: u8 = 5;

    /// Ring defaults (diameter and torus half-thickness)
    pub const RING_BASE_SIZE: f32 = 260.0;
    pub const RING_MIN_SIZE: f32 = 150.0;
    pub const RING_SIZE_STEP: f32 = 1.2;
    pub const RING_TUBE_RADIUS: f32 = 12.0;

    /// Ring travel speed along the travel axis (units/s)
    pub const RING_BASE_SPEED: f32 = 900.0;
    pub const RING_MAX_SPEED: f32 = 1800.0;
    pub const RING_SPEED_STEP: f32 = 6.0;

    /// Spawn depth along the travel axis, and retirement depth behind the plane
    pub const SPAWN_DISTANCE: f32 = 3000.0;
    pub const RETIRE_DISTANCE: f32 = 250.0;
    /// Minimum gap between consecutive rings along the travel axis
    pub const MIN_RING_SPACING: f32 = 450.0;

    /// Spawn positions never land farther than this from the vehicle
    pub const MAX_SPAWN_RADIUS: f32 = 520.0;
    /// Rings spawned beyond this distance from the vehicle are bonus rings
    pub const BONUS_DISTANCE: f32 = 430.0;
    /// Below this distance rings are slowed for fairness
    pub const NEAR_COMPENSATION_DISTANCE: f32 = 90.0;
    /// Above this distance (and below the bonus threshold) rings are slowed
    pub const FAR_COMPENSATION_DISTANCE: f32 = 300.0;
    pub const NEAR_SPEED_FACTOR: f32 = 0.85;
    pub const FAR_SPEED_FACTOR: f32 = 0.7;

    /// Camera target: number of upcoming rings considered and smoothing rate
    pub const CAMERA_LOOKAHEAD: usize = 4;
    pub const CAMERA_SMOOTHING: f32 = 4.0;
    /// Depth at which a ring's camera weight has halved
    pub const CAMERA_DEPTH_FALLOFF: f32 = 1500.0;
}

/// Project a 3D vector onto the movement plane (drops the travel axis)
#[inline]
pub fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
