//! Ring-run simulation
//!
//! All gameplay logic for the ring run lives here. This module must be pure
//! and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable judgement order (by ring ID)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod difficulty;
pub mod engine;
pub mod pattern;
pub mod spawn;
pub mod state;
pub mod tick;

pub use camera::CameraTarget;
pub use collision::{RingOutcome, classify_crossing, current_target};
pub use difficulty::{Difficulty, DifficultyParams};
pub use engine::RingEngine;
pub use pattern::{PatternGenerator, PatternKind, SectionTheme};
pub use state::{BONUS_RING_COLOR, GameEvent, RING_COLOR_COUNT, Ring, RingRunState, RunPhase};
pub use tick::{TickInput, tick};
