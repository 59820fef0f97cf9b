//! Ring-run state and entity types
//!
//! Everything the engine mutates lives here. The plane is the vehicle's
//! locked z = 0 slice; rings travel toward it along −Z.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::CameraTarget;
use super::difficulty::Difficulty;
use super::pattern::{PatternGenerator, PatternKind, SectionTheme};
use crate::consts::*;

/// Distinct ring colors in the rotating palette
pub const RING_COLOR_COUNT: u8 = 6;
/// Color index reserved for bonus rings
pub const BONUS_RING_COLOR: u8 = RING_COLOR_COUNT;

/// Run lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run
    Idle,
    /// Run created, waiting for the first boost press
    Active,
    /// Gravity and boost apply, rings advance
    Running,
    Paused,
    /// Lives exhausted
    GameOver,
}

/// Feedback for audio/HUD collaborators, drained every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { difficulty: Difficulty },
    /// First boost after start or respawn
    Boosted,
    RingPassed { ring: u32, bonus: bool },
    /// Vehicle clipped the ring's tube
    EdgeHit { ring: u32 },
    RingMissed { ring: u32 },
    /// Ring retired without ever being classified
    UnobservedMiss { ring: u32 },
    LifeLost { lives: u8 },
    ExtraLife { lives: u8 },
    OutOfBounds,
    HighScore { score: u64 },
    PatternChanged { pattern: PatternKind },
    SectionChanged { theme: SectionTheme },
    GameOver { score: u64 },
}

/// A torus ring travelling toward the plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    /// Spawn index, unique within a run
    pub id: u32,
    pub pos: Vec3,
    /// Diameter to the tube centerline
    pub size: f32,
    /// Travel speed along −Z (units/s)
    pub speed: f32,
    pub color: u8,
    pub passed: bool,
    pub missed: bool,
    pub bonus: bool,
}

impl Ring {
    #[inline]
    pub fn center(&self) -> Vec2 {
        crate::planar(self.pos)
    }

    #[inline]
    pub fn inner_radius(&self) -> f32 {
        self.size * 0.5 - RING_TUBE_RADIUS
    }

    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.size * 0.5 + RING_TUBE_RADIUS
    }

    /// Classified as passed or missed
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.passed || self.missed
    }
}

/// Complete ring-run state
#[derive(Debug, Clone)]
pub struct RingRunState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub difficulty: Difficulty,
    pub phase: RunPhase,
    /// Phase to resume into after a pause
    pub paused_from: Option<RunPhase>,
    /// Gravity applies once the first boost lands
    pub started: bool,
    /// Boost must be released once before it counts again
    pub boost_armed: bool,
    pub score: u64,
    /// Stored best for this difficulty
    pub high_score: u64,
    pub lives: u8,
    /// Rings spawned this run
    pub ring_count: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rings: Vec<Ring>,
    pub generator: PatternGenerator,
    /// Seconds until the next spawn is due
    pub spawn_timer: f32,
    pub camera: CameraTarget,
    pub events: Vec<GameEvent>,
    pub time_ticks: u64,
}

impl RingRunState {
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            phase: RunPhase::Idle,
            paused_from: None,
            started: false,
            boost_armed: true,
            score: 0,
            high_score: 0,
            lives: START_LIVES,
            ring_count: 0,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            rings: Vec::new(),
            generator: PatternGenerator::new(),
            spawn_timer: 0.0,
            camera: CameraTarget::default(),
            events: Vec::new(),
            time_ticks: 0,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase == RunPhase::Paused
    }

    /// Vehicle is in an active run (started or waiting for boost)
    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            RunPhase::Active | RunPhase::Running | RunPhase::Paused
        )
    }

    /// Award points; returns true when the stored best was beaten
    pub fn add_score(&mut self, points: u64) -> bool {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::HighScore { score: self.score });
            return true;
        }
        false
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost { lives: self.lives });
        if self.lives == 0 && self.phase != RunPhase::GameOver {
            self.phase = RunPhase::GameOver;
            self.paused_from = None;
            self.events.push(GameEvent::GameOver { score: self.score });
            log::info!(
                "Game over: score {} after {} rings ({})",
                self.score,
                self.ring_count,
                self.difficulty.key()
            );
        }
    }

    pub fn gain_life(&mut self) {
        if self.lives < MAX_LIVES {
            self.lives += 1;
            self.events.push(GameEvent::ExtraLife { lives: self.lives });
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
