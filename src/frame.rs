//! Per-frame driver
//!
//! Owns the vehicle, the orientation controller and the ring engine, and
//! steps them in a fixed order: controller first, then the engine reading
//! the freshly integrated attitude. Pausing short-circuits both.

use glam::{Quat, Vec2, Vec3};

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::error::{ConfigError, SettingsError};
use crate::flight::{Attitude, AxisLocks, ControlFlags, ControlInput, ControlMode, ControlReport, OrientationController};
use crate::settings::{Settings, SettingsStore};
use crate::sim::{CameraTarget, Difficulty, GameEvent, Ring, RingEngine, RunPhase, TickInput};

/// The controlled body, supplied by the scene collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub attitude: Attitude,
    /// World position; x/y follow the ring run, z stays on the plane
    pub position: Vec3,
    /// Bounding box (width, height, length)
    pub dimensions: Vec3,
}

impl Vehicle {
    pub fn new(dimensions: Vec3) -> Self {
        Self {
            attitude: Attitude::default(),
            position: Vec3::ZERO,
            dimensions,
        }
    }

    /// Center to nose along forward, used as the ring collision point
    pub fn nose_length(&self) -> f32 {
        self.dimensions.z * 0.5
    }
}

/// UI-owned mode flags injected into the driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeState {
    pub ring_mode: bool,
    pub paused: bool,
    pub menu_open: bool,
}

/// Normalized input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub stick: Vec2,
    pub flags: ControlFlags,
    pub boost: bool,
}

/// What happened on a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// No vehicle attached
    Skipped,
    /// Pause, menu or game over
    Paused,
    Stepped(ControlReport),
}

/// Read-only snapshot for the rendering/HUD collaborator
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub angular_velocity: Vec3,
    pub mode: ControlMode,
    pub attitude: Option<Quat>,
    pub rings: &'a [Ring],
    pub score: u64,
    pub high_score: u64,
    pub lives: u8,
    pub ring_count: u32,
    pub camera: CameraTarget,
    pub phase: RunPhase,
    pub started: bool,
    pub paused: bool,
}

pub struct Simulator<S: SettingsStore> {
    vehicle: Option<Vehicle>,
    controller: OrientationController,
    engine: RingEngine,
    store: S,
    settings: Settings,
    modes: ModeState,
    events: Vec<GameEvent>,
    accumulator: f32,
    /// Missing vehicle already reported
    warned_missing: bool,
}

impl<S: SettingsStore> Simulator<S> {
    /// Load settings from `store` and build an idle simulator
    pub fn new(mut store: S, seed: u64) -> Result<Self, SettingsError> {
        let settings = store.load()?;
        log::info!(
            "Simulator ready (difficulty {}, tuning {:?}, seed {seed})",
            settings.difficulty,
            settings.physics.tuning
        );
        Ok(Self {
            vehicle: None,
            controller: OrientationController::new(),
            engine: RingEngine::new(seed),
            store,
            settings,
            modes: ModeState::default(),
            events: Vec::new(),
            accumulator: 0.0,
            warned_missing: false,
        })
    }

    pub fn attach_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicle = Some(vehicle);
        self.warned_missing = false;
    }

    pub fn detach_vehicle(&mut self) -> Option<Vehicle> {
        self.vehicle.take()
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        self.vehicle.as_ref()
    }

    pub fn controller(&self) -> &OrientationController {
        &self.controller
    }

    pub fn engine(&self) -> &RingEngine {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings edits take effect on the next step; nothing is written back
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn modes(&self) -> ModeState {
        self.modes
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_locks(&mut self, locks: AxisLocks) {
        self.controller.set_locks(locks);
    }

    /// Enter ring mode with the stored difficulty and its best score.
    /// Angular velocity and attitude carry over into the run.
    pub fn start_ring_mode(&mut self) -> Result<(), ConfigError> {
        let difficulty = self.settings.difficulty()?;
        let best = self.settings.high_scores.best(difficulty);
        self.engine.start_with(difficulty, best);
        self.modes.ring_mode = true;
        self.sync_vehicle_position();
        Ok(())
    }

    pub fn stop_ring_mode(&mut self) {
        self.engine.stop();
        self.modes.ring_mode = false;
    }

    /// Restart the run after game over
    pub fn retry(&mut self) {
        self.engine.retry();
        self.respawn();
    }

    /// Change and persist the difficulty. A running ring run restarts with it.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), SettingsError> {
        if !self.settings.set_difficulty(difficulty) {
            return Ok(());
        }
        self.store.save(&self.settings)?;
        if self.modes.ring_mode {
            let best = self.settings.high_scores.best(difficulty);
            self.engine.start_with(difficulty, best);
            self.sync_vehicle_position();
        }
        Ok(())
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.modes.paused = paused;
        self.sync_engine_pause();
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.modes.paused);
    }

    pub fn set_menu_open(&mut self, open: bool) {
        self.modes.menu_open = open;
        self.sync_engine_pause();
    }

    fn sync_engine_pause(&mut self) {
        self.engine.set_paused(self.modes.paused || self.modes.menu_open);
    }

    fn halted(&self) -> bool {
        self.modes.paused
            || self.modes.menu_open
            || (self.modes.ring_mode && self.engine.phase() == RunPhase::GameOver)
    }

    /// Zero angular velocity, restore the default attitude and place the
    /// vehicle at the engine's position
    pub fn respawn(&mut self) {
        self.controller.zero();
        if let Some(vehicle) = self.vehicle.as_mut() {
            vehicle.attitude.reset();
        }
        self.sync_vehicle_position();
    }

    fn sync_vehicle_position(&mut self) {
        let pos = self.engine.position();
        if let Some(vehicle) = self.vehicle.as_mut() {
            vehicle.position = Vec3::new(pos.x, pos.y, 0.0);
        }
    }

    /// Zero angular velocity and return the ring run to idle
    pub fn reset(&mut self) {
        self.controller.zero();
        self.engine.reset();
        self.modes.ring_mode = false;
        self.accumulator = 0.0;
        log::info!("Simulator reset");
    }

    /// Accumulate a variable frame time and run whole fixed steps
    pub fn advance(&mut self, input: &FrameInput, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// One tick: controller, then engine
    pub fn step(&mut self, input: &FrameInput, dt: f32) -> FrameOutcome {
        if self.halted() {
            return FrameOutcome::Paused;
        }
        let Some(vehicle) = self.vehicle.as_mut() else {
            if !self.warned_missing {
                log::warn!("No vehicle attached, skipping frames until one is");
                self.warned_missing = true;
            }
            return FrameOutcome::Skipped;
        };

        let control = ControlInput {
            stick: input.stick,
            flags: input.flags,
            deadzone: self.settings.deadzone,
        };
        let report = self
            .controller
            .tick(&mut vehicle.attitude, &control, &self.settings.physics, dt);

        if self.modes.ring_mode {
            let tick_input = TickInput {
                boost: input.boost,
                orientation: vehicle.attitude.rotation(),
                nose_length: vehicle.nose_length(),
            };
            self.engine.tick(&tick_input, dt);
            self.sync_vehicle_position();
            self.collect_events();
        }

        FrameOutcome::Stepped(report)
    }

    fn collect_events(&mut self) {
        for event in self.engine.drain_events() {
            match event {
                GameEvent::HighScore { score } => self.record_high_score(score),
                GameEvent::OutOfBounds => self.respawn(),
                GameEvent::GameOver { score } => {
                    log::info!("Run over with {score} points");
                }
                _ => {}
            }
            self.events.push(event);
        }
    }

    fn record_high_score(&mut self, score: u64) {
        let difficulty = self.engine.difficulty();
        let rings = self.engine.ring_count();
        if !self.settings.high_scores.submit(difficulty, score, rings) {
            return;
        }
        log::info!("New high score {score} on {}", difficulty.key());
        if let Err(e) = self.store.save(&self.settings) {
            log::error!("Failed to save high score: {e}");
        }
    }

    /// Take all events gathered since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn render_view(&self) -> RenderView<'_> {
        RenderView {
            angular_velocity: self.controller.angular_velocity(),
            mode: self.controller.mode(),
            attitude: self.vehicle.as_ref().map(|v| v.attitude.rotation()),
            rings: self.engine.rings(),
            score: self.engine.score(),
            high_score: self.engine.high_score(),
            lives: self.engine.lives(),
            ring_count: self.engine.ring_count(),
            camera: *self.engine.camera(),
            phase: self.engine.phase(),
            started: self.engine.started(),
            paused: self.modes.paused || self.modes.menu_open,
        }
    }
}
