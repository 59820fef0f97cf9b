//! Ring-run lifecycle
//!
//! Wraps [`RingRunState`] with start/stop/reset/retry and pause handling.
//! The frame driver owns one of these and ticks it after the controller.

use glam::Vec2;

use super::camera::CameraTarget;
use super::collision::current_target;
use super::difficulty::Difficulty;
use super::state::{GameEvent, Ring, RingRunState, RunPhase};
use super::tick::{TickInput, tick};
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct RingEngine {
    state: RingRunState,
}

impl RingEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            state: RingRunState::new(seed, Difficulty::default()),
        }
    }

    /// Start a run for a stored difficulty key
    pub fn start(&mut self, difficulty_key: &str, high_score: u64) -> Result<(), ConfigError> {
        let difficulty = Difficulty::from_key(difficulty_key)?;
        self.start_with(difficulty, high_score);
        Ok(())
    }

    /// Start a fresh run. The RNG restarts from the engine seed, so two runs
    /// with the same inputs produce the same rings.
    pub fn start_with(&mut self, difficulty: Difficulty, high_score: u64) {
        let mut state = RingRunState::new(self.state.seed, difficulty);
        state.high_score = high_score;
        state.phase = RunPhase::Active;
        state.events.push(GameEvent::RunStarted { difficulty });
        self.state = state;
        log::info!(
            "Ring run started ({}, seed {}, best {high_score})",
            difficulty.key(),
            self.state.seed
        );
    }

    /// Leave ring mode: clear rings and motion, keep score for display
    pub fn stop(&mut self) {
        let state = &mut self.state;
        state.rings.clear();
        state.vel = Vec2::ZERO;
        state.pos = Vec2::ZERO;
        state.started = false;
        state.boost_armed = true;
        state.paused_from = None;
        state.phase = RunPhase::Idle;
        state.camera.reset(Vec2::ZERO);
        log::info!("Ring run stopped at score {}", state.score);
    }

    /// Back to initial values, idle, same seed and difficulty
    pub fn reset(&mut self) {
        let high_score = self.state.high_score;
        self.state = RingRunState::new(self.state.seed, self.state.difficulty);
        self.state.high_score = high_score;
        log::debug!("Ring run reset");
    }

    /// Restart with the current difficulty after game over
    pub fn retry(&mut self) {
        let difficulty = self.state.difficulty;
        let high_score = self.state.high_score;
        self.start_with(difficulty, high_score);
    }

    /// Use a new seed for subsequent runs
    pub fn reseed(&mut self, seed: u64) {
        self.state.seed = seed;
    }

    /// Pause or resume. Only affects active runs.
    pub fn set_paused(&mut self, paused: bool) {
        let state = &mut self.state;
        match (paused, state.phase) {
            (true, RunPhase::Active | RunPhase::Running) => {
                state.paused_from = Some(state.phase);
                state.phase = RunPhase::Paused;
                log::debug!("Ring run paused");
            }
            (false, RunPhase::Paused) => {
                state.phase = state.paused_from.take().unwrap_or(RunPhase::Active);
                log::debug!("Ring run resumed");
            }
            _ => {}
        }
    }

    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        tick(&mut self.state, input, dt);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn state(&self) -> &RingRunState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut RingRunState {
        &mut self.state
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.state.difficulty
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn started(&self) -> bool {
        self.state.started
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn high_score(&self) -> u64 {
        self.state.high_score
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }

    pub fn ring_count(&self) -> u32 {
        self.state.ring_count
    }

    pub fn rings(&self) -> &[Ring] {
        &self.state.rings
    }

    pub fn position(&self) -> Vec2 {
        self.state.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.state.vel
    }

    pub fn camera(&self) -> &CameraTarget {
        &self.state.camera
    }

    /// The ring the player should fly through next
    pub fn target_ring(&self) -> Option<&Ring> {
        current_target(&self.state.rings).map(|i| &self.state.rings[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use glam::Quat;

    fn boost() -> TickInput {
        TickInput {
            boost: true,
            orientation: Quat::from_rotation_x(-(GRAVITY / BOOST_ACCEL).asin()),
            nose_length: 0.0,
        }
    }

    #[test]
    fn test_start_unknown_key_fails() {
        let mut engine = RingEngine::new(1);
        let err = engine.start("nightmare", 0).unwrap_err();
        assert_eq!(err, ConfigError::UnknownDifficulty("nightmare".into()));
        assert_eq!(engine.phase(), RunPhase::Idle);
    }

    #[test]
    fn test_start_emits_event() {
        let mut engine = RingEngine::new(1);
        engine.start("Hard", 12).unwrap();
        assert_eq!(engine.phase(), RunPhase::Active);
        assert_eq!(engine.difficulty(), Difficulty::Hard);
        assert_eq!(engine.high_score(), 12);
        assert_eq!(
            engine.drain_events(),
            vec![GameEvent::RunStarted { difficulty: Difficulty::Hard }]
        );
    }

    #[test]
    fn test_pause_freezes_and_resumes_phase() {
        let mut engine = RingEngine::new(1);
        engine.start_with(Difficulty::Normal, 0);
        engine.tick(&boost(), SIM_DT);
        assert_eq!(engine.phase(), RunPhase::Running);

        engine.set_paused(true);
        let snapshot = engine.state().clone();
        for _ in 0..50 {
            engine.tick(&boost(), SIM_DT);
        }
        assert_eq!(engine.rings(), snapshot.rings.as_slice());
        assert_eq!(engine.position(), snapshot.pos);
        assert_eq!(engine.state().time_ticks, snapshot.time_ticks);

        engine.set_paused(false);
        assert_eq!(engine.phase(), RunPhase::Running);
    }

    #[test]
    fn test_pause_ignored_when_idle() {
        let mut engine = RingEngine::new(1);
        engine.set_paused(true);
        assert_eq!(engine.phase(), RunPhase::Idle);
    }

    #[test]
    fn test_stop_clears_rings_and_motion() {
        let mut engine = RingEngine::new(1);
        engine.start_with(Difficulty::Normal, 0);
        for _ in 0..200 {
            engine.tick(&boost(), SIM_DT);
        }
        assert!(!engine.rings().is_empty());
        engine.stop();
        assert!(engine.rings().is_empty());
        assert_eq!(engine.velocity(), Vec2::ZERO);
        assert_eq!(engine.phase(), RunPhase::Idle);
        assert!(!engine.is_active());
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut engine = RingEngine::new(1);
        engine.start_with(Difficulty::Easy, 40);
        engine.state_mut().score = 9;
        engine.state_mut().lives = 1;
        engine.reset();
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.lives(), START_LIVES);
        assert_eq!(engine.phase(), RunPhase::Idle);
        assert_eq!(engine.difficulty(), Difficulty::Easy);
        assert_eq!(engine.high_score(), 40);
    }

    #[test]
    fn test_retry_after_game_over() {
        let mut engine = RingEngine::new(1);
        engine.start_with(Difficulty::Normal, 0);
        engine.state_mut().lives = 1;
        engine.state_mut().lose_life();
        assert_eq!(engine.phase(), RunPhase::GameOver);
        engine.retry();
        assert_eq!(engine.phase(), RunPhase::Active);
        assert_eq!(engine.lives(), START_LIVES);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed| {
            let mut engine = RingEngine::new(seed);
            engine.start_with(Difficulty::Extreme, 0);
            for _ in 0..1200 {
                engine.tick(&boost(), SIM_DT);
            }
            engine.rings().to_vec()
        };
        let a = run(77);
        assert!(!a.is_empty());
        assert_eq!(a, run(77));
    }

    #[test]
    fn test_retry_replays_same_rings() {
        let mut engine = RingEngine::new(5);
        engine.start_with(Difficulty::Normal, 0);
        for _ in 0..600 {
            engine.tick(&boost(), SIM_DT);
        }
        let first = engine.rings().to_vec();
        engine.retry();
        for _ in 0..600 {
            engine.tick(&boost(), SIM_DT);
        }
        assert_eq!(first, engine.rings());
    }

    #[test]
    fn test_target_ring_is_oldest_unresolved() {
        let mut engine = RingEngine::new(1);
        engine.start_with(Difficulty::Normal, 0);
        assert!(engine.target_ring().is_none());
        for _ in 0..200 {
            engine.tick(&boost(), SIM_DT);
        }
        let target = engine.target_ring().map(|r| r.id);
        assert_eq!(target, Some(0));
    }
}
