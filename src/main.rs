//! Aerial Sim headless entry point
//!
//! Replays a scripted input sequence through the simulator and logs a run
//! summary. Usage: `aerial-sim [seed] [difficulty] [settings.json]`

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use aerial_sim::consts::*;
use aerial_sim::flight::ControlFlags;
use aerial_sim::renderer::RingVisualCache;
use aerial_sim::settings::{JsonFileStore, MemoryStore, SettingsStore};
use aerial_sim::sim::{Difficulty, GameEvent, RunPhase};
use aerial_sim::{FrameInput, Simulator, Vehicle};

/// Scripted run length (seconds)
const RUN_SECONDS: f32 = 60.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Aerial Sim (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);
    let difficulty = args.next();
    let settings_path = args.next();

    let result = match settings_path {
        Some(path) => run(JsonFileStore::new(path), seed, difficulty.as_deref()),
        None => run(MemoryStore::new(), seed, difficulty.as_deref()),
    };
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

fn run<S: SettingsStore>(
    store: S,
    seed: u64,
    difficulty: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sim = Simulator::new(store, seed)?;
    if let Some(key) = difficulty {
        sim.set_difficulty(Difficulty::from_key(key)?)?;
    }
    sim.attach_vehicle(Vehicle::new(Vec3::new(84.0, 36.0, 118.0)));
    sim.start_ring_mode()?;

    let mut cache = RingVisualCache::new();
    let mut instance_bytes = 0usize;
    let steps = (RUN_SECONDS / SIM_DT) as u32;
    let mut passed = 0u32;
    let mut missed = 0u32;
    let mut bounds = 0u32;

    for step in 0..steps {
        let input = scripted_input(step, &sim);
        sim.step(&input, SIM_DT);

        let instances = cache.instances(sim.engine().rings());
        instance_bytes = instance_bytes.max(bytemuck::cast_slice::<_, u8>(&instances).len());

        for event in sim.drain_events() {
            match event {
                GameEvent::RingPassed { .. } => passed += 1,
                GameEvent::RingMissed { .. }
                | GameEvent::EdgeHit { .. }
                | GameEvent::UnobservedMiss { .. } => missed += 1,
                GameEvent::OutOfBounds => bounds += 1,
                GameEvent::PatternChanged { pattern } => log::debug!("Pattern {pattern:?}"),
                GameEvent::SectionChanged { theme } => log::info!("Section {theme:?}"),
                _ => {}
            }
        }
        if sim.engine().phase() == RunPhase::GameOver {
            log::info!("Game over after {:.1}s", step as f32 * SIM_DT);
            break;
        }
    }

    let view = sim.render_view();
    log::info!(
        "Summary: score {} (best {}), rings {}, passed {passed}, missed {missed}, out of bounds {bounds}, lives {}",
        view.score,
        view.high_score,
        view.ring_count,
        view.lives
    );
    log::info!(
        "Ring meshes built: {}, peak instance buffer {instance_bytes} bytes",
        cache.builds()
    );
    Ok(())
}

/// Steer toward the target ring with pitch/yaw and pulse boost, with an
/// occasional tornado spin
fn scripted_input<S: SettingsStore>(step: u32, sim: &Simulator<S>) -> FrameInput {
    let engine = sim.engine();
    let to_target = engine
        .target_ring()
        .map(|r| r.center() - engine.position())
        .unwrap_or(Vec2::ZERO);

    let forward = sim
        .vehicle()
        .map(|v| v.attitude.forward())
        .unwrap_or(Vec3::Z);
    // Aim the nose up and toward the target so boost lifts against gravity
    let wanted = (to_target / 300.0 + Vec2::new(0.0, 0.6)).clamp_length_max(1.0);
    let error = wanted - Vec2::new(forward.x, forward.y);
    // Yaw right turns the nose toward −X
    let stick = Vec2::new(-error.x, error.y).clamp_length_max(1.0);

    let t = step as f32 * SIM_DT;
    let spin = (t * TAU / 20.0).sin() > 0.95;
    FrameInput {
        stick,
        flags: ControlFlags {
            air_roll_right: spin,
            ..Default::default()
        },
        boost: step % 12 < 9,
    }
}
