//! Fixed timestep ring-run tick
//!
//! Order within a tick: boost gate, planar motion, bound check, spawning,
//! ring advance and crossing judgement, retirement, camera.

use glam::{Quat, Vec2};

use super::collision::{RingOutcome, classify_crossing, current_target, sort_by_priority};
use super::spawn::update_spawning;
use super::state::{GameEvent, RingRunState, RunPhase};
use crate::consts::*;
use crate::flight::BODY_FORWARD;
use crate::planar;

/// Input for a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    pub boost: bool,
    /// Vehicle attitude, already integrated for this frame
    pub orientation: Quat,
    /// Distance from vehicle center to nose along forward (collision point)
    pub nose_length: f32,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            boost: false,
            orientation: Quat::IDENTITY,
            nose_length: 0.0,
        }
    }
}

/// Advance the run by one timestep
pub fn tick(state: &mut RingRunState, input: &TickInput, dt: f32) {
    match state.phase {
        RunPhase::Idle | RunPhase::Paused | RunPhase::GameOver => return,
        RunPhase::Active | RunPhase::Running => {}
    }
    if !(dt > 0.0 && dt.is_finite()) {
        return;
    }
    state.time_ticks += 1;

    // Edge gate: after a respawn boost must be released before it counts
    if !input.boost {
        state.boost_armed = true;
    }
    let boosting = input.boost && state.boost_armed;

    if !state.started {
        if !boosting {
            state.camera.update(&state.rings, state.pos, dt);
            return;
        }
        state.started = true;
        state.phase = RunPhase::Running;
        state.events.push(GameEvent::Boosted);
    }

    let forward = planar(input.orientation * BODY_FORWARD);
    if step_motion(state, forward, boosting, dt) {
        respawn_from_bound(state);
        state.camera.update(&state.rings, state.pos, dt);
        return;
    }

    update_spawning(state, dt);

    let nose = state.pos + forward * input.nose_length;
    advance_rings(state, nose, dt);
    if state.phase != RunPhase::GameOver {
        retire_rings(state);
    }

    state.camera.update(&state.rings, state.pos, dt);
}

/// Integrate planar motion. Returns true when the vehicle reached a bound.
fn step_motion(state: &mut RingRunState, forward: Vec2, boosting: bool, dt: f32) -> bool {
    let mut accel = Vec2::new(0.0, -GRAVITY);
    if boosting {
        accel += forward * BOOST_ACCEL;
    }
    state.vel = (state.vel + accel * dt).clamp_length_max(MAX_PLANAR_SPEED);

    let bound = Vec2::splat(PLANE_HALF_EXTENT);
    state.pos = (state.pos + state.vel * dt).clamp(-bound, bound);
    state.pos.x.abs() >= PLANE_HALF_EXTENT || state.pos.y.abs() >= PLANE_HALF_EXTENT
}

/// Lose a life and put the vehicle back at the next ring, waiting for boost
fn respawn_from_bound(state: &mut RingRunState) {
    state.events.push(GameEvent::OutOfBounds);
    state.vel = Vec2::ZERO;
    state.pos = current_target(&state.rings)
        .map(|i| state.rings[i].center())
        .unwrap_or(Vec2::ZERO);
    state.started = false;
    state.boost_armed = false;
    log::debug!("Out of bounds, respawning at {}", state.pos);

    state.lose_life();
    if state.phase != RunPhase::GameOver {
        state.phase = RunPhase::Active;
    }
}

/// Move rings along the travel axis and judge those crossing the plane
fn advance_rings(state: &mut RingRunState, nose: Vec2, dt: f32) {
    let mut crossing = Vec::new();
    for (i, ring) in state.rings.iter_mut().enumerate() {
        let previous = ring.pos.z;
        ring.pos.z -= ring.speed * dt;
        if previous > 0.0 && ring.pos.z <= 0.0 && !ring.is_resolved() {
            crossing.push(i);
        }
    }
    sort_by_priority(&state.rings, &mut crossing);

    for i in crossing {
        // A run that ended mid-tick judges nothing further
        if state.phase == RunPhase::GameOver {
            break;
        }
        judge_ring(state, i, nose);
    }
}

fn judge_ring(state: &mut RingRunState, index: usize, nose: Vec2) {
    let ring = &state.rings[index];
    let (id, bonus) = (ring.id, ring.bonus);
    let outcome = classify_crossing(nose, ring.center(), ring.size, RING_TUBE_RADIUS);
    log::debug!("Ring {id} -> {outcome:?}");

    match outcome {
        RingOutcome::Pass => {
            state.rings[index].passed = true;
            state.events.push(GameEvent::RingPassed { ring: id, bonus });
            state.add_score(1);
            if bonus {
                state.gain_life();
            }
        }
        RingOutcome::EdgeHit => {
            state.rings[index].missed = true;
            state.events.push(GameEvent::EdgeHit { ring: id });
            state.lose_life();
        }
        RingOutcome::Miss => {
            state.rings[index].missed = true;
            state.events.push(GameEvent::RingMissed { ring: id });
            state.lose_life();
        }
    }
}

/// Drop rings past the retirement depth; unjudged ones count as misses
fn retire_rings(state: &mut RingRunState) {
    let mut unobserved = Vec::new();
    state.rings.retain(|r| {
        if r.pos.z >= -RETIRE_DISTANCE {
            return true;
        }
        if !r.is_resolved() {
            unobserved.push(r.id);
        }
        false
    });
    for ring in unobserved {
        if state.phase == RunPhase::GameOver {
            break;
        }
        log::debug!("Ring {ring} retired without a crossing, counting as a miss");
        state.events.push(GameEvent::UnobservedMiss { ring });
        state.lose_life();
    }
}
