//! Ring spawning
//!
//! Spawns on a timer, gated by minimum spacing along the travel axis. Rings
//! shrink and speed up with ring count. Spawn speed is compensated by the
//! distance from the vehicle, except for bonus rings.

use glam::{Vec2, Vec3};

use super::state::{BONUS_RING_COLOR, GameEvent, RING_COLOR_COUNT, Ring, RingRunState};
use crate::consts::*;
use crate::lerp;

/// Ring diameter after `ring_count` spawns
pub fn ring_size(ring_count: u32, size_mult: f32) -> f32 {
    (RING_BASE_SIZE - ring_count as f32 * RING_SIZE_STEP).max(RING_MIN_SIZE) * size_mult
}

/// Base travel speed after `ring_count` spawns
pub fn ring_speed(ring_count: u32, speed_mult: f32) -> f32 {
    (RING_BASE_SPEED + ring_count as f32 * RING_SPEED_STEP).min(RING_MAX_SPEED) * speed_mult
}

/// Speed factor for a ring spawned `distance` from the vehicle.
///
/// Very close rings are slowed a little, far rings more, ramping toward the
/// max spawn radius.
pub fn distance_compensation(distance: f32) -> f32 {
    if distance < NEAR_COMPENSATION_DISTANCE {
        lerp(NEAR_SPEED_FACTOR, 1.0, distance / NEAR_COMPENSATION_DISTANCE)
    } else if distance <= FAR_COMPENSATION_DISTANCE {
        1.0
    } else {
        let span = MAX_SPAWN_RADIUS - FAR_COMPENSATION_DISTANCE;
        let t = ((distance - FAR_COMPENSATION_DISTANCE) / span).clamp(0.0, 1.0);
        lerp(1.0, FAR_SPEED_FACTOR, t)
    }
}

/// Keep a pattern point within reach of the vehicle and inside the plane
pub fn clamp_spawn_point(point: Vec2, vehicle: Vec2, ring_radius: f32) -> Vec2 {
    let limit = (PLANE_HALF_EXTENT - ring_radius).max(0.0);
    let point = point.clamp(Vec2::splat(-limit), Vec2::splat(limit));
    let offset = point - vehicle;
    if offset.length() > MAX_SPAWN_RADIUS {
        vehicle + offset.normalize_or_zero() * MAX_SPAWN_RADIUS
    } else {
        point
    }
}

/// Whether the newest ring has moved far enough from the spawn depth
pub fn spacing_clear(rings: &[Ring]) -> bool {
    rings
        .iter()
        .all(|r| r.pos.z <= SPAWN_DISTANCE - MIN_RING_SPACING)
}

/// Count down the spawn timer and spawn when due
pub fn update_spawning(state: &mut RingRunState, dt: f32) {
    state.spawn_timer -= dt;
    if state.spawn_timer > 0.0 || !spacing_clear(&state.rings) {
        return;
    }
    spawn_ring(state);
    let interval = state.difficulty.params().spawn_interval * state.generator.multipliers().spawn_interval;
    state.spawn_timer = interval;
}

/// Spawn the next ring from the pattern generator
pub fn spawn_ring(state: &mut RingRunState) {
    let difficulty = state.difficulty;
    let params = difficulty.params();
    let count = state.ring_count;

    let step = state.generator.next_point(count, difficulty, &mut state.rng);
    if let Some(theme) = step.new_section {
        state.events.push(GameEvent::SectionChanged { theme });
    }
    if let Some(pattern) = step.new_pattern {
        state.events.push(GameEvent::PatternChanged { pattern });
    }
    let mult = state.generator.multipliers();

    let size = ring_size(count, params.size_mult);
    let center = clamp_spawn_point(step.point, state.pos, size * 0.5);
    let distance = center.distance(state.pos);

    let base_speed = ring_speed(count, params.speed_mult * mult.speed);
    let bonus = distance > BONUS_DISTANCE;
    let speed = if bonus {
        base_speed
    } else {
        base_speed * distance_compensation(distance)
    };
    let color = if bonus {
        BONUS_RING_COLOR
    } else {
        (count % RING_COLOR_COUNT as u32) as u8
    };

    state.rings.push(Ring {
        id: count,
        pos: Vec3::new(center.x, center.y, SPAWN_DISTANCE),
        size,
        speed,
        color,
        passed: false,
        missed: false,
        bonus,
    });
    state.ring_count += 1;
    log::trace!("Spawned ring {count} at {center} (speed {speed:.0}, bonus {bonus})");
}
