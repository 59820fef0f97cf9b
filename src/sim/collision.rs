//! Ring crossing classification
//!
//! A ring is judged once, on the tick its center crosses the vehicle plane.
//! Classification depends only on the in-plane distance between the
//! vehicle and the ring center and on the ring's inner/outer radii.

use std::cmp::Ordering;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Ring;

/// Outcome of a ring crossing the plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RingOutcome {
    /// Through the hole
    Pass,
    /// Clipped the tube
    EdgeHit,
    /// Outside the ring entirely
    Miss,
}

/// Classify a crossing.
///
/// `size` is the ring diameter to the tube centerline; inner and outer radii
/// are `size/2 ∓ tube_radius`.
pub fn classify_crossing(vehicle: Vec2, ring_center: Vec2, size: f32, tube_radius: f32) -> RingOutcome {
    let distance = vehicle.distance(ring_center);
    let inner = size * 0.5 - tube_radius;
    let outer = size * 0.5 + tube_radius;
    if distance <= inner {
        RingOutcome::Pass
    } else if distance < outer {
        RingOutcome::EdgeHit
    } else {
        RingOutcome::Miss
    }
}

/// Priority order: oldest first, then nearest to the plane
fn priority(a: &Ring, b: &Ring) -> Ordering {
    a.id
        .cmp(&b.id)
        .then_with(|| a.pos.z.abs().total_cmp(&b.pos.z.abs()))
}

/// Index of the single ring currently targeted (oldest unresolved)
pub fn current_target(rings: &[Ring]) -> Option<usize> {
    rings
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_resolved())
        .min_by(|(_, a), (_, b)| priority(a, b))
        .map(|(i, _)| i)
}

/// Order crossing ring indices so the current target is judged first
pub fn sort_by_priority(rings: &[Ring], indices: &mut [usize]) {
    indices.sort_by(|&a, &b| priority(&rings[a], &rings[b]));
}
