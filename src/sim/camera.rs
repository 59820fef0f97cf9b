//! Camera aim point
//!
//! Weighted average of the next few unresolved rings, nearer rings counting
//! more, smoothed exponentially. The renderer only reads the result.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Ring;
use crate::consts::{CAMERA_DEPTH_FALLOFF, CAMERA_LOOKAHEAD, CAMERA_SMOOTHING};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    /// Smoothed point exposed to the renderer
    pub point: Vec2,
    /// Unsmoothed aim from this tick
    pub aim: Vec2,
}

impl CameraTarget {
    pub fn reset(&mut self, at: Vec2) {
        self.point = at;
        self.aim = at;
    }

    pub fn update(&mut self, rings: &[Ring], vehicle: Vec2, dt: f32) {
        self.aim = aim_point(rings).unwrap_or(vehicle);
        let blend = 1.0 - (-CAMERA_SMOOTHING * dt).exp();
        self.point += (self.aim - self.point) * blend;
    }
}

/// Weighted average of upcoming ring centers, `None` when nothing is ahead
pub fn aim_point(rings: &[Ring]) -> Option<Vec2> {
    let mut upcoming: Vec<&Ring> = rings
        .iter()
        .filter(|r| !r.is_resolved() && r.pos.z > 0.0)
        .collect();
    if upcoming.is_empty() {
        return None;
    }
    upcoming.sort_by(|a, b| a.pos.z.total_cmp(&b.pos.z));

    let mut sum = Vec2::ZERO;
    let mut total = 0.0;
    for (rank, ring) in upcoming.iter().take(CAMERA_LOOKAHEAD).enumerate() {
        // Rank falloff, and far rings damped by depth
        let weight = 1.0 / (1.0 + rank as f32) / (1.0 + ring.pos.z / CAMERA_DEPTH_FALLOFF);
        sum += ring.center() * weight;
        total += weight;
    }
    (total > 0.0).then(|| sum / total)
}
