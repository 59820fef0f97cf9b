//! Vehicle attitude
//!
//! Body axes: forward = +Z (toward oncoming rings), up = +Y, right = −X.
//! Rates are (pitch, yaw, roll) with positive pitch raising the nose,
//! positive yaw turning it right and positive roll dropping the right wing.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

pub const BODY_FORWARD: Vec3 = Vec3::Z;
pub const BODY_UP: Vec3 = Vec3::Y;
pub const BODY_RIGHT: Vec3 = Vec3::NEG_X;

/// Map (pitch, yaw, roll) rates onto a body-frame angular velocity vector
#[inline]
pub fn body_rate_vector(rates: Vec3) -> Vec3 {
    BODY_RIGHT * rates.x - BODY_UP * rates.y + BODY_FORWARD * rates.z
}

/// Unit quaternion attitude, mutated only by integration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attitude {
    rotation: Quat,
}

impl Default for Attitude {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
        }
    }
}

impl Attitude {
    pub fn from_rotation(rotation: Quat) -> Self {
        let mut attitude = Self { rotation };
        attitude.renormalize();
        attitude
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn reset(&mut self) {
        self.rotation = Quat::IDENTITY;
    }

    /// First-order integration `q += ½·dt·ω⊗q` with ω in world space,
    /// followed by renormalization.
    pub fn integrate(&mut self, rates: Vec3, dt: f32) {
        let omega_world = self.rotation * body_rate_vector(rates);
        let omega = Quat::from_xyzw(omega_world.x, omega_world.y, omega_world.z, 0.0);
        let dq = omega * self.rotation * (0.5 * dt);
        self.rotation = self.rotation + dq;
        self.renormalize();
    }

    fn renormalize(&mut self) {
        let length = self.rotation.length();
        if length.is_finite() && length > f32::EPSILON {
            self.rotation = self.rotation * (1.0 / length);
        } else {
            log::warn!("Degenerate attitude quaternion {:?}, resetting", self.rotation);
            self.rotation = Quat::IDENTITY;
        }
    }

    /// World-space unit forward vector
    pub fn forward(&self) -> Vec3 {
        (self.rotation * BODY_FORWARD).normalize_or_zero()
    }

    pub fn up(&self) -> Vec3 {
        (self.rotation * BODY_UP).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn spin(rates: Vec3, seconds: f32) -> Attitude {
        let mut attitude = Attitude::default();
        let steps = (seconds / SIM_DT).round() as usize;
        for _ in 0..steps {
            attitude.integrate(rates, SIM_DT);
        }
        attitude
    }

    #[test]
    fn test_identity_faces_forward() {
        assert_eq!(Attitude::default().forward(), BODY_FORWARD);
    }

    #[test]
    fn test_positive_pitch_raises_nose() {
        let a = spin(Vec3::new(1.0, 0.0, 0.0), 0.25);
        assert!(a.forward().y > 0.2);
    }

    #[test]
    fn test_positive_yaw_turns_right() {
        let a = spin(Vec3::new(0.0, 1.0, 0.0), 0.25);
        // Right is −X
        assert!(a.forward().x < -0.2);
    }

    #[test]
    fn test_roll_keeps_forward_and_drops_right_wing() {
        let a = spin(Vec3::new(0.0, 0.0, 1.0), 0.5);
        assert!((a.forward() - BODY_FORWARD).length() < 1e-3);
        let right = a.rotation() * BODY_RIGHT;
        assert!(right.y < -0.3);
    }

    #[test]
    fn test_quarter_turn_close_to_exact() {
        // π/2 of pitch over one second
        let a = spin(Vec3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0), 1.0);
        assert!((a.forward() - Vec3::Y).length() < 0.02);
    }

    #[test]
    fn test_degenerate_rotation_resets() {
        let a = Attitude::from_rotation(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0));
        assert_eq!(a.rotation(), Quat::IDENTITY);
    }

    proptest! {
        #[test]
        fn prop_norm_stays_unit(
            rates in proptest::collection::vec(
                (-8.0f32..8.0, -8.0f32..8.0, -8.0f32..8.0), 1..200),
        ) {
            let mut attitude = Attitude::default();
            for (p, y, r) in rates {
                attitude.integrate(Vec3::new(p, y, r), SIM_DT);
                prop_assert!((attitude.rotation().length() - 1.0).abs() < 1e-4);
            }
        }
    }
}
