//! Angular velocity controller
//!
//! Per tick: shape stick, pick the mode's desired rates, PD toward them,
//! integrate, damp on release, cap, then integrate the attitude.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::attitude::Attitude;
use super::input::shape_stick;
use super::modes::{ControlFlags, ControlMode};
use crate::settings::PhysicsConfig;

/// Debug locks forcing an axis to zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLocks {
    pub pitch: bool,
    pub yaw: bool,
    pub roll: bool,
}

impl AxisLocks {
    #[inline]
    pub fn apply(&self, mut w: Vec3) -> Vec3 {
        if self.pitch {
            w.x = 0.0;
        }
        if self.yaw {
            w.y = 0.0;
        }
        if self.roll {
            w.z = 0.0;
        }
        w
    }
}

/// Controller input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    /// Raw stick vector (unnormalized)
    pub stick: Vec2,
    pub flags: ControlFlags,
    /// Deadzone in raw stick units
    pub deadzone: f32,
}

/// What happened during a tick (for HUD/debug readouts)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlReport {
    pub mode: ControlMode,
    /// Effective stick magnitude after shaping
    pub effective_input: f32,
    /// Angular acceleration applied (rad/s²)
    pub accel: Vec3,
    /// Whether release damping ran
    pub damped: bool,
}

/// Owns the angular velocity (pitch, yaw, roll in rad/s)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrientationController {
    angular_velocity: Vec3,
    locks: AxisLocks,
    mode: ControlMode,
}

impl OrientationController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Mode used on the most recent tick
    #[inline]
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn locks(&self) -> AxisLocks {
        self.locks
    }

    pub fn set_locks(&mut self, locks: AxisLocks) {
        self.locks = locks;
        self.angular_velocity = locks.apply(self.angular_velocity);
    }

    /// Zero angular velocity (reset/respawn)
    pub fn zero(&mut self) {
        self.angular_velocity = Vec3::ZERO;
    }

    /// Advance one tick and integrate `attitude`
    pub fn tick(
        &mut self,
        attitude: &mut Attitude,
        input: &ControlInput,
        physics: &PhysicsConfig,
        dt: f32,
    ) -> ControlReport {
        let table = physics.table();
        let stick = shape_stick(input.stick, input.deadzone, physics.input_exponent);
        let mode = ControlMode::from_flags(input.flags);
        let tornado = mode.is_tornado();
        self.mode = mode;

        let mut report = ControlReport {
            mode,
            effective_input: stick.magnitude,
            accel: Vec3::ZERO,
            damped: false,
        };
        if !(dt > 0.0 && dt.is_finite()) {
            return report;
        }

        // With everything released only damping acts; PD must not pull toward zero
        let released = stick.is_idle() && mode.roll_command(physics) == 0.0;

        if !released {
            let desired = mode.desired(stick.vector(), physics, &table);
            let limit = physics.max_accel_rad(tornado, &table);
            report.accel = table
                .gains(tornado)
                .accel(desired, self.angular_velocity)
                .clamp(-limit, limit);
        }

        let mut w = self.angular_velocity + report.accel * dt;
        w = self.locks.apply(w);

        if released {
            w *= (-physics.release_damping(tornado) * dt).exp();
            report.damped = true;
        }

        let caps = mode.axis_caps(physics, &table);
        w = w.clamp(-caps, caps);

        if tornado {
            let cap = physics.global_max_velocity;
            let magnitude = w.length();
            if magnitude > cap && magnitude > f32::EPSILON {
                w *= cap / magnitude;
            }
        }

        self.angular_velocity = w;
        attitude.integrate(w, dt);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    const DEADZONE: f32 = 0.08;

    fn input(stick: Vec2, flags: ControlFlags) -> ControlInput {
        ControlInput {
            stick,
            flags,
            deadzone: DEADZONE,
        }
    }

    fn tornado_right() -> ControlFlags {
        ControlFlags {
            air_roll_right: true,
            ..Default::default()
        }
    }

    fn run(
        controller: &mut OrientationController,
        attitude: &mut Attitude,
        physics: &PhysicsConfig,
        inp: ControlInput,
        seconds: f32,
    ) {
        let steps = (seconds / SIM_DT).round() as usize;
        for _ in 0..steps {
            controller.tick(attitude, &inp, physics, SIM_DT);
        }
    }

    #[test]
    fn test_pitch_input_accelerates_pitch_only() {
        let physics = PhysicsConfig::default();
        let mut c = OrientationController::new();
        let mut a = Attitude::default();
        let report = c.tick(&mut a, &input(Vec2::Y, ControlFlags::default()), &physics, SIM_DT);
        assert!(report.accel.x > 0.0);
        assert_eq!(report.accel.y, 0.0);
        assert_eq!(report.accel.z, 0.0);
        assert!(!report.damped);
        assert!(c.angular_velocity().x > 0.0);
    }

    #[test]
    fn test_accel_clamped_to_axis_limit() {
        let physics = PhysicsConfig::default();
        let mut c = OrientationController::new();
        let mut a = Attitude::default();
        let report = c.tick(&mut a, &input(Vec2::X, ControlFlags::default()), &physics, SIM_DT);
        let limit = physics.max_accel_rad(false, &physics.table());
        assert!(report.accel.y <= limit.y + 1e-4);
    }

    #[test]
    fn test_release_applies_only_damping() {
        let physics = PhysicsConfig::default();
        let mut c = OrientationController::new();
        let mut a = Attitude::default();
        run(&mut c, &mut a, &physics, input(Vec2::Y, ControlFlags::default()), 1.0);
        let before = c.angular_velocity();
        assert!(before.x > 1.0);

        let report = c.tick(&mut a, &input(Vec2::ZERO, ControlFlags::default()), &physics, SIM_DT);
        assert_eq!(report.accel, Vec3::ZERO);
        assert!(report.damped);
        let expected = before * (-physics.release_damping(false) * SIM_DT).exp();
        assert!((c.angular_velocity() - expected).length() < 1e-6);
    }

    #[test]
    fn test_stick_inside_deadzone_counts_as_released() {
        let physics = PhysicsConfig::default();
        let mut c = OrientationController::new();
        let mut a = Attitude::default();
        let report = c.tick(
            &mut a,
            &input(Vec2::new(0.05, 0.0), ControlFlags::default()),
            &physics,
            SIM_DT,
        );
        assert_eq!(report.effective_input, 0.0);
        assert!(report.damped);
        assert_eq!(c.angular_velocity(), Vec3::ZERO);
    }

    /// Roll period below the cap, leaving budget for steering
    fn five_rad_roll() -> PhysicsConfig {
        PhysicsConfig {
            free_roll_period: std::f32::consts::TAU / 5.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_tornado_roll_converges_to_rate() {
        let physics = five_rad_roll();
        let mut c = OrientationController::new();
        let mut a = Attitude::default();
        run(&mut c, &mut a, &physics, input(Vec2::ZERO, tornado_right()), 3.0);
        let w = c.angular_velocity();
        assert!((w.z - physics.tornado_roll_rate()).abs() < 0.05, "roll {}", w.z);
        assert!(w.length() <= physics.global_max_velocity + 1e-4);
    }

    #[test]
    fn test_default_period_spins_at_cap() {
        let physics = PhysicsConfig::default();
        let mut c = OrientationController::new();
        let mut a = Attitude::default();
        run(&mut c, &mut a, &physics, input(Vec2::ZERO, tornado_right()), 3.0);
        let w = c.angular_velocity();
        assert!((w.z - physics.global_max_velocity).abs() < 0.05, "roll {}", w.z);

        run(&mut c, &mut a, &physics, input(Vec2::Y, tornado_right()), 2.0);
        let w = c.angular_velocity();
        assert!(w.x > 0.5);
        assert!(w.length() <= physics.global_max_velocity + 1e-4);
    }

    #[test]
    fn test_tornado_full_stick_shares_budget() {
        let physics = five_rad_roll();
        let mut c = OrientationController::new();
        let mut a = Attitude::default();
        let stick = Vec2::new(1.0, 1.0).normalize();
        run(&mut c, &mut a, &physics, input(stick, tornado_right()), 4.0);
        let w = c.angular_velocity();
        assert!((w.z - physics.tornado_roll_rate()).abs() < 0.05, "roll {}", w.z);
        assert!(w.x > 0.5 && w.y > 0.5);
        assert!(w.length() <= physics.global_max_velocity + 1e-4);
    }

    #[test]
    fn test_entering_tornado_rescales_existing_velocity() {
        let physics = PhysicsConfig {
            max_axis_velocity: Vec3::splat(8.0),
            ..Default::default()
        };
        let mut c = OrientationController::new();
        let mut a = Attitude::default();
        run(&mut c, &mut a, &physics, input(Vec2::new(1.0, 1.0), ControlFlags::default()), 2.0);
        assert!(c.angular_velocity().length() > physics.global_max_velocity);

        c.tick(&mut a, &input(Vec2::new(1.0, 1.0), tornado_right()), &physics, SIM_DT);
        assert!(c.angular_velocity().length() <= physics.global_max_velocity + 1e-4);
    }

    #[test]
    fn test_tornado_release_uses_tornado_damping() {
        let physics = PhysicsConfig {
            free_roll_period: 0.0,
            brake_on_release: 10.0,
            ..Default::default()
        };
        let mut c = OrientationController::new();
        let mut a = Attitude::default();
        run(&mut c, &mut a, &physics, input(Vec2::Y, tornado_right()), 0.5);
        let before = c.angular_velocity();
        let report = c.tick(&mut a, &input(Vec2::ZERO, tornado_right()), &physics, SIM_DT);
        assert!(report.damped);
        let expected = before * (-physics.tornado_damping * SIM_DT).exp();
        assert!((c.angular_velocity() - expected).length() < 1e-6);
    }

    #[test]
    fn test_axis_lock_zeroes_axis() {
        let physics = PhysicsConfig::default();
        let mut c = OrientationController::new();
        c.set_locks(AxisLocks {
            yaw: true,
            ..Default::default()
        });
        let mut a = Attitude::default();
        run(&mut c, &mut a, &physics, input(Vec2::new(1.0, 1.0), ControlFlags::default()), 0.5);
        assert_eq!(c.angular_velocity().y, 0.0);
        assert!(c.angular_velocity().x > 0.0);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let physics = PhysicsConfig::default();
        let mut c = OrientationController::new();
        let mut a = Attitude::default();
        c.tick(&mut a, &input(Vec2::Y, ControlFlags::default()), &physics, 0.0);
        assert_eq!(c.angular_velocity(), Vec3::ZERO);
        assert_eq!(a, Attitude::default());
    }

    #[test]
    fn test_replay_is_deterministic() {
        let physics = PhysicsConfig::default();
        let script: Vec<ControlInput> = (0..600)
            .map(|i| {
                let t = i as f32 * SIM_DT;
                let flags = ControlFlags {
                    air_roll_left: (i / 150) % 2 == 1,
                    ..Default::default()
                };
                input(Vec2::new(t.sin(), (t * 0.7).cos()), flags)
            })
            .collect();

        let replay = || {
            let mut c = OrientationController::new();
            let mut a = Attitude::default();
            let mut trace = Vec::with_capacity(script.len());
            for inp in &script {
                c.tick(&mut a, inp, &physics, SIM_DT);
                trace.push((c.angular_velocity(), a.rotation()));
            }
            trace
        };
        assert_eq!(replay(), replay());
    }

    proptest! {
        #[test]
        fn prop_tornado_respects_global_cap(
            steps in proptest::collection::vec(
                (-1.5f32..1.5, -1.5f32..1.5, any::<bool>(), any::<bool>()), 1..300),
        ) {
            let physics = PhysicsConfig::default();
            let mut c = OrientationController::new();
            let mut a = Attitude::default();
            for (x, y, left, tornado) in steps {
                let flags = ControlFlags {
                    air_roll_left: tornado && left,
                    air_roll_right: tornado && !left,
                    ..Default::default()
                };
                c.tick(&mut a, &input(Vec2::new(x, y), flags), &physics, SIM_DT);
                if tornado {
                    prop_assert!(
                        c.angular_velocity().length() <= physics.global_max_velocity + 1e-4
                    );
                }
            }
        }

        #[test]
        fn prop_released_tick_has_zero_accel(
            wx in -5.0f32..5.0,
            wy in -5.0f32..5.0,
            wz in -5.0f32..5.0,
        ) {
            let physics = PhysicsConfig::default();
            let mut c = OrientationController::new();
            c.angular_velocity = Vec3::new(wx, wy, wz);
            let mut a = Attitude::default();
            let report = c.tick(&mut a, &input(Vec2::ZERO, ControlFlags::default()), &physics, SIM_DT);
            prop_assert_eq!(report.accel, Vec3::ZERO);
            let expected = Vec3::new(wx, wy, wz) * (-physics.release_damping(false) * SIM_DT).exp();
            prop_assert!((c.angular_velocity() - expected).length() < 1e-5);
        }
    }
}
