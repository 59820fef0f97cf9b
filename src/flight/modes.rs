//! Control modes and their desired-angular-velocity functions
//!
//! Each mode owns one entry in a small function table. Components of the
//! returned vector are (pitch, yaw, roll) in rad/s.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::settings::PhysicsConfig;
use crate::tuning::TuningTable;

/// Direction of a directional air roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollDirection {
    Left,
    Right,
}

impl RollDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            RollDirection::Left => -1.0,
            RollDirection::Right => 1.0,
        }
    }
}

/// Mode buttons as reported by the input collaborator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlFlags {
    pub air_roll_left: bool,
    pub air_roll_right: bool,
    pub air_roll_free: bool,
}

/// Control mode, derived fresh every tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    #[default]
    Normal,
    /// Tornado spin: fixed-rate roll with budgeted pitch/yaw steering
    DirectionalAirRoll(RollDirection),
    /// Horizontal stick rolls instead of yawing
    AirRollFree,
}

/// Signature shared by every mode's desired-velocity function
type DesiredFn = fn(stick: Vec2, roll_sign: f32, physics: &PhysicsConfig, table: &TuningTable) -> Vec3;

/// Indexed by `ControlMode::index`
const DESIRED: [DesiredFn; 3] = [desired_normal, desired_directional, desired_free];

impl ControlMode {
    /// Free roll wins over a directional roll; left+right together cancel.
    pub fn from_flags(flags: ControlFlags) -> Self {
        if flags.air_roll_free {
            return ControlMode::AirRollFree;
        }
        match (flags.air_roll_left, flags.air_roll_right) {
            (true, false) => ControlMode::DirectionalAirRoll(RollDirection::Left),
            (false, true) => ControlMode::DirectionalAirRoll(RollDirection::Right),
            _ => ControlMode::Normal,
        }
    }

    fn index(self) -> usize {
        match self {
            ControlMode::Normal => 0,
            ControlMode::DirectionalAirRoll(_) => 1,
            ControlMode::AirRollFree => 2,
        }
    }

    /// Tornado spin is active in directional air roll
    #[inline]
    pub fn is_tornado(self) -> bool {
        matches!(self, ControlMode::DirectionalAirRoll(_))
    }

    /// Roll rate commanded independently of the stick (rad/s)
    pub fn roll_command(self, physics: &PhysicsConfig) -> f32 {
        match self {
            ControlMode::DirectionalAirRoll(dir) => dir.sign() * physics.tornado_roll_rate(),
            _ => 0.0,
        }
    }

    /// Desired (pitch, yaw, roll) rates for a shaped stick vector
    pub fn desired(self, stick: Vec2, physics: &PhysicsConfig, table: &TuningTable) -> Vec3 {
        let roll_sign = match self {
            ControlMode::DirectionalAirRoll(dir) => dir.sign(),
            _ => 0.0,
        };
        DESIRED[self.index()](stick, roll_sign, physics, table)
    }

    /// Per-axis velocity caps for this mode
    pub fn axis_caps(self, physics: &PhysicsConfig, table: &TuningTable) -> Vec3 {
        if !self.is_tornado() {
            return physics.max_axis_velocity;
        }
        let cap = physics.global_max_velocity;
        let max = physics.max_axis_velocity;
        match steering_budget(physics, table) {
            Some(budget) => Vec3::new(max.x.min(budget), max.y.min(budget), max.z.min(cap)),
            None => Vec3::new(max.x, max.y, max.z.min(cap)),
        }
    }
}

/// Pitch/yaw ceiling left over by the tornado roll. `None` when the roll
/// alone fills the global cap; steering then targets the axis caps and the
/// joint rescale trades roll rate for steering.
fn steering_budget(physics: &PhysicsConfig, table: &TuningTable) -> Option<f32> {
    let budget = table.steer_budget(physics.global_max_velocity, physics.tornado_roll_rate());
    (budget > 0.0).then_some(budget)
}

fn desired_normal(stick: Vec2, _roll_sign: f32, physics: &PhysicsConfig, _table: &TuningTable) -> Vec3 {
    let max = physics.max_axis_velocity;
    Vec3::new(max.x * stick.y, max.y * stick.x, 0.0)
}

/// Roll and steering share one budget so they never stack past the cap
fn desired_directional(stick: Vec2, roll_sign: f32, physics: &PhysicsConfig, table: &TuningTable) -> Vec3 {
    let cap = physics.global_max_velocity;
    let rate = physics.tornado_roll_rate();
    let steer = match steering_budget(physics, table) {
        Some(budget) => Vec2::splat(budget),
        None => physics.max_axis_velocity.truncate(),
    };

    let raw = Vec3::new(steer.x * stick.y, steer.y * stick.x, roll_sign * rate);
    let magnitude = raw.length();
    if magnitude > cap && magnitude > f32::EPSILON {
        raw * (cap / magnitude)
    } else {
        raw
    }
}

fn desired_free(stick: Vec2, _roll_sign: f32, physics: &PhysicsConfig, _table: &TuningTable) -> Vec3 {
    let max = physics.max_axis_velocity;
    Vec3::new(max.x * stick.y, 0.0, -max.z * stick.x)
}
