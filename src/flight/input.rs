//! Stick shaping
//!
//! Raw stick vectors arrive unnormalized (e.g. touch offset divided by the
//! joystick base radius). Shaping removes the deadzone, clamps to the unit
//! disc and applies the response curve.

use glam::Vec2;

/// Stick after deadzone and response curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedStick {
    /// Unit direction of the raw stick (zero when idle)
    pub direction: Vec2,
    /// Effective magnitude in [0, 1]
    pub magnitude: f32,
}

impl ShapedStick {
    pub const IDLE: Self = Self {
        direction: Vec2::ZERO,
        magnitude: 0.0,
    };

    /// Shaped stick as a vector inside the unit disc
    #[inline]
    pub fn vector(&self) -> Vec2 {
        self.direction * self.magnitude
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.magnitude == 0.0
    }
}

/// Remove the deadzone, clamp to [0, 1], raise to `exponent`.
///
/// The remaining travel past the deadzone is rescaled so full deflection
/// still reaches 1. At or below the deadzone the magnitude is exactly 0.
pub fn shape_stick(raw: Vec2, deadzone: f32, exponent: f32) -> ShapedStick {
    let length = raw.length();
    if !length.is_finite() || length <= deadzone || length <= f32::EPSILON {
        return ShapedStick::IDLE;
    }
    let travel = 1.0 - deadzone;
    if travel <= f32::EPSILON {
        return ShapedStick::IDLE;
    }

    let linear = ((length - deadzone) / travel).clamp(0.0, 1.0);
    let magnitude = linear.powf(exponent);
    if magnitude == 0.0 {
        return ShapedStick::IDLE;
    }

    ShapedStick {
        direction: raw / length,
        magnitude,
    }
}
