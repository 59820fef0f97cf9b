//! Versioned control tuning
//!
//! Gains and directional-air-roll multipliers have changed between measured
//! revisions. Each revision is a named table so a behavior change always
//! shows up as a version bump instead of an edited literal.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Per-axis proportional/derivative gains (x = pitch, y = yaw, z = roll)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdGains {
    pub kp: Vec3,
    pub kd: Vec3,
}

impl PdGains {
    pub const fn uniform(kp: f32, kd: f32) -> Self {
        Self {
            kp: Vec3::splat(kp),
            kd: Vec3::splat(kd),
        }
    }

    /// acceleration = Kp·(desired − current) − Kd·current
    #[inline]
    pub fn accel(&self, desired: Vec3, current: Vec3) -> Vec3 {
        self.kp * (desired - current) - self.kd * current
    }
}

/// Known tuning revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TuningVersion {
    /// Uniform gains, near-unity air-roll multipliers
    V1,
    /// Per-axis gains and the re-measured air-roll acceleration boost
    #[default]
    V2,
}

impl TuningVersion {
    pub fn table(self) -> TuningTable {
        match self {
            TuningVersion::V1 => TuningTable {
                version: self,
                normal_gains: PdGains::uniform(20.0, 3.0),
                tornado_gains: PdGains::uniform(20.0, 3.0),
                dar_accel_mult: Vec3::new(0.997, 1.0, 0.98),
                dar_steer_share: 1.0,
            },
            TuningVersion::V2 => TuningTable {
                version: self,
                normal_gains: PdGains {
                    kp: Vec3::new(36.0, 36.0, 12.0),
                    kd: Vec3::new(4.0, 4.0, 3.0),
                },
                // No roll derivative term: the spin settles on the commanded rate
                tornado_gains: PdGains {
                    kp: Vec3::new(36.0, 36.0, 12.0),
                    kd: Vec3::new(4.0, 4.0, 0.0),
                },
                dar_accel_mult: Vec3::new(0.997, 3.17, 1.32),
                dar_steer_share: 0.9,
            },
        }
    }
}

/// Control constants for one tuning revision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningTable {
    pub version: TuningVersion,
    /// Gains outside tornado spin
    pub normal_gains: PdGains,
    /// Gains while tornado spin is active
    pub tornado_gains: PdGains,
    /// Per-axis max-acceleration multipliers while tornado spin is active
    pub dar_accel_mult: Vec3,
    /// Fraction of the remaining velocity budget granted to pitch/yaw steering
    pub dar_steer_share: f32,
}

impl Default for TuningTable {
    fn default() -> Self {
        TuningVersion::default().table()
    }
}

impl TuningTable {
    pub fn gains(&self, tornado: bool) -> &PdGains {
        if tornado {
            &self.tornado_gains
        } else {
            &self.normal_gains
        }
    }

    /// Pitch/yaw velocity budget left after the tornado roll rate is reserved
    pub fn steer_budget(&self, global_cap: f32, roll_rate: f32) -> f32 {
        let remaining = (global_cap * global_cap - roll_rate * roll_rate).max(0.0);
        remaining.sqrt() * self.dar_steer_share
    }
}
