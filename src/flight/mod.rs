//! Orientation controller
//!
//! Turns a shaped 2D stick plus an air-roll mode into angular velocity, then
//! integrates the vehicle attitude. Runs once per frame before the ring
//! engine reads the attitude.

pub mod attitude;
pub mod controller;
pub mod input;
pub mod modes;

pub use attitude::{Attitude, BODY_FORWARD, BODY_RIGHT, BODY_UP};
pub use controller::{AxisLocks, ControlInput, ControlReport, OrientationController};
pub use input::{ShapedStick, shape_stick};
pub use modes::{ControlFlags, ControlMode, RollDirection};
