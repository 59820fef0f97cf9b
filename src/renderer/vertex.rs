//! Vertex and instance types handed to the rendering collaborator

use bytemuck::{Pod, Zeroable};

/// Mesh vertex with position and normal
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Per-ring instance data: one unit mesh drawn many times
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RingInstance {
    pub position: [f32; 3],
    /// Uniform scale applied to the unit torus (ring diameter)
    pub scale: f32,
    /// Tube thickness relative to the unit mesh, so every ring shares the
    /// same world tube radius whatever its diameter
    pub tube_scale: f32,
    pub color: [f32; 4],
}

/// Ring palette, indexed by ring color
pub mod colors {
    pub const RINGS: [[f32; 4]; 6] = [
        [0.2, 0.8, 1.0, 1.0],  // Cyan
        [0.3, 1.0, 0.5, 1.0],  // Green
        [1.0, 0.85, 0.3, 1.0], // Gold
        [1.0, 0.45, 0.2, 1.0], // Orange
        [0.9, 0.3, 0.8, 1.0],  // Magenta
        [0.5, 0.5, 1.0, 1.0],  // Violet
    ];
    pub const BONUS: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Judged rings fade out
    pub const PASSED_ALPHA: f32 = 0.35;
    pub const MISSED: [f32; 4] = [0.8, 0.1, 0.1, 0.6];
}
