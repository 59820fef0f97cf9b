//! Render-side data
//!
//! No GPU code here: the rendering collaborator receives cached unit meshes
//! and per-ring instance data as plain POD buffers.

pub mod ring_cache;
pub mod vertex;

pub use ring_cache::{RingVisualCache, UNIT_TUBE_RATIO, unit_torus, world_position};
pub use vertex::{RingInstance, Vertex, colors};
