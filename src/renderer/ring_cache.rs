//! Ring visual cache
//!
//! Torus meshes are built once per color at unit size and reused. Each ring
//! is drawn as an instance scaled to its diameter, with a tube scale that
//! keeps the tube radius fixed in world units.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::Vec3;

use super::vertex::{RingInstance, Vertex, colors};
use crate::consts::{RING_BASE_SIZE, RING_TUBE_RADIUS};
use crate::sim::{BONUS_RING_COLOR, Ring};

const MAJOR_SEGMENTS: u32 = 48;
const MINOR_SEGMENTS: u32 = 12;

/// Tube radius of the cached unit mesh: a base-size ring's tube
pub const UNIT_TUBE_RATIO: f32 = RING_TUBE_RADIUS / RING_BASE_SIZE;

/// Triangle list for a torus of major radius 0.5 (unit diameter) lying in
/// the XY plane, facing the travel axis
pub fn unit_torus(tube_ratio: f32) -> Vec<Vertex> {
    let major = 0.5;
    let mut vertices = Vec::with_capacity((MAJOR_SEGMENTS * MINOR_SEGMENTS * 6) as usize);

    let point = |i: u32, j: u32| {
        let theta = (i as f32 / MAJOR_SEGMENTS as f32) * TAU;
        let phi = (j as f32 / MINOR_SEGMENTS as f32) * TAU;
        let ring_dir = Vec3::new(theta.cos(), theta.sin(), 0.0);
        let normal = ring_dir * phi.cos() + Vec3::Z * phi.sin();
        let position = ring_dir * major + normal * tube_ratio;
        Vertex::new(position.to_array(), normal.to_array())
    };

    for i in 0..MAJOR_SEGMENTS {
        for j in 0..MINOR_SEGMENTS {
            let a = point(i, j);
            let b = point(i + 1, j);
            let c = point(i, j + 1);
            let d = point(i + 1, j + 1);

            // Two triangles per quad
            vertices.extend_from_slice(&[a, b, c, c, b, d]);
        }
    }

    vertices
}

/// Meshes keyed by ring color, built on first use
#[derive(Debug, Default)]
pub struct RingVisualCache {
    meshes: HashMap<u8, Vec<Vertex>>,
    builds: usize,
}

impl RingVisualCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mesh for a color, building it only the first time
    pub fn mesh(&mut self, color: u8) -> &[Vertex] {
        let builds = &mut self.builds;
        self.meshes.entry(color).or_insert_with(|| {
            *builds += 1;
            log::debug!("Built ring mesh for color {color}");
            unit_torus(UNIT_TUBE_RATIO)
        })
    }

    /// Number of meshes built so far
    pub fn builds(&self) -> usize {
        self.builds
    }

    /// Instance data for a ring, fetching its mesh into the cache
    pub fn instance(&mut self, ring: &Ring) -> RingInstance {
        self.mesh(ring.color);
        RingInstance {
            position: ring.pos.to_array(),
            scale: ring.size,
            tube_scale: RING_BASE_SIZE / ring.size.max(1.0),
            color: ring_color(ring),
        }
    }

    /// Instances for every ring in draw order
    pub fn instances(&mut self, rings: &[Ring]) -> Vec<RingInstance> {
        rings.iter().map(|r| self.instance(r)).collect()
    }

    pub fn clear(&mut self) {
        self.meshes.clear();
    }
}

/// World position of a unit-mesh vertex drawn with `instance`. The tube
/// offset along the vertex normal is stretched by `tube_scale` before the
/// uniform scale.
pub fn world_position(vertex: &Vertex, instance: &RingInstance) -> Vec3 {
    let local = Vec3::from_array(vertex.position);
    let normal = Vec3::from_array(vertex.normal);
    let tube = local + normal * UNIT_TUBE_RATIO * (instance.tube_scale - 1.0);
    Vec3::from_array(instance.position) + tube * instance.scale
}

fn ring_color(ring: &Ring) -> [f32; 4] {
    if ring.missed {
        return colors::MISSED;
    }
    let mut color = if ring.bonus || ring.color == BONUS_RING_COLOR {
        colors::BONUS
    } else {
        colors::RINGS[ring.color as usize % colors::RINGS.len()]
    };
    if ring.passed {
        color[3] = colors::PASSED_ALPHA;
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(id: u32, color: u8, size: f32) -> Ring {
        Ring {
            id,
            pos: glam::Vec3::new(1.0, 2.0, 3.0),
            size,
            speed: 900.0,
            color,
            passed: false,
            missed: false,
            bonus: false,
        }
    }

    #[test]
    fn test_torus_vertex_count() {
        let mesh = unit_torus(0.05);
        assert_eq!(mesh.len(), (MAJOR_SEGMENTS * MINOR_SEGMENTS * 6) as usize);
        for v in &mesh {
            let p = Vec3::from_array(v.position);
            let planar = p.truncate().length();
            assert!(planar >= 0.45 - 1e-4 && planar <= 0.55 + 1e-4);
        }
    }

    #[test]
    fn test_mesh_built_once_per_color() {
        let mut cache = RingVisualCache::new();
        let rings: Vec<Ring> = (0..30).map(|i| ring(i, (i % 3) as u8, 200.0 + i as f32)).collect();
        let instances = cache.instances(&rings);
        assert_eq!(instances.len(), 30);
        assert_eq!(cache.builds(), 3);

        cache.instances(&rings);
        assert_eq!(cache.builds(), 3);
    }

    #[test]
    fn test_instance_scaled_per_ring() {
        let mut cache = RingVisualCache::new();
        let small = cache.instance(&ring(0, 1, 150.0));
        let large = cache.instance(&ring(1, 1, 260.0));
        assert_eq!(small.scale, 150.0);
        assert_eq!(large.scale, 260.0);
        assert_eq!(large.tube_scale, 1.0);
        assert!(small.tube_scale > 1.0);
        assert_eq!(small.color, large.color);
        assert_eq!(small.position, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_tube_radius_fixed_across_sizes() {
        let mut cache = RingVisualCache::new();
        // Same color: the smaller ring reuses the mesh built for the larger one
        for size in [260.0, 150.0, 400.0] {
            let instance = cache.instance(&ring(0, 2, size));
            let center = Vec3::from_array(instance.position);
            let (mut min, mut max) = (f32::MAX, f32::MIN);
            for v in cache.mesh(2) {
                let planar = (world_position(v, &instance) - center).truncate().length();
                min = min.min(planar);
                max = max.max(planar);
            }
            assert!((min - (size * 0.5 - RING_TUBE_RADIUS)).abs() < 1e-2, "size {size}: inner {min}");
            assert!((max - (size * 0.5 + RING_TUBE_RADIUS)).abs() < 1e-2, "size {size}: outer {max}");
        }
        assert_eq!(cache.builds(), 1);
    }

    #[test]
    fn test_resolved_ring_colors() {
        let mut r = ring(0, 0, 200.0);
        r.passed = true;
        assert_eq!(ring_color(&r)[3], colors::PASSED_ALPHA);
        r.missed = true;
        assert_eq!(ring_color(&r), colors::MISSED);
        let mut b = ring(1, BONUS_RING_COLOR, 200.0);
        b.bonus = true;
        assert_eq!(ring_color(&b), colors::BONUS);
    }
}
