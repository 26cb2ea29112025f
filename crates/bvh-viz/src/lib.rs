//! Shared drawing and scene utilities for the BVH viewer.

use std::f32::consts::PI;
use std::hash::{Hash, Hasher};

use bvh_tree::BoundingSphere;
use macroquad::models::{Mesh, Vertex, draw_mesh};
use macroquad::prelude::*;
use nalgebra::{Matrix4, Point3};

pub mod depth;
pub use depth::DepthNavigator;

/// An indexed triangle mesh in the layout [`bvh_tree::BvhTree::from_indices`] expects.
#[derive(Debug, Clone)]
pub struct IndexedMesh {
    pub vertices: Vec<Point3<f32>>,
    pub indices: Vec<u32>,
}

impl IndexedMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Converts a nalgebra point into macroquad's vector type.
#[inline]
pub fn to_vec3(p: &Point3<f32>) -> Vec3 {
    vec3(p.x, p.y, p.z)
}

/// Generates a stable color for a triangle from its vertex indices.
/// The same triangle keeps its color while the mesh moves.
pub fn triangle_color(triangle: &[u32]) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    triangle.hash(&mut hasher);
    let hash = hasher.finish();

    let r = (((hash >> 16) & 0xFF) as u8).max(40);
    let g = (((hash >> 8) & 0xFF) as u8).max(40);
    let b = ((hash & 0xFF) as u8).max(40);

    Color::from_rgba(r, g, b, 255)
}

/// Draws a mesh placed in the world by `transform`, one flat color per triangle.
pub fn draw_indexed_mesh(mesh: &IndexedMesh, transform: &Matrix4<f32>) {
    let mut vertices = Vec::with_capacity(mesh.indices.len());
    for triangle in mesh.indices.chunks_exact(3) {
        let color = triangle_color(triangle);
        for &i in triangle {
            let p = transform.transform_point(&mesh.vertices[i as usize]);
            vertices.push(Vertex::new2(to_vec3(&p), vec2(0.0, 0.0), color));
        }
    }

    // Vertices are unshared, so the index buffer is just a running count.
    let indices = (0..vertices.len() as u16).collect();
    draw_mesh(&Mesh {
        vertices,
        indices,
        texture: None,
    });
}

/// Draws a bounding sphere as a wireframe, moved by `transform`.
pub fn draw_bounding_sphere(sphere: &BoundingSphere, transform: &Matrix4<f32>, color: Color) {
    let world = sphere.transformed(transform);
    draw_sphere_wires(to_vec3(&world.center()), world.radius(), None, color);
}

/// Marks each contact point with a small solid sphere.
pub fn draw_contacts(contacts: &[Point3<f32>], size: f32, color: Color) {
    for contact in contacts {
        draw_sphere(to_vec3(contact), size, None, color);
    }
}

/// Generates a closed axis-aligned cube of 12 triangles.
pub fn generate_cube(center: Point3<f32>, size: f32) -> IndexedMesh {
    let half = size / 2.0;
    let corners = [
        (-half, -half, -half), // 0: left-bottom-back
        (half, -half, -half),  // 1: right-bottom-back
        (half, half, -half),   // 2: right-top-back
        (-half, half, -half),  // 3: left-top-back
        (-half, -half, half),  // 4: left-bottom-front
        (half, -half, half),   // 5: right-bottom-front
        (half, half, half),    // 6: right-top-front
        (-half, half, half),   // 7: left-top-front
    ];
    let vertices = corners
        .iter()
        .map(|&(x, y, z)| Point3::new(center.x + x, center.y + y, center.z + z))
        .collect();

    // Each face split along its 0-2 diagonal, counter-clockwise from outside.
    let faces: [[u32; 4]; 6] = [
        [4, 5, 6, 7], // front (+Z)
        [1, 0, 3, 2], // back (-Z)
        [0, 4, 7, 3], // left (-X)
        [5, 1, 2, 6], // right (+X)
        [7, 6, 2, 3], // top (+Y)
        [0, 1, 5, 4], // bottom (-Y)
    ];
    let indices = faces
        .iter()
        .flat_map(|f| [f[0], f[1], f[2], f[0], f[2], f[3]])
        .collect();

    IndexedMesh { vertices, indices }
}

/// Generates a latitude/longitude sphere around the origin.
///
/// `rings` counts latitude bands (at least 2) and `segments` longitude slices
/// (at least 3). The poles get triangle fans, so no triangle is degenerate.
pub fn generate_uv_sphere(radius: f32, rings: u32, segments: u32) -> IndexedMesh {
    let rings = rings.max(2);
    let segments = segments.max(3);

    let mut vertices = vec![Point3::new(0.0, radius, 0.0)];
    for ring in 1..rings {
        let theta = PI * ring as f32 / rings as f32;
        for segment in 0..segments {
            let phi = 2.0 * PI * segment as f32 / segments as f32;
            vertices.push(Point3::new(
                radius * theta.sin() * phi.cos(),
                radius * theta.cos(),
                radius * theta.sin() * phi.sin(),
            ));
        }
    }
    vertices.push(Point3::new(0.0, -radius, 0.0));

    let bottom = vertices.len() as u32 - 1;
    let ring_start = |ring: u32| 1 + (ring - 1) * segments;
    let mut indices = Vec::new();

    for s in 0..segments {
        let next = (s + 1) % segments;
        indices.extend([0, ring_start(1) + next, ring_start(1) + s]);
    }
    for ring in 1..rings - 1 {
        let (upper, lower) = (ring_start(ring), ring_start(ring + 1));
        for s in 0..segments {
            let next = (s + 1) % segments;
            indices.extend([upper + s, upper + next, lower + s]);
            indices.extend([upper + next, lower + next, lower + s]);
        }
    }
    let last = ring_start(rings - 1);
    for s in 0..segments {
        let next = (s + 1) % segments;
        indices.extend([bottom, last + s, last + next]);
    }

    IndexedMesh { vertices, indices }
}

/// Simple orbit camera for 3D scene navigation.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
            zoom_speed: 0.5,
            min_distance: 2.0,
            max_distance: 30.0,
        }
    }

    /// Sets the zoom configuration (speed and distance limits).
    pub fn with_zoom(mut self, speed: f32, min: f32, max: f32) -> Self {
        self.zoom_speed = speed;
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Updates camera state from mouse drag and scroll.
    ///
    /// Arrow keys are left to the depth navigator and the probe controls.
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        let scroll = mouse_wheel().1;
        self.distance = (self.distance - scroll * self.zoom_speed)
            .clamp(self.min_distance, self.max_distance);
    }

    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }
}
