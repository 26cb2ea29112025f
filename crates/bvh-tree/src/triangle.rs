//! Triangle representation for collision tests.

use nalgebra::{Matrix4, Point3, Vector3};

use crate::BoundingSphere;
use crate::intersect::triangles_intersect;

/// Default epsilon for the degenerate-triangle gate.
///
/// Triangles with an edge shorter than this, or twice-area below it, are
/// rejected by [`Triangle::is_degenerate`].
pub const DEGENERATE_EPSILON: f32 = 1e-6;

/// A triangle in 3D space, defined by three vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    vertices: [Point3<f32>; 3],
}

impl Triangle {
    /// Creates a new triangle from three points.
    ///
    /// The winding order determines the normal direction via the right-hand rule:
    /// normal = (b - a) × (c - a)
    pub fn new(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Looks up a triangle by vertex indices into a shared vertex array.
    ///
    /// # Panics
    /// Panics if an index is out of bounds.
    pub fn from_indices(vertices: &[Point3<f32>], indices: [usize; 3]) -> Self {
        Self::new(
            vertices[indices[0]],
            vertices[indices[1]],
            vertices[indices[2]],
        )
    }

    /// Returns the three vertices of the triangle.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>; 3] {
        &self.vertices
    }

    /// Computes the (unnormalized) normal vector of the triangle.
    pub fn normal(&self) -> Vector3<f32> {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a))
    }

    /// Computes the unit normal vector of the triangle.
    ///
    /// Returns `None` if the triangle is degenerate (zero area).
    pub fn unit_normal(&self) -> Option<Vector3<f32>> {
        let n = self.normal();
        let len = n.norm();
        if len > f32::EPSILON {
            Some(n / len)
        } else {
            None
        }
    }

    /// Area of the triangle.
    pub fn area(&self) -> f32 {
        self.normal().norm() * 0.5
    }

    /// Computes the centroid (center of mass) of the triangle.
    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = &self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Returns `true` if an edge is shorter than `epsilon` or the triangle has
    /// (almost) no area.
    ///
    /// Degenerate triangles must be removed before building a hierarchy; the
    /// intersection test assumes both of its inputs pass this check.
    pub fn is_degenerate(&self, epsilon: f32) -> bool {
        let [a, b, c] = &self.vertices;
        let eps_sq = epsilon * epsilon;
        (b - a).norm_squared() < eps_sq
            || (c - b).norm_squared() < eps_sq
            || (a - c).norm_squared() < eps_sq
            || self.normal().norm() < epsilon
    }

    /// Applies an affine transform to all three vertices.
    pub fn transformed(&self, transform: &Matrix4<f32>) -> Self {
        let [a, b, c] = &self.vertices;
        Self::new(
            transform.transform_point(a),
            transform.transform_point(b),
            transform.transform_point(c),
        )
    }

    /// Tight bounding sphere: box center, radius to the farthest vertex.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        // Three points always produce a box.
        BoundingSphere::enclosing(self.vertices)
            .unwrap_or_else(|| BoundingSphere::new(self.vertices[0], 0.0))
    }

    /// Exact intersection test against another triangle in the same space.
    ///
    /// Triangles that only touch along an edge or at a vertex count as
    /// intersecting.
    pub fn intersects(&self, other: &Triangle, epsilon: f32) -> bool {
        let [a0, a1, a2] = &self.vertices;
        let [b0, b1, b2] = &other.vertices;
        triangles_intersect(a0, a1, a2, b0, b1, b2, epsilon)
    }

    /// Mean of the six vertices of two triangles.
    ///
    /// Used as the approximate contact point of an intersecting pair.
    pub fn mean_with(&self, other: &Triangle) -> Point3<f32> {
        let sum = self
            .vertices
            .iter()
            .chain(other.vertices.iter())
            .fold(Vector3::zeros(), |acc, v| acc + v.coords);
        Point3::from(sum / 6.0)
    }
}
