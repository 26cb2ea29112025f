//! Bounding sphere primitive.

use nalgebra::{Matrix4, Point3};

use crate::Aabb;

/// A sphere in 3D space, used as the bounding volume of every hierarchy node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    center: Point3<f32>,
    radius: f32,
}

impl BoundingSphere {
    /// Creates a sphere from a center and a radius.
    pub fn new(center: Point3<f32>, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "Sphere radius cannot be negative");
        Self { center, radius }
    }

    /// Builds the sphere enclosing a set of points.
    ///
    /// The center is the center of the points' axis-aligned bounding box and
    /// the radius is the largest distance from that center to any point. This
    /// is tighter than half the box diagonal.
    ///
    /// Returns `None` if `points` is empty.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f32>> + Clone,
    {
        let aabb = Aabb::from_points(points.clone())?;
        Some(Self::around(aabb.center(), points))
    }

    /// Builds a sphere with a fixed center whose radius reaches the farthest point.
    pub fn around<I>(center: Point3<f32>, points: I) -> Self
    where
        I: IntoIterator<Item = Point3<f32>>,
    {
        let radius_sq = points
            .into_iter()
            .map(|p| (p - center).norm_squared())
            .fold(0.0f32, f32::max);
        Self::new(center, radius_sq.sqrt())
    }

    /// Returns the center of the sphere.
    #[inline]
    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    /// Returns the radius of the sphere.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns `true` if the two spheres overlap.
    ///
    /// Spheres that merely touch (center distance equal to the sum of radii)
    /// do not overlap.
    #[inline]
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let radius_sum = self.radius + other.radius;
        (self.center - other.center).norm_squared() < radius_sum * radius_sum
    }

    /// Returns `true` if the point lies inside or on the sphere.
    #[inline]
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        (point - self.center).norm_squared() <= self.radius * self.radius
    }

    /// Moves the center through an affine transform.
    ///
    /// The radius is carried over unchanged, which is only correct for rigid
    /// transforms (rotation and translation).
    #[inline]
    pub fn transformed(&self, transform: &Matrix4<f32>) -> Self {
        Self {
            center: transform.transform_point(&self.center),
            radius: self.radius,
        }
    }

    /// Squared distance between the two centers.
    #[inline]
    pub fn center_distance_squared(&self, other: &BoundingSphere) -> f32 {
        (self.center - other.center).norm_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Translation3, Vector3};

    #[test]
    fn enclosing_uses_box_center_and_max_distance() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        let sphere = BoundingSphere::enclosing(points).unwrap();

        assert_eq!(sphere.center(), Point3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(sphere.radius(), 2.0f32.sqrt());
    }

    #[test]
    fn enclosing_empty_is_none() {
        assert!(BoundingSphere::enclosing(Vec::<Point3<f32>>::new()).is_none());
    }

    #[test]
    fn touching_spheres_do_not_intersect() {
        let a = BoundingSphere::new(Point3::origin(), 1.0);
        let b = BoundingSphere::new(Point3::new(2.0, 0.0, 0.0), 1.0);
        let c = BoundingSphere::new(Point3::new(1.9, 0.0, 0.0), 1.0);

        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn contains_point_is_inclusive() {
        let sphere = BoundingSphere::new(Point3::origin(), 1.0);
        assert!(sphere.contains_point(Point3::new(1.0, 0.0, 0.0)));
        assert!(!sphere.contains_point(Point3::new(1.0, 0.1, 0.0)));
    }

    #[test]
    fn transform_moves_center_only() {
        let sphere = BoundingSphere::new(Point3::new(1.0, 0.0, 0.0), 0.5);
        let matrix = Translation3::from(Vector3::new(0.0, 3.0, 0.0)).to_homogeneous();
        let moved = sphere.transformed(&matrix);

        assert_relative_eq!(moved.center(), Point3::new(1.0, 3.0, 0.0));
        assert_eq!(moved.radius(), 0.5);
    }
}
