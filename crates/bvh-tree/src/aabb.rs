//! Axis-aligned bounding boxes.

use nalgebra::{Point3, Vector3};

use crate::BoundingSphere;

/// One of the three coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Index of the axis into a point's coordinates.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// An axis-aligned bounding box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    min: Point3<f32>,
    max: Point3<f32>,
}

impl Aabb {
    /// Creates a box from two corners. `min` must not exceed `max` on any axis.
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// An inverted box that any grow operation replaces.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Point3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }

    /// Builds the box bounding a set of points, or `None` if there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Self::new(first, first);
        for point in points {
            aabb.grow_point(point);
        }
        Some(aabb)
    }

    /// Returns `true` if no point has been added to an [`Aabb::empty`] box.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    pub fn min(&self) -> Point3<f32> {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Point3<f32> {
        self.max
    }

    /// Extends the box to contain `point`.
    pub fn grow_point(&mut self, point: Point3<f32>) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Extends the box to contain the whole of `sphere`.
    pub fn grow_sphere(&mut self, sphere: &BoundingSphere) {
        let r = Vector3::repeat(sphere.radius());
        self.grow_point(sphere.center() - r);
        self.grow_point(sphere.center() + r);
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Side lengths of the box along each axis.
    #[inline]
    pub fn extents(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Returns the axis with the largest extent.
    ///
    /// Ties go to X over Y and Z, then to Y over Z, so the choice is stable for
    /// cubes and flat boxes.
    pub fn longest_axis(&self) -> Axis {
        let e = self.extents();
        if e.x >= e.y && e.x >= e.z {
            Axis::X
        } else if e.y >= e.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_spans_all() {
        let aabb = Aabb::from_points([
            Point3::new(1.0, -2.0, 0.5),
            Point3::new(-1.0, 3.0, 0.0),
            Point3::new(0.0, 0.0, 4.0),
        ])
        .unwrap();

        assert_eq!(aabb.min(), Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max(), Point3::new(1.0, 3.0, 4.0));
        assert_eq!(aabb.center(), Point3::new(0.0, 0.5, 2.0));
    }

    #[test]
    fn longest_axis_tie_breaks() {
        let cube = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        assert_eq!(cube.longest_axis(), Axis::X);

        let yz = Aabb::new(Point3::origin(), Point3::new(0.5, 1.0, 1.0));
        assert_eq!(yz.longest_axis(), Axis::Y);

        let z = Aabb::new(Point3::origin(), Point3::new(0.5, 1.0, 2.0));
        assert_eq!(z.longest_axis(), Axis::Z);
    }

    #[test]
    fn empty_box_grows() {
        let mut aabb = Aabb::empty();
        assert!(aabb.is_empty());

        aabb.grow_sphere(&BoundingSphere::new(Point3::new(1.0, 1.0, 1.0), 0.5));
        assert!(!aabb.is_empty());
        assert_eq!(aabb.min(), Point3::new(0.5, 0.5, 0.5));
        assert_eq!(aabb.max(), Point3::new(1.5, 1.5, 1.5));
    }
}
