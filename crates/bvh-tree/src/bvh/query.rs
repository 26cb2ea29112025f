//! Collision queries over one or two placed hierarchies.
//!
//! Every query starts a branch with the same test: the current node spheres,
//! moved into world space, must overlap. That sphere test is the only pruning
//! step. Queries never mutate the trees.

use log::trace;
use nalgebra::Point3;

use crate::intersect::TRIANGLE_EPSILON;
use crate::BoundingSphere;

use super::cursor::BvhCursor;
use super::node::NodeKind;

/// Counters filled in by the `*_with_stats` queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Node pairs whose spheres were compared. For sphere queries, nodes
    /// compared against the query sphere.
    pub node_pairs: usize,
    /// Leaf pairs handed to the exact triangle test.
    pub triangle_tests: usize,
    /// Contacts appended to the output list.
    pub contacts: usize,
}

impl BvhCursor<'_> {
    /// Finds every intersecting triangle pair between two placed hierarchies.
    ///
    /// Each hit appends the mean of the pair's six world-space vertices to
    /// `contacts`. That point approximates the contact; it is not the exact
    /// intersection. Returns `true` if at least one pair intersects.
    pub fn collide_all(self, other: BvhCursor<'_>, contacts: &mut Vec<Point3<f32>>) -> bool {
        self.collide_all_with_epsilon(other, contacts, TRIANGLE_EPSILON)
    }

    /// [`collide_all`](Self::collide_all) with a custom triangle-test tolerance.
    pub fn collide_all_with_epsilon(
        self,
        other: BvhCursor<'_>,
        contacts: &mut Vec<Point3<f32>>,
        epsilon: f32,
    ) -> bool {
        let mut stats = QueryStats::default();
        let hit = collide_all_recursive(self, other, contacts, epsilon, &mut stats);
        trace!("collide_all: {:?}", stats);
        hit
    }

    /// [`collide_all`](Self::collide_all), also counting the work done.
    pub fn collide_all_with_stats(
        self,
        other: BvhCursor<'_>,
        contacts: &mut Vec<Point3<f32>>,
        stats: &mut QueryStats,
    ) -> bool {
        collide_all_recursive(self, other, contacts, TRIANGLE_EPSILON, stats)
    }

    /// Finds one contact point, searching nearer children first.
    ///
    /// The search stops at the first intersecting triangle pair, so the point
    /// returned is *a* contact, not necessarily the closest one.
    pub fn closest_collision(self, other: BvhCursor<'_>) -> Option<Point3<f32>> {
        self.closest_collision_with_epsilon(other, TRIANGLE_EPSILON)
    }

    /// [`closest_collision`](Self::closest_collision) with a custom triangle-test tolerance.
    pub fn closest_collision_with_epsilon(
        self,
        other: BvhCursor<'_>,
        epsilon: f32,
    ) -> Option<Point3<f32>> {
        let mut stats = QueryStats::default();
        let mut best = None;
        closest_recursive(self, other, &mut best, epsilon, &mut stats);
        trace!("closest_collision: {:?} {:?}", best, stats);
        best
    }

    /// [`closest_collision`](Self::closest_collision), also counting the work done.
    pub fn closest_collision_with_stats(
        self,
        other: BvhCursor<'_>,
        stats: &mut QueryStats,
    ) -> Option<Point3<f32>> {
        let mut best = None;
        closest_recursive(self, other, &mut best, TRIANGLE_EPSILON, stats);
        best
    }

    /// Tests the hierarchy against a world-space sphere.
    ///
    /// Overlap with a leaf's bounding sphere counts as a hit; the triangle
    /// itself is not tested.
    pub fn collide_with_sphere(self, sphere: &BoundingSphere) -> bool {
        self.collide_with_sphere_with_stats(sphere, &mut QueryStats::default())
    }

    /// [`collide_with_sphere`](Self::collide_with_sphere), also counting the
    /// nodes visited.
    pub fn collide_with_sphere_with_stats(
        self,
        sphere: &BoundingSphere,
        stats: &mut QueryStats,
    ) -> bool {
        stats.node_pairs += 1;
        if !self.world_sphere().intersects(sphere) {
            return false;
        }
        match self.kind() {
            NodeKind::Leaf { .. } => {
                stats.contacts += 1;
                true
            }
            NodeKind::Inner { left, right } => {
                let (near, far) = nearest_first(self.child(left), self.child(right), sphere);
                near.collide_with_sphere_with_stats(sphere, stats)
                    || far.collide_with_sphere_with_stats(sphere, stats)
            }
        }
    }

    /// Tests a point in the tree's local space against the leaf spheres.
    ///
    /// The cursor's transform is ignored.
    pub fn contains_point(self, point: Point3<f32>) -> bool {
        self.tree().contains_point_from(self.index(), point)
    }
}

fn collide_all_recursive(
    a: BvhCursor<'_>,
    b: BvhCursor<'_>,
    contacts: &mut Vec<Point3<f32>>,
    epsilon: f32,
    stats: &mut QueryStats,
) -> bool {
    stats.node_pairs += 1;
    if !a.world_sphere().intersects(&b.world_sphere()) {
        return false;
    }

    // Both children are always visited: every contact must be collected.
    match (a.kind(), b.kind()) {
        (NodeKind::Leaf { triangle: ta }, NodeKind::Leaf { triangle: tb }) => {
            stats.triangle_tests += 1;
            let ta = a.world_triangle(ta);
            let tb = b.world_triangle(tb);
            if ta.intersects(&tb, epsilon) {
                contacts.push(ta.mean_with(&tb));
                stats.contacts += 1;
                true
            } else {
                false
            }
        }
        (NodeKind::Inner { left, right }, NodeKind::Leaf { .. }) => {
            let hit_left = collide_all_recursive(a.child(left), b, contacts, epsilon, stats);
            let hit_right = collide_all_recursive(a.child(right), b, contacts, epsilon, stats);
            hit_left || hit_right
        }
        (NodeKind::Leaf { .. }, NodeKind::Inner { left, right }) => {
            let hit_left = collide_all_recursive(a, b.child(left), contacts, epsilon, stats);
            let hit_right = collide_all_recursive(a, b.child(right), contacts, epsilon, stats);
            hit_left || hit_right
        }
        (NodeKind::Inner { left: al, right: ar }, NodeKind::Inner { left: bl, right: br }) => {
            if split_a_first(a, b) {
                let hit_left = collide_all_recursive(a.child(al), b, contacts, epsilon, stats);
                let hit_right = collide_all_recursive(a.child(ar), b, contacts, epsilon, stats);
                hit_left || hit_right
            } else {
                let hit_left = collide_all_recursive(a, b.child(bl), contacts, epsilon, stats);
                let hit_right = collide_all_recursive(a, b.child(br), contacts, epsilon, stats);
                hit_left || hit_right
            }
        }
    }
}

fn closest_recursive(
    a: BvhCursor<'_>,
    b: BvhCursor<'_>,
    best: &mut Option<Point3<f32>>,
    epsilon: f32,
    stats: &mut QueryStats,
) -> bool {
    stats.node_pairs += 1;
    let sphere_a = a.world_sphere();
    let sphere_b = b.world_sphere();
    if !sphere_a.intersects(&sphere_b) {
        return false;
    }

    match (a.kind(), b.kind()) {
        (NodeKind::Leaf { triangle: ta }, NodeKind::Leaf { triangle: tb }) => {
            stats.triangle_tests += 1;
            let ta = a.world_triangle(ta);
            let tb = b.world_triangle(tb);
            if ta.intersects(&tb, epsilon) {
                *best = Some(ta.mean_with(&tb));
                stats.contacts += 1;
                true
            } else {
                false
            }
        }
        (NodeKind::Inner { left, right }, NodeKind::Leaf { .. }) => {
            closest_split_a(a, b, (left, right), &sphere_b, best, epsilon, stats)
        }
        (NodeKind::Leaf { .. }, NodeKind::Inner { left, right }) => {
            closest_split_b(a, b, (left, right), &sphere_a, best, epsilon, stats)
        }
        (NodeKind::Inner { left: al, right: ar }, NodeKind::Inner { left: bl, right: br }) => {
            if split_a_first(a, b) {
                closest_split_a(a, b, (al, ar), &sphere_b, best, epsilon, stats)
            } else {
                closest_split_b(a, b, (bl, br), &sphere_a, best, epsilon, stats)
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn closest_split_a(
    a: BvhCursor<'_>,
    b: BvhCursor<'_>,
    (left, right): (usize, usize),
    target: &BoundingSphere,
    best: &mut Option<Point3<f32>>,
    epsilon: f32,
    stats: &mut QueryStats,
) -> bool {
    let (near, far) = nearest_first(a.child(left), a.child(right), target);
    closest_recursive(near, b, best, epsilon, stats)
        || closest_recursive(far, b, best, epsilon, stats)
}

#[allow(clippy::too_many_arguments)]
fn closest_split_b(
    a: BvhCursor<'_>,
    b: BvhCursor<'_>,
    (left, right): (usize, usize),
    target: &BoundingSphere,
    best: &mut Option<Point3<f32>>,
    epsilon: f32,
    stats: &mut QueryStats,
) -> bool {
    let (near, far) = nearest_first(b.child(left), b.child(right), target);
    closest_recursive(a, near, best, epsilon, stats)
        || closest_recursive(a, far, best, epsilon, stats)
}

/// Between two inner nodes, the one with the larger sphere is split; `a` wins ties.
fn split_a_first(a: BvhCursor<'_>, b: BvhCursor<'_>) -> bool {
    a.radius() >= b.radius()
}

/// Orders two children by the distance of their world-space centers to `target`.
///
/// Ties keep the left child first.
fn nearest_first<'a>(
    left: BvhCursor<'a>,
    right: BvhCursor<'a>,
    target: &BoundingSphere,
) -> (BvhCursor<'a>, BvhCursor<'a>) {
    let left_dist = left.world_sphere().center_distance_squared(target);
    let right_dist = right.world_sphere().center_distance_squared(target);
    if right_dist < left_dist {
        (right, left)
    } else {
        (left, right)
    }
}
