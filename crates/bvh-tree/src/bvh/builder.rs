//! Top-down hierarchy construction.
//!
//! The builder works on a node array whose prefix is the unordered list of
//! leaves. Each call reorders its leaf range in place, recurses on both
//! halves and appends one inner node, so the root always ends up last.

use nalgebra::Point3;

use crate::error::{BvhError, Result};
use crate::{Aabb, BoundingSphere, Triangle};

use super::node::BvhNode;

/// Builds the subtree over the leaves in `nodes[start..end]` and returns its index.
///
/// A single leaf is its own subtree and only gets its sphere assigned.
/// Otherwise the range is split along the longest axis of its bounding box
/// around the sphere center, falling back to an even split when every leaf
/// lands on one side.
///
/// # Errors
/// Returns [`BvhError::EmptyLeafList`] if the range is empty.
pub(crate) fn build_range(
    nodes: &mut Vec<BvhNode>,
    vertices: &[Point3<f32>],
    start: usize,
    end: usize,
) -> Result<usize> {
    if start >= end {
        return Err(BvhError::EmptyLeafList);
    }

    let aabb = Aabb::from_points(leaf_points(&nodes[start..end], vertices))
        .ok_or(BvhError::EmptyLeafList)?;
    let sphere = BoundingSphere::around(aabb.center(), leaf_points(&nodes[start..end], vertices));

    if end - start == 1 {
        nodes[start].set_sphere(sphere);
        return Ok(start);
    }

    let axis = aabb.longest_axis().index();
    let split = sphere.center()[axis];
    let mut mid = start
        + partition(&mut nodes[start..end], |leaf| {
            leaf.triangle()
                .is_some_and(|t| Triangle::from_indices(vertices, t).centroid()[axis] < split)
        });

    // Coincident centroids put everything on one side.
    if mid == start || mid == end {
        mid = start + (end - start) / 2;
    }

    let left = build_range(nodes, vertices, start, mid)?;
    let right = build_range(nodes, vertices, mid, end)?;

    nodes.push(BvhNode::inner(left, right, sphere));
    Ok(nodes.len() - 1)
}

/// All triangle vertices referenced by a range of leaves.
fn leaf_points<'a>(
    leaves: &'a [BvhNode],
    vertices: &'a [Point3<f32>],
) -> impl Iterator<Item = Point3<f32>> + Clone + 'a {
    leaves
        .iter()
        .filter_map(BvhNode::triangle)
        .flat_map(move |triangle| triangle.map(|i| vertices[i]))
}

/// Moves every leaf satisfying `goes_left` to the front and returns how many there are.
///
/// Two cursors walk in from both ends and swap misplaced pairs until they meet.
fn partition<F>(leaves: &mut [BvhNode], goes_left: F) -> usize
where
    F: Fn(&BvhNode) -> bool,
{
    let mut lo = 0;
    let mut hi = leaves.len();
    loop {
        while lo < hi && goes_left(&leaves[lo]) {
            lo += 1;
        }
        while lo < hi && !goes_left(&leaves[hi - 1]) {
            hi -= 1;
        }
        if lo >= hi {
            return lo;
        }
        leaves.swap(lo, hi - 1);
        lo += 1;
        hi -= 1;
    }
}
