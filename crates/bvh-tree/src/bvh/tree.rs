//! BVH container and construction.

use log::debug;
use nalgebra::{Matrix4, Point3};

use crate::error::{BvhError, Result};
use crate::transform::{RIGID_EPSILON, is_rigid_transform};
use crate::{Aabb, BoundingSphere, Triangle};

use super::builder::build_range;
use super::cursor::BvhCursor;
use super::node::{BvhNode, NodeKind};

/// A bounding sphere hierarchy over a triangle mesh.
///
/// The tree stores a flat node array: the first `leaf_count()` entries are
/// leaves and the inner nodes follow, with the root always last. Nodes
/// reference triangles by vertex index; the vertex array itself stays with the
/// caller and must be passed, unchanged, to every construction and query call.
///
/// # Construction
///
/// ```ignore
/// use bvh_tree::BvhTree;
///
/// let tree = BvhTree::build(&vertices, vec![[0, 1, 2], [2, 1, 3]])?;
/// ```
///
/// # Queries
///
/// Queries run through a [`BvhCursor`], which places the tree in world space
/// with a rigid transform for the duration of one call:
///
/// ```ignore
/// let a = tree_a.cursor(&vertices_a, &transform_a);
/// let b = tree_b.cursor(&vertices_b, &transform_b);
/// let mut contacts = Vec::new();
/// if a.collide_all(b, &mut contacts) { /* ... */ }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BvhTree {
    nodes: Vec<BvhNode>,
}

impl BvhTree {
    /// Builds a hierarchy from one vertex-index triple per triangle.
    ///
    /// # Errors
    /// Returns [`BvhError::EmptyLeafList`] if `triangles` is empty.
    ///
    /// # Panics
    /// Panics if a triangle references a vertex outside `vertices`.
    pub fn build(vertices: &[Point3<f32>], triangles: Vec<[usize; 3]>) -> Result<Self> {
        if triangles.is_empty() {
            return Err(BvhError::EmptyLeafList);
        }

        let leaf_count = triangles.len();
        let mut nodes = Vec::with_capacity(2 * leaf_count - 1);
        nodes.extend(triangles.into_iter().map(BvhNode::leaf));
        build_range(&mut nodes, vertices, 0, leaf_count)?;

        let tree = Self { nodes };
        debug!(
            "built BVH: {} leaves, {} nodes, depth {}",
            leaf_count,
            tree.size(),
            tree.depth()
        );
        Ok(tree)
    }

    /// Builds a hierarchy from a flat index buffer, three indices per triangle.
    ///
    /// Trailing indices that do not form a full triangle are ignored.
    pub fn from_indices(vertices: &[Point3<f32>], indices: &[u32]) -> Result<Self> {
        let triangles = indices
            .chunks_exact(3)
            .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
            .collect();
        Self::build(vertices, triangles)
    }

    /// Like [`BvhTree::from_indices`], but drops degenerate triangles first.
    ///
    /// A triangle is degenerate if an edge is shorter than `epsilon` or its
    /// area vanishes (see [`Triangle::is_degenerate`]).
    pub fn from_mesh(vertices: &[Point3<f32>], indices: &[u32], epsilon: f32) -> Result<Self> {
        let total = indices.len() / 3;
        let triangles: Vec<[usize; 3]> = indices
            .chunks_exact(3)
            .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
            .filter(|&t| !Triangle::from_indices(vertices, t).is_degenerate(epsilon))
            .collect();

        if triangles.len() < total {
            debug!(
                "dropped {} degenerate triangles of {}",
                total - triangles.len(),
                total
            );
        }
        Self::build(vertices, triangles)
    }

    /// Total number of nodes, `2 * leaf_count() - 1`.
    #[inline]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Number of triangles in the tree.
    #[inline]
    pub fn leaf_count(&self) -> usize {
        (self.nodes.len() + 1) / 2
    }

    /// Index of the root node, always the last one.
    #[inline]
    pub fn root_index(&self) -> usize {
        self.nodes.len() - 1
    }

    #[inline]
    pub fn root(&self) -> &BvhNode {
        &self.nodes[self.root_index()]
    }

    /// Returns the node at `index`.
    ///
    /// # Panics
    /// Panics if `index >= size()`.
    #[inline]
    pub fn node(&self, index: usize) -> &BvhNode {
        &self.nodes[index]
    }

    #[inline]
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Returns the number of levels (1 for a single triangle).
    pub fn depth(&self) -> usize {
        self.depth_from(self.root_index())
    }

    fn depth_from(&self, index: usize) -> usize {
        match self.nodes[index].kind() {
            NodeKind::Leaf { .. } => 1,
            NodeKind::Inner { left, right } => {
                1 + self.depth_from(left).max(self.depth_from(right))
            }
        }
    }

    /// Places the tree in world space for a query.
    pub fn cursor<'a>(
        &'a self,
        vertices: &'a [Point3<f32>],
        transform: &'a Matrix4<f32>,
    ) -> BvhCursor<'a> {
        BvhCursor::new(self, vertices, transform)
    }

    /// Returns `true` if a point in the tree's local space falls inside some
    /// leaf's bounding sphere.
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        self.contains_point_from(self.root_index(), point)
    }

    pub(crate) fn contains_point_from(&self, index: usize, point: Point3<f32>) -> bool {
        let node = &self.nodes[index];
        if !node.sphere().contains_point(point) {
            return false;
        }
        match node.kind() {
            NodeKind::Leaf { .. } => true,
            NodeKind::Inner { left, right } => {
                self.contains_point_from(left, point) || self.contains_point_from(right, point)
            }
        }
    }

    /// Moves every node's sphere center through a rigid transform.
    ///
    /// The structure is not rebuilt, so this is meant for rebasing a tree,
    /// not for per-frame placement (use a cursor transform for that). The
    /// vertex array is left alone: callers must transform it the same way
    /// before querying again.
    pub fn rigid_transform(&mut self, transform: &Matrix4<f32>) {
        debug_assert!(
            is_rigid_transform(transform, RIGID_EPSILON),
            "BVH transforms must be rotation + translation only"
        );
        for node in &mut self.nodes {
            let moved = node.sphere().transformed(transform);
            node.set_sphere(moved);
        }
    }

    /// Axis-aligned box enclosing every node sphere.
    pub fn compute_min_max(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for node in &self.nodes {
            aabb.grow_sphere(node.sphere());
        }
        aabb
    }

    /// Collects the spheres of all nodes exactly `depth` edges below the root.
    ///
    /// Intended for debug drawing. Leaves above `depth` contribute nothing.
    pub fn collect_at_depth(&self, depth: usize) -> Vec<BoundingSphere> {
        let mut spheres = Vec::new();
        self.collect_at_depth_from(self.root_index(), depth, &mut spheres);
        spheres
    }

    fn collect_at_depth_from(&self, index: usize, remaining: usize, out: &mut Vec<BoundingSphere>) {
        let node = &self.nodes[index];
        if remaining == 0 {
            out.push(*node.sphere());
            return;
        }
        if let NodeKind::Inner { left, right } = node.kind() {
            self.collect_at_depth_from(left, remaining - 1, out);
            self.collect_at_depth_from(right, remaining - 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Isometry3, Translation3, Vector3};

    /// Four triangles on a 2x2 grid in the z = 0 plane.
    fn grid() -> (Vec<Point3<f32>>, Vec<[usize; 3]>) {
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for i in 0..2 {
            for j in 0..2 {
                let base = vertices.len();
                let (x, y) = (i as f32 * 3.0, j as f32 * 3.0);
                vertices.push(Point3::new(x, y, 0.0));
                vertices.push(Point3::new(x + 1.0, y, 0.0));
                vertices.push(Point3::new(x, y + 1.0, 0.0));
                triangles.push([base, base + 1, base + 2]);
            }
        }
        (vertices, triangles)
    }

    #[test]
    fn build_empty_fails() {
        assert_eq!(BvhTree::build(&[], vec![]), Err(BvhError::EmptyLeafList));
    }

    #[test]
    fn build_single_triangle() {
        let (vertices, triangles) = grid();
        let tree = BvhTree::build(&vertices, triangles[..1].to_vec()).unwrap();

        assert_eq!(tree.size(), 1);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.root_index(), 0);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn build_grid() {
        let (vertices, triangles) = grid();
        let tree = BvhTree::build(&vertices, triangles).unwrap();

        assert_eq!(tree.size(), 7);
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.root_index(), 6);
        assert!(!tree.root().is_leaf());
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn from_indices_reads_triples() {
        let (vertices, _) = grid();
        let indices = [0, 1, 2, 3, 4, 5, 6, 7];
        let tree = BvhTree::from_indices(&vertices, &indices).unwrap();
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn from_mesh_drops_degenerate() {
        let mut vertices = grid().0;
        vertices.push(Point3::new(0.0, 0.0, 0.0));
        let indices = [0, 1, 2, 0, 12, 1, 3, 4, 5];
        let tree = BvhTree::from_mesh(&vertices, &indices, crate::DEGENERATE_EPSILON).unwrap();
        assert_eq!(tree.leaf_count(), 2);

        let only_degenerate = [0, 12, 1];
        assert_eq!(
            BvhTree::from_mesh(&vertices, &only_degenerate, crate::DEGENERATE_EPSILON),
            Err(BvhError::EmptyLeafList)
        );
    }

    #[test]
    fn contains_point_in_leaf_sphere() {
        let (vertices, triangles) = grid();
        let tree = BvhTree::build(&vertices, triangles).unwrap();

        assert!(tree.contains_point(Point3::new(0.2, 0.2, 0.0)));
        assert!(tree.contains_point(Point3::new(3.2, 3.2, 0.1)));
        // Between the triangles: inside the root sphere, outside every leaf sphere.
        assert!(!tree.contains_point(Point3::new(2.0, 2.0, 0.0)));
        assert!(!tree.contains_point(Point3::new(50.0, 0.0, 0.0)));
    }

    #[test]
    fn compute_min_max_covers_spheres() {
        let (vertices, triangles) = grid();
        let tree = BvhTree::build(&vertices, triangles).unwrap();
        let aabb = tree.compute_min_max();

        // Child spheres can bulge past the root sphere, so every node counts.
        let min_x = tree
            .nodes()
            .iter()
            .map(|n| n.sphere().center().x - n.sphere().radius())
            .fold(f32::MAX, f32::min);
        assert_relative_eq!(aabb.min().x, min_x);

        for node in tree.nodes() {
            let r = Vector3::repeat(node.sphere().radius());
            let lo = node.sphere().center() - r;
            let hi = node.sphere().center() + r;
            assert!(aabb.min().x <= lo.x && aabb.min().y <= lo.y && aabb.min().z <= lo.z);
            assert!(aabb.max().x >= hi.x && aabb.max().y >= hi.y && aabb.max().z >= hi.z);
        }
    }

    #[test]
    fn collect_at_depth_levels() {
        let (vertices, triangles) = grid();
        let tree = BvhTree::build(&vertices, triangles).unwrap();

        assert_eq!(tree.collect_at_depth(0), vec![*tree.root().sphere()]);
        assert_eq!(tree.collect_at_depth(1).len(), 2);
        assert_eq!(tree.collect_at_depth(2).len(), 4);
        assert!(tree.collect_at_depth(3).is_empty());
    }

    #[test]
    fn rigid_transform_moves_centers() {
        let (vertices, triangles) = grid();
        let mut tree = BvhTree::build(&vertices, triangles).unwrap();
        let before = tree.clone();

        let shift = Translation3::new(10.0, 0.0, -2.0).to_homogeneous();
        tree.rigid_transform(&shift);

        for (moved, original) in tree.nodes().iter().zip(before.nodes()) {
            assert_eq!(moved.kind(), original.kind());
            assert_eq!(moved.sphere().radius(), original.sphere().radius());
            assert_relative_eq!(
                moved.sphere().center(),
                original.sphere().center() + Vector3::new(10.0, 0.0, -2.0)
            );
        }
    }

    #[test]
    fn rigid_transform_round_trip() {
        let (vertices, triangles) = grid();
        let mut tree = BvhTree::build(&vertices, triangles).unwrap();
        let before = tree.clone();

        let iso = Isometry3::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.2, -0.4, 0.9));
        tree.rigid_transform(&iso.to_homogeneous());
        tree.rigid_transform(&iso.inverse().to_homogeneous());

        for (node, original) in tree.nodes().iter().zip(before.nodes()) {
            assert_relative_eq!(node.sphere().center(), original.sphere().center(), epsilon = 1e-4);
        }
    }
}
