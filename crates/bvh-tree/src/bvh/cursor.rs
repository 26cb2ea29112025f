//! Transform-carrying cursor over a hierarchy.

use nalgebra::{Matrix4, Point3};

use crate::transform::{RIGID_EPSILON, is_rigid_transform};
use crate::{BoundingSphere, Triangle};

use super::node::{BvhNode, NodeKind};
use super::tree::BvhTree;

/// One subtree of a [`BvhTree`], placed in world space for a single query.
///
/// A cursor borrows the tree, the vertex array and the transform; it is
/// `Copy` and is passed by value through the recursion, so it can never
/// outlive the call that created it.
///
/// The transform must be rigid. Node radii are reused as-is in world space,
/// and debug builds assert this when a cursor is created.
#[derive(Debug, Clone, Copy)]
pub struct BvhCursor<'a> {
    tree: &'a BvhTree,
    node: usize,
    vertices: &'a [Point3<f32>],
    transform: &'a Matrix4<f32>,
}

impl<'a> BvhCursor<'a> {
    /// Creates a cursor at the root of `tree`.
    pub fn new(
        tree: &'a BvhTree,
        vertices: &'a [Point3<f32>],
        transform: &'a Matrix4<f32>,
    ) -> Self {
        debug_assert!(
            is_rigid_transform(transform, RIGID_EPSILON),
            "BVH transforms must be rotation + translation only"
        );
        Self {
            tree,
            node: tree.root_index(),
            vertices,
            transform,
        }
    }

    /// The same placement, moved to another node of the tree.
    #[inline]
    pub fn child(self, node: usize) -> Self {
        Self { node, ..self }
    }

    /// Index of the current node.
    #[inline]
    pub fn index(&self) -> usize {
        self.node
    }

    #[inline]
    pub fn node(&self) -> &'a BvhNode {
        self.tree.node(self.node)
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.node().kind()
    }

    #[inline]
    pub fn tree(&self) -> &'a BvhTree {
        self.tree
    }

    #[inline]
    pub fn transform(&self) -> &'a Matrix4<f32> {
        self.transform
    }

    /// Local radius of the current node's sphere.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.node().sphere().radius()
    }

    /// The current node's sphere, moved into world space.
    #[inline]
    pub fn world_sphere(&self) -> BoundingSphere {
        self.node().sphere().transformed(self.transform)
    }

    /// World-space vertices of a leaf's triangle.
    #[inline]
    pub fn world_triangle(&self, indices: [usize; 3]) -> Triangle {
        Triangle::from_indices(self.vertices, indices).transformed(self.transform)
    }
}
