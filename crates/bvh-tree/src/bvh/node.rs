//! BVH node implementation.

use nalgebra::Point3;

use crate::BoundingSphere;

/// What a node holds: one triangle, or two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A single triangle, as three indices into the shared vertex array.
    Leaf { triangle: [usize; 3] },
    /// Two child nodes, as indices into the tree's node array.
    Inner { left: usize, right: usize },
}

/// A node in the bounding volume hierarchy.
///
/// Every node carries a bounding sphere in the hierarchy's local space. A
/// leaf's sphere tightly bounds its triangle. An inner node's sphere bounds
/// every vertex of every triangle below it; it is computed from those vertices
/// rather than from the two child spheres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    sphere: BoundingSphere,
    kind: NodeKind,
}

impl BvhNode {
    /// Creates a leaf for one triangle.
    ///
    /// The sphere stays zero-sized until the builder assigns it.
    pub fn leaf(triangle: [usize; 3]) -> Self {
        Self {
            sphere: BoundingSphere::new(Point3::origin(), 0.0),
            kind: NodeKind::Leaf { triangle },
        }
    }

    /// Creates an inner node over two existing nodes.
    pub fn inner(left: usize, right: usize, sphere: BoundingSphere) -> Self {
        Self {
            sphere,
            kind: NodeKind::Inner { left, right },
        }
    }

    /// Returns the bounding sphere in local space.
    #[inline]
    pub fn sphere(&self) -> &BoundingSphere {
        &self.sphere
    }

    #[inline]
    pub(crate) fn set_sphere(&mut self, sphere: BoundingSphere) {
        self.sphere = sphere;
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Checks if this node references a triangle.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Returns the triangle's vertex indices, if this is a leaf.
    #[inline]
    pub fn triangle(&self) -> Option<[usize; 3]> {
        match self.kind {
            NodeKind::Leaf { triangle } => Some(triangle),
            NodeKind::Inner { .. } => None,
        }
    }

    /// Returns `(left, right)`, if this is an inner node.
    #[inline]
    pub fn children(&self) -> Option<(usize, usize)> {
        match self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Inner { left, right } => Some((left, right)),
        }
    }
}
