//! Bounding volume hierarchy over triangle meshes.
//!
//! This module provides a binary tree of bounding spheres built top-down over
//! the triangles of a mesh, and the collision queries that walk one or two
//! such trees. The tree enables:
//!
//! - Exhaustive triangle/triangle contact collection between two meshes
//! - Fast single-contact queries with nearest-child-first search
//! - Mesh vs. sphere and local point containment tests
//!
//! # Example
//!
//! ```ignore
//! use bvh_tree::BvhTree;
//! use nalgebra::{Isometry3, Point3, Vector3};
//!
//! let tree = BvhTree::from_indices(&vertices, &indices)?;
//!
//! // Place two copies of the mesh in the world and collide them
//! let here = Isometry3::identity().to_homogeneous();
//! let there = Isometry3::translation(0.5, 0.0, 0.0).to_homogeneous();
//! let mut contacts = Vec::new();
//! tree.cursor(&vertices, &here)
//!     .collide_all(tree.cursor(&vertices, &there), &mut contacts);
//! ```
//!
//! # Architecture
//!
//! - [`BvhTree`]: Flat, append-only node array with the root last
//! - [`BvhNode`]: A bounding sphere plus either a triangle or two children
//! - [`BvhCursor`]: A subtree placed in world space for one query
//! - [`QueryStats`]: Counters for observing pruning

mod builder;
mod cursor;
mod node;
mod query;
mod tree;

pub use cursor::BvhCursor;
pub use node::{BvhNode, NodeKind};
pub use query::QueryStats;
pub use tree::BvhTree;
