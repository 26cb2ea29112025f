//! Bounding sphere hierarchies and triangle mesh collision.

mod aabb;
pub mod bvh;
mod error;
mod intersect;
mod sphere;
mod transform;
mod triangle;

pub use aabb::{Aabb, Axis};
pub use bvh::{BvhCursor, BvhNode, BvhTree, NodeKind, QueryStats};
pub use error::{BvhError, Result};
pub use intersect::{TRIANGLE_EPSILON, triangles_intersect};
pub use sphere::BoundingSphere;
pub use transform::{RIGID_EPSILON, is_rigid_transform};
pub use triangle::{DEGENERATE_EPSILON, Triangle};
