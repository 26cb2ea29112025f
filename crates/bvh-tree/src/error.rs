//! Error type for hierarchy construction.

use thiserror::Error;

/// Errors raised while building a [`BvhTree`](crate::BvhTree).
///
/// Construction is the only fallible operation in the crate. Queries are total
/// over any tree produced by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BvhError {
    /// The builder was handed an empty range of leaves.
    ///
    /// Callers must filter out empty meshes before building a hierarchy.
    #[error("cannot build a bounding volume hierarchy from an empty leaf list")]
    EmptyLeafList,
}

/// Result alias used by construction functions.
pub type Result<T> = std::result::Result<T, BvhError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_leaf_list_message() {
        let message = BvhError::EmptyLeafList.to_string();
        assert!(message.contains("empty leaf list"));
    }
}
