//! Error types for spark-ui.
//!
//! Capacity exhaustion is fail-closed: the operation returns an error and
//! nothing in the tree, cache or identity table is modified. Invalid indices
//! on hot paths are debug assertions; the checked APIs below report them as
//! [`EngineError::InvalidNode`].

use thiserror::Error;

use crate::config::ConfigError;
use crate::engine::resource::ResourceType;

/// Everything that can go wrong inside one subtree.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// The layout tree arena has no free node slot this frame.
    #[error("layout tree is full ({capacity} nodes)")]
    TreeFull { capacity: usize },

    /// Every slot of the node-identity table is occupied.
    #[error("node id table is full ({capacity} slots)")]
    NodeIdTableFull { capacity: usize },

    /// The per-frame event list reached its capacity.
    #[error("event list is full ({capacity} events)")]
    EventListFull { capacity: usize },

    /// A node index outside the current tree.
    #[error("node index {index} out of range (tree has {count} nodes)")]
    InvalidNode { index: usize, count: usize },

    /// A query for a resource that was never created for this node.
    #[error("no {kind:?} resource for node {node}")]
    MissingResource { node: usize, kind: ResourceType },

    /// An image was referenced by name before being loaded.
    #[error("image '{name}' has not been loaded")]
    ImageNotLoaded { name: String },

    /// `end()` was called with no open container.
    #[error("parent stack underflow: no open container to close")]
    ParentStackUnderflow,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias used across the engine.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
