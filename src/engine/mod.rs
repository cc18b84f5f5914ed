//! Engine - Layout tree, box model and the two lookup tables it depends on.
//!
//! The engine manages the core data structures of one subtree:
//! - Tree: node arena with stable integer links and the construction parent stack
//! - BoxModel: Outer/Inner/Content rectangles derived from border and padding
//! - Resource: keyed blob cache with strict LRU eviction
//! - NodeId: caller string id → node index, group-probed
//!
//! # Architecture
//!
//! Nodes are NOT objects holding pointers. They are indices into one arena:
//!
//! ```text
//! Index 0: root   (parent=None, first_child=1)
//! Index 1: window (parent=0,    first_child=2, next_sibling=None)
//! Index 2: label  (parent=1,    text resource key = (tree, Text, 2))
//! ```
//!
//! Links, cache chains and LRU order are all index fields into fixed-capacity
//! storage, so nothing allocates or moves mid-frame.

mod box_model;
mod node_id;
mod payload;
pub mod resource;
mod tree;

pub use box_model::*;
pub use node_id::*;
pub use payload::*;
pub use resource::{CacheStats, ResourceHandle, ResourceKey, ResourceTable, ResourceType};
pub use tree::*;

use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Finalizer so that both the low bits (tags, buckets) and the high bits
/// (group selection) of a hash are well mixed.
#[inline]
pub(crate) fn mix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

/// Hash a caller-supplied name (node ids, global resource names).
#[inline]
pub fn hash_name(name: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(name.as_bytes());
    mix64(hasher.finish())
}
