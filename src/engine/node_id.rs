//! Node-Identity Table - caller string id → node index.
//!
//! Open addressing over groups of 16 slots with a parallel control-byte array:
//! `0xFF` empty, `0x80` tombstone, otherwise the low 6 bits of the hash. A
//! group is scanned 16 bytes at a time as one `u128`. The start group comes
//! from the hash bits above the tag and further groups follow triangular
//! (quadratic) probing, which visits every group when the group count is a
//! power of two. The first match in probe order wins.
//!
//! The table is sized for the worst case and never grows or evicts.

use crate::error::{EngineError, Result};

use super::hash_name;
use super::tree::NodeIndex;

pub const GROUP_WIDTH: usize = 16;

const CTRL_EMPTY: u8 = 0xFF;
const CTRL_TOMBSTONE: u8 = 0x80;
const TAG_MASK: u64 = 0x3F;

const LSB: u128 = u128::from_le_bytes([0x01; GROUP_WIDTH]);
const MSB: u128 = u128::from_le_bytes([0x80; GROUP_WIDTH]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeIdEntry {
    pub hash: u64,
    pub node: NodeIndex,
}

#[inline]
fn tag_of(hash: u64) -> u8 {
    (hash & TAG_MASK) as u8
}

// =============================================================================
// Group scanning
// =============================================================================

/// Bit set with one bit per matching slot, at bit `8 * slot + 7`.
#[derive(Clone, Copy)]
struct BitMask(u128);

impl Iterator for BitMask {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(bit / 8)
    }
}

#[derive(Clone, Copy)]
struct Group(u128);

impl Group {
    fn load(ctrl: &[u8]) -> Self {
        let mut bytes = [0u8; GROUP_WIDTH];
        bytes.copy_from_slice(&ctrl[..GROUP_WIDTH]);
        Self(u128::from_le_bytes(bytes))
    }

    /// Slots whose control byte equals `tag`. May report a false positive
    /// next to a real match, so callers compare full hashes.
    fn match_tag(self, tag: u8) -> BitMask {
        let cmp = self.0 ^ (LSB * tag as u128);
        BitMask(cmp.wrapping_sub(LSB) & !cmp & MSB)
    }

    /// Only `0xFF` has both of the two high bits set.
    fn match_empty(self) -> BitMask {
        BitMask(self.0 & (self.0 << 1) & MSB)
    }

    /// Empty and tombstone bytes both have the high bit set; tags never do.
    fn match_empty_or_tombstone(self) -> BitMask {
        BitMask(self.0 & MSB)
    }
}

// =============================================================================
// Table
// =============================================================================

#[derive(Debug, Clone)]
pub struct NodeIdTable {
    ctrl: Vec<u8>,
    entries: Vec<NodeIdEntry>,
    group_mask: usize,
    len: usize,
}

impl NodeIdTable {
    /// A table of `groups` × 16 slots. `groups` is rounded up to a power of two.
    pub fn new(groups: usize) -> Self {
        let groups = groups.max(1).next_power_of_two();
        let slots = groups * GROUP_WIDTH;
        Self {
            ctrl: vec![CTRL_EMPTY; slots],
            entries: vec![NodeIdEntry::default(); slots],
            group_mask: groups - 1,
            len: 0,
        }
    }

    /// Group visited at `step` of the probe sequence for `hash`.
    #[inline]
    fn probe_group(&self, hash: u64, step: usize) -> usize {
        let start = (hash >> 7) as usize;
        start.wrapping_add(step * (step + 1) / 2) & self.group_mask
    }

    #[inline]
    fn groups(&self) -> usize {
        self.group_mask + 1
    }

    /// Map `id` to `node`. A second insert of the same id is ignored.
    pub fn set_node_id(&mut self, id: &str, node: NodeIndex) -> Result<()> {
        self.insert_hash(hash_name(id), node)
    }

    pub fn insert_hash(&mut self, hash: u64, node: NodeIndex) -> Result<()> {
        let tag = tag_of(hash);
        let mut free_slot: Option<usize> = None;

        for step in 0..self.groups() {
            let base = self.probe_group(hash, step) * GROUP_WIDTH;
            let group = Group::load(&self.ctrl[base..]);

            for i in group.match_tag(tag) {
                if self.entries[base + i].hash == hash && self.ctrl[base + i] == tag {
                    return Ok(());
                }
            }
            if free_slot.is_none() {
                free_slot = group.match_empty_or_tombstone().next().map(|i| base + i);
            }
            if group.match_empty().next().is_some() {
                break;
            }
        }

        let Some(slot) = free_slot else {
            let capacity = self.capacity();
            tracing::warn!(capacity, "node id table full");
            return Err(EngineError::NodeIdTableFull { capacity });
        };
        self.ctrl[slot] = tag;
        self.entries[slot] = NodeIdEntry { hash, node };
        self.len += 1;
        Ok(())
    }

    /// Whether `insert_hash(hash, _)` would succeed. Read-only.
    pub fn can_insert_hash(&self, hash: u64) -> bool {
        self.len < self.capacity() || self.find_slot(hash).is_some()
    }

    pub fn find_node_by_id(&self, id: &str) -> Option<NodeIndex> {
        self.find_hash(hash_name(id))
    }

    pub fn find_hash(&self, hash: u64) -> Option<NodeIndex> {
        self.find_slot(hash).map(|slot| self.entries[slot].node)
    }

    fn find_slot(&self, hash: u64) -> Option<usize> {
        let tag = tag_of(hash);
        for step in 0..self.groups() {
            let base = self.probe_group(hash, step) * GROUP_WIDTH;
            let group = Group::load(&self.ctrl[base..]);
            for i in group.match_tag(tag) {
                if self.entries[base + i].hash == hash && self.ctrl[base + i] == tag {
                    return Some(base + i);
                }
            }
            if group.match_empty().next().is_some() {
                return None;
            }
        }
        None
    }

    /// Tombstone the entry for `id`. Probe chains through it stay intact.
    pub fn remove(&mut self, id: &str) -> Option<NodeIndex> {
        self.remove_hash(hash_name(id))
    }

    pub fn remove_hash(&mut self, hash: u64) -> Option<NodeIndex> {
        let slot = self.find_slot(hash)?;
        self.ctrl[slot] = CTRL_TOMBSTONE;
        self.len -= 1;
        Some(self.entries[slot].node)
    }

    /// Forget every id.
    pub fn clear(&mut self) {
        self.ctrl.fill(CTRL_EMPTY);
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.ctrl.len()
    }
}
