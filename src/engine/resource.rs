//! Resource Cache - Keyed payload store with strict LRU eviction.
//!
//! Fixed number of slots, never grown. Slot 0 is a sentinel: its LRU links
//! close the circular recency list (`next_lru` = most recent, `prev_lru` =
//! least recent) and its `next_hash` heads the free-slot chain. Every other
//! slot is either free (on that chain) or live (on exactly one bucket chain
//! and on the LRU list). All links are slot indices, 0 meaning "none".
//!
//! The cache owns slot bookkeeping only. Payloads are created lazily by the
//! caller and handed over with [`ResourceTable::update_resource_table`].

use std::hash::Hasher;

use rustc_hash::FxHasher;

use super::mix64;
use super::tree::NodeIndex;

const SENTINEL: u32 = 0;

// =============================================================================
// Keys
// =============================================================================

/// Resource categories encoded in the high word of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ResourceType {
    Text = 1,
    ScrollRegion = 2,
    Image = 3,
}

impl ResourceType {
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Text),
            2 => Some(Self::ScrollRegion),
            3 => Some(Self::Image),
            _ => None,
        }
    }
}

/// 128-bit resource identity.
///
/// `lo` is the owning tree's id for node-scoped keys or a name hash for
/// global keys. `hi` is `(type << 32) | node_index`. Equal iff all bits match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResourceKey {
    pub lo: u64,
    pub hi: u64,
}

impl ResourceKey {
    /// Key of a resource owned by one node of one tree.
    pub fn for_node(tree_id: u64, kind: ResourceType, node: NodeIndex) -> Self {
        Self {
            lo: tree_id,
            hi: ((kind as u64) << 32) | (node as u64 & 0xFFFF_FFFF),
        }
    }

    /// Key of a resource shared under a global name. Node index is 0.
    pub fn global(name: &str, kind: ResourceType) -> Self {
        Self {
            lo: super::hash_name(name),
            hi: (kind as u64) << 32,
        }
    }

    /// Decoded type, `None` for a malformed key.
    pub fn resource_type(&self) -> Option<ResourceType> {
        ResourceType::from_u32((self.hi >> 32) as u32)
    }

    pub fn node_index(&self) -> NodeIndex {
        (self.hi & 0xFFFF_FFFF) as NodeIndex
    }

    fn hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write_u64(self.lo);
        hasher.write_u64(self.hi);
        mix64(hasher.finish())
    }
}

/// Slot reference returned by lookups. Stale once the slot is re-keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceHandle {
    slot: u32,
    key: ResourceKey,
}

impl ResourceHandle {
    #[inline]
    pub fn key(&self) -> ResourceKey {
        self.key
    }

    #[inline]
    pub fn slot(&self) -> usize {
        self.slot as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

// =============================================================================
// Table
// =============================================================================

#[derive(Debug, Clone)]
struct ResourceEntry<T> {
    key: ResourceKey,
    payload: Option<T>,
    live: bool,
    next_hash: u32,
    prev_hash: u32,
    next_lru: u32,
    prev_lru: u32,
}

impl<T> ResourceEntry<T> {
    fn empty() -> Self {
        Self {
            key: ResourceKey::default(),
            payload: None,
            live: false,
            next_hash: SENTINEL,
            prev_hash: SENTINEL,
            next_lru: SENTINEL,
            prev_lru: SENTINEL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResourceTable<T> {
    entries: Vec<ResourceEntry<T>>,
    buckets: Vec<u32>,
    bucket_mask: u64,
    live: usize,
    stats: CacheStats,
}

impl<T> ResourceTable<T> {
    /// `slots` usable entries spread over `buckets` chains (rounded up to a
    /// power of two).
    pub fn new(slots: usize, buckets: usize) -> Self {
        let slots = slots.max(1);
        let buckets = buckets.max(1).next_power_of_two();
        let mut table = Self {
            entries: (0..=slots).map(|_| ResourceEntry::empty()).collect(),
            buckets: vec![SENTINEL; buckets],
            bucket_mask: (buckets - 1) as u64,
            live: 0,
            stats: CacheStats::default(),
        };
        table.rebuild_free_chain();
        table
    }

    fn rebuild_free_chain(&mut self) {
        let count = self.entries.len() as u32;
        for (slot, entry) in self.entries.iter_mut().enumerate() {
            *entry = ResourceEntry::empty();
            let next = slot as u32 + 1;
            entry.next_hash = if next < count { next } else { SENTINEL };
        }
        // Empty circular LRU list: the sentinel points at itself.
        self.buckets.fill(SENTINEL);
        self.live = 0;
    }

    #[inline]
    fn bucket_of(&self, key: &ResourceKey) -> usize {
        (key.hash() & self.bucket_mask) as usize
    }

    // -------------------------------------------------------------------------
    // LRU list
    // -------------------------------------------------------------------------

    fn lru_unlink(&mut self, slot: u32) {
        let (prev, next) = {
            let e = &self.entries[slot as usize];
            (e.prev_lru, e.next_lru)
        };
        self.entries[prev as usize].next_lru = next;
        self.entries[next as usize].prev_lru = prev;
        let e = &mut self.entries[slot as usize];
        e.next_lru = SENTINEL;
        e.prev_lru = SENTINEL;
    }

    fn lru_push_front(&mut self, slot: u32) {
        let head = self.entries[SENTINEL as usize].next_lru;
        {
            let e = &mut self.entries[slot as usize];
            e.prev_lru = SENTINEL;
            e.next_lru = head;
        }
        self.entries[head as usize].prev_lru = slot;
        self.entries[SENTINEL as usize].next_lru = slot;
    }

    // -------------------------------------------------------------------------
    // Hash chains
    // -------------------------------------------------------------------------

    fn hash_unlink(&mut self, slot: u32) {
        let (prev, next, bucket) = {
            let e = &self.entries[slot as usize];
            (e.prev_hash, e.next_hash, self.bucket_of(&e.key))
        };
        if prev == SENTINEL {
            self.buckets[bucket] = next;
        } else {
            self.entries[prev as usize].next_hash = next;
        }
        if next != SENTINEL {
            self.entries[next as usize].prev_hash = prev;
        }
        let e = &mut self.entries[slot as usize];
        e.next_hash = SENTINEL;
        e.prev_hash = SENTINEL;
    }

    fn hash_insert(&mut self, slot: u32, bucket: usize) {
        let head = self.buckets[bucket];
        {
            let e = &mut self.entries[slot as usize];
            e.prev_hash = SENTINEL;
            e.next_hash = head;
        }
        if head != SENTINEL {
            self.entries[head as usize].prev_hash = slot;
        }
        self.buckets[bucket] = slot;
    }

    fn find_slot(&self, key: &ResourceKey) -> Option<u32> {
        let mut slot = self.buckets[self.bucket_of(key)];
        while slot != SENTINEL {
            let e = &self.entries[slot as usize];
            if e.key == *key {
                return Some(slot);
            }
            slot = e.next_hash;
        }
        None
    }

    // -------------------------------------------------------------------------
    // Free chain
    // -------------------------------------------------------------------------

    fn pop_free(&mut self) -> Option<u32> {
        let slot = self.entries[SENTINEL as usize].next_hash;
        if slot == SENTINEL {
            return None;
        }
        self.entries[SENTINEL as usize].next_hash = self.entries[slot as usize].next_hash;
        self.entries[slot as usize].next_hash = SENTINEL;
        Some(slot)
    }

    fn push_free(&mut self, slot: u32) {
        let head = self.entries[SENTINEL as usize].next_hash;
        let e = &mut self.entries[slot as usize];
        e.key = ResourceKey::default();
        e.live = false;
        e.prev_hash = SENTINEL;
        e.next_hash = head;
        self.entries[SENTINEL as usize].next_hash = slot;
    }

    fn evict_lru_tail(&mut self) -> u32 {
        let tail = self.entries[SENTINEL as usize].prev_lru;
        debug_assert_ne!(tail, SENTINEL, "eviction with an empty LRU list");
        let evicted = self.entries[tail as usize].key;
        self.hash_unlink(tail);
        self.lru_unlink(tail);
        let e = &mut self.entries[tail as usize];
        e.payload = None;
        e.live = false;
        self.live -= 1;
        self.stats.evictions += 1;
        tracing::debug!(slot = tail, key = ?evicted, "evicted resource");
        tail
    }

    // -------------------------------------------------------------------------
    // Public API
    // -------------------------------------------------------------------------

    /// Find or claim the slot for `key` and mark it most recently used.
    ///
    /// A miss takes a free slot or evicts the least recently used entry, so a
    /// handle is always returned. Its payload is empty until
    /// [`update_resource_table`](Self::update_resource_table) stores one.
    pub fn find_resource_by_key(&mut self, key: ResourceKey) -> ResourceHandle {
        debug_assert!(key.resource_type().is_some(), "malformed resource key {key:?}");

        if let Some(slot) = self.find_slot(&key) {
            self.stats.hits += 1;
            self.lru_unlink(slot);
            self.lru_push_front(slot);
            return ResourceHandle { slot, key };
        }

        self.stats.misses += 1;
        let slot = match self.pop_free() {
            Some(slot) => slot,
            None => self.evict_lru_tail(),
        };
        {
            let e = &mut self.entries[slot as usize];
            e.key = key;
            e.payload = None;
            e.live = true;
        }
        self.live += 1;
        let bucket = self.bucket_of(&key);
        self.hash_insert(slot, bucket);
        self.lru_push_front(slot);
        ResourceHandle { slot, key }
    }

    /// Store `payload` in the slot of `handle`, dropping any previous payload.
    ///
    /// Returns `false` without storing when the handle is stale or does not
    /// belong to `key`.
    pub fn update_resource_table(&mut self, handle: ResourceHandle, key: ResourceKey, payload: T) -> bool {
        debug_assert_eq!(handle.key, key, "handle does not belong to key");
        if handle.key != key {
            return false;
        }
        match self.entries.get_mut(handle.slot as usize) {
            Some(e) if e.live && e.key == key => {
                e.payload = Some(payload);
                true
            }
            _ => false,
        }
    }

    /// Payload behind a handle, `None` if stale or not yet stored.
    pub fn get(&self, handle: ResourceHandle) -> Option<&T> {
        let e = self.entries.get(handle.slot as usize)?;
        if e.live && e.key == handle.key {
            e.payload.as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: ResourceHandle) -> Option<&mut T> {
        let e = self.entries.get_mut(handle.slot as usize)?;
        if e.live && e.key == handle.key {
            e.payload.as_mut()
        } else {
            None
        }
    }

    /// Hit-only lookup: touches recency when present, never claims a slot.
    pub fn lookup(&mut self, key: ResourceKey) -> Option<ResourceHandle> {
        let slot = self.find_slot(&key)?;
        self.stats.hits += 1;
        self.lru_unlink(slot);
        self.lru_push_front(slot);
        Some(ResourceHandle { slot, key })
    }

    /// [`lookup`](Self::lookup) followed by [`get_mut`](Self::get_mut).
    pub fn get_by_key_mut(&mut self, key: ResourceKey) -> Option<&mut T> {
        let handle = self.lookup(key)?;
        self.get_mut(handle)
    }

    /// Read without touching recency or counters.
    pub fn peek(&self, key: ResourceKey) -> Option<&T> {
        let slot = self.find_slot(&key)?;
        self.entries[slot as usize].payload.as_ref()
    }

    /// Release the slot of `key`, returning its payload.
    pub fn remove(&mut self, key: ResourceKey) -> Option<T> {
        let slot = self.find_slot(&key)?;
        self.hash_unlink(slot);
        self.lru_unlink(slot);
        let payload = self.entries[slot as usize].payload.take();
        self.push_free(slot);
        self.live -= 1;
        payload
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = ResourceKey> + '_ {
        let mut slot = self.entries[SENTINEL as usize].next_lru;
        std::iter::from_fn(move || {
            if slot == SENTINEL {
                return None;
            }
            let e = &self.entries[slot as usize];
            slot = e.next_lru;
            Some(e.key)
        })
    }

    /// Drop every payload and return all slots to the free chain.
    pub fn clear(&mut self) {
        self.rebuild_free_chain();
        self.stats = CacheStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Usable slots, sentinel excluded.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len() - 1
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
