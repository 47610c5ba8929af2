//! Hash-consed node store: the arena that backs every BDD in this crate.
//!
//! Nodes are addressed by index, never by pointer (see `DESIGN.md` for why:
//! trivial serialization, cheap equality, no lifetimes to thread through
//! the transforms). Indices `0..NUM_LEAVES` are permanently reserved for the
//! 256 leaf values; everything from `NUM_LEAVES` upward is an internal node
//! allocated by [`NodeStore::lookup`].

use crate::error::BirpError;
use std::fmt;

/// Number of reserved leaf slots, one per possible 8-bit pixel value.
pub const NUM_LEAVES: u32 = 256;

/// Spec capacity ceiling for the node table (`2^24`). [`NodeStore::new`]
/// uses a much smaller practical default; pass this to
/// [`NodeStore::with_capacity`] for the full-size store.
pub const NODES_MAX: u32 = 1 << 24;

/// Highest level a node may carry. The serializer's single-byte tag
/// (`'@' + level`) caps levels at 32; [`NodeStore::lookup`] does not enforce
/// this itself (levels above 32 are perfectly constructible BDD nodes), but
/// the serializer rejects them.
pub const MAX_LEVEL: u8 = 32;

/// Opaque index into the node store. Valid across the lifetime of the
/// [`NodeStore`] that produced it; indices from different stores must never
/// be mixed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The leaf node for constant grayscale value `v`.
    #[inline]
    #[must_use]
    pub const fn leaf(v: u8) -> Self {
        Self(v as u32)
    }

    /// Raw table index, for serialization or diagnostics.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// `true` if this index falls in the reserved leaf range.
    #[inline]
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        self.0 < NUM_LEAVES
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// An internal node's triple. Leaves are not represented here; their
/// "content" is just their index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    level: u8,
    left: u32,
    right: u32,
}

/// A sentinel marking an empty hash slot. Real node indices never reach
/// `u32::MAX` given the `NODES_MAX` ceiling.
const EMPTY_SLOT: u32 = u32::MAX;

/// The hash-consed node table plus its open-addressed dedup index.
///
/// Single-writer, single-reader, append-only: once a node is inserted it is
/// never mutated or removed.
pub struct NodeStore {
    /// `nodes[i]` is valid (and meaningful) only for `i >= NUM_LEAVES`;
    /// lower indices are placeholders so that `nodes.len()` always equals
    /// the next free table index.
    nodes: Vec<Entry>,
    /// Open-addressed hash table, linear probing, never resized.
    hash: Vec<u32>,
    nodes_max: u32,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// A practically-sized store (64k internal nodes, matching hash table).
    /// Comfortable for raster up to a few hundred pixels per side without
    /// pathological (near-random) content; call [`Self::with_capacity`] for
    /// larger inputs or to reach the spec's full `NODES_MAX` ceiling.
    const DEFAULT_NODES_MAX: u32 = 1 << 16;

    /// Construct a store sized for everyday use.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_NODES_MAX, default_hash_size(Self::DEFAULT_NODES_MAX))
    }

    /// Construct a store with an explicit node-table ceiling and hash-table
    /// capacity. `hash_size` should stay comfortably above `nodes_max` to
    /// keep the open-addressed load factor low (the spec requires only
    /// `HASH_SIZE >= NODES_MAX`).
    #[must_use]
    pub fn with_capacity(nodes_max: u32, hash_size: usize) -> Self {
        let mut nodes = Vec::with_capacity(NUM_LEAVES as usize);
        nodes.resize(
            NUM_LEAVES as usize,
            Entry {
                level: 0,
                left: 0,
                right: 0,
            },
        );
        Self {
            nodes,
            hash: vec![EMPTY_SLOT; hash_size.max(1)],
            nodes_max,
        }
    }

    /// Number of internal nodes currently stored (excludes the 256 leaves).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - NUM_LEAVES as usize
    }

    /// `true` if no internal node has been inserted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate every stored internal node's id, in insertion order.
    #[must_use]
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (NUM_LEAVES..self.nodes.len() as u32).map(NodeId)
    }

    /// Level of `id`: `0` for a leaf, otherwise the level it was inserted
    /// with.
    #[must_use]
    pub fn level(&self, id: NodeId) -> u8 {
        if id.is_leaf() {
            0
        } else {
            self.nodes[id.0 as usize].level
        }
    }

    /// Left child of an internal node. Panics if `id` is a leaf; callers
    /// should check [`NodeId::is_leaf`] first (mirrors the source's
    /// `LEFT`/`RIGHT` macros, which are only ever applied to internal
    /// nodes during a level-aware walk).
    #[must_use]
    pub fn left(&self, id: NodeId) -> NodeId {
        NodeId(self.nodes[id.0 as usize].left)
    }

    /// Right child of an internal node. See [`Self::left`].
    #[must_use]
    pub fn right(&self, id: NodeId) -> NodeId {
        NodeId(self.nodes[id.0 as usize].right)
    }

    /// The constant pixel value of a leaf, or `None` for an internal node.
    #[must_use]
    pub fn leaf_value(&self, id: NodeId) -> Option<u8> {
        if id.is_leaf() {
            Some(id.0 as u8)
        } else {
            None
        }
    }

    /// Hash-consed lookup/insert: the sole way to create internal nodes.
    ///
    /// Returns `left` directly (no node stored) when `left == right` — the
    /// "useless test" elimination that keeps the DAG minimal. Otherwise
    /// probes the open-addressed table and either returns an existing
    /// structurally-identical node or allocates a new one.
    ///
    /// # Errors
    /// Returns [`BirpError::StoreFull`] if the hash table has no vacant slot
    /// within one full pass, or the node table has reached `nodes_max`.
    pub fn lookup(&mut self, level: u8, left: NodeId, right: NodeId) -> Result<NodeId, BirpError> {
        if left == right {
            return Ok(left);
        }

        let hash_size = self.hash.len();
        let mut slot = hash_index(level, left.0, right.0, hash_size);
        for _ in 0..hash_size {
            let occupant = self.hash[slot];
            if occupant == EMPTY_SLOT {
                if self.nodes.len() as u32 >= self.nodes_max {
                    return Err(BirpError::StoreFull {
                        capacity: self.nodes_max,
                    });
                }
                let idx = self.nodes.len() as u32;
                self.nodes.push(Entry {
                    level,
                    left: left.0,
                    right: right.0,
                });
                self.hash[slot] = idx;
                if self.len().is_power_of_two() {
                    tracing::trace!(nodes = self.len(), "node store grew");
                }
                return Ok(NodeId(idx));
            }
            let e = self.nodes[occupant as usize];
            if e.level == level && e.left == left.0 && e.right == right.0 {
                return Ok(NodeId(occupant));
            }
            slot = (slot + 1) % hash_size;
        }
        Err(BirpError::StoreFull {
            capacity: hash_size as u32,
        })
    }
}

/// `((left * right + level) & 0x7FFFFFFF) mod hash_size`, computed in
/// 64-bit arithmetic so the product term never overflows for any index
/// bounded by `NODES_MAX`.
fn hash_index(level: u8, left: u32, right: u32, hash_size: usize) -> usize {
    let product = (left as u64) * (right as u64) + (level as u64);
    ((product & 0x7FFF_FFFF) % hash_size as u64) as usize
}

/// A hash table a bit more than double the node capacity, rounded to an odd
/// number (avoids small common-factor cycles under linear probing).
#[must_use]
pub fn default_hash_size(nodes_max: u32) -> usize {
    let size = (nodes_max as usize) * 2 + 1;
    size | 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_children_collapse() {
        let mut store = NodeStore::new();
        let a = NodeId::leaf(7);
        assert_eq!(store.lookup(4, a, a).unwrap(), a);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn structural_sharing() {
        let mut store = NodeStore::new();
        let a = NodeId::leaf(1);
        let b = NodeId::leaf(2);
        let n1 = store.lookup(2, a, b).unwrap();
        let n2 = store.lookup(2, a, b).unwrap();
        assert_eq!(n1, n2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn distinct_triples_get_distinct_nodes() {
        let mut store = NodeStore::new();
        let a = NodeId::leaf(1);
        let b = NodeId::leaf(2);
        let n1 = store.lookup(2, a, b).unwrap();
        let n2 = store.lookup(3, a, b).unwrap();
        let n3 = store.lookup(2, b, a).unwrap();
        assert_ne!(n1, n2);
        assert_ne!(n1, n3);
    }

    #[test]
    fn store_full_reports_capacity() {
        let mut store = NodeStore::with_capacity(NUM_LEAVES + 2, 17);
        let a = NodeId::leaf(1);
        let b = NodeId::leaf(2);
        let c = NodeId::leaf(3);
        let n1 = store.lookup(2, a, b).unwrap();
        let _n2 = store.lookup(2, a, c).unwrap();
        let err = store.lookup(2, b, c).unwrap_err();
        assert!(matches!(err, BirpError::StoreFull { .. }));
        let _ = n1;
    }
}
