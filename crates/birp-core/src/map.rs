//! Pointwise leaf remapping.

use crate::error::BirpError;
use crate::store::{NodeId, NodeStore};
use std::collections::HashMap;

/// Apply `f` to every leaf value reachable from `node`, rebuilding the DAG
/// through [`NodeStore::lookup`] so the result is structurally unique.
///
/// The recursion is memoized by input-node index for efficiency on shared
/// DAGs; correctness does not depend on it, since `lookup` collapses the
/// output regardless of how many times a subtree is visited.
///
/// # Errors
/// Propagates [`BirpError::StoreFull`] from the underlying store.
pub fn map(
    store: &mut NodeStore,
    node: NodeId,
    f: impl Fn(u8) -> u8 + Copy,
) -> Result<NodeId, BirpError> {
    let mut memo = HashMap::new();
    map_inner(store, node, f, &mut memo)
}

fn map_inner(
    store: &mut NodeStore,
    node: NodeId,
    f: impl Fn(u8) -> u8 + Copy,
    memo: &mut HashMap<NodeId, NodeId>,
) -> Result<NodeId, BirpError> {
    if let Some(v) = store.leaf_value(node) {
        return Ok(NodeId::leaf(f(v)));
    }
    if let Some(&cached) = memo.get(&node) {
        return Ok(cached);
    }
    let level = store.level(node);
    let left = map_inner(store, store.left(node), f, memo)?;
    let right = map_inner(store, store.right(node), f, memo)?;
    let out = store.lookup(level, left, right)?;
    memo.insert(node, out);
    Ok(out)
}

/// `255 - value`, the CLI's `-n` (negative) transform.
#[must_use]
pub fn negative(value: u8) -> u8 {
    255 - value
}

/// Build a threshold function: `< t -> 0`, `>= t -> 255`. The CLI's `-t N`
/// transform.
#[must_use]
pub fn threshold(t: u8) -> impl Fn(u8) -> u8 + Copy {
    move |value| if value < t { 0 } else { 255 }
}
