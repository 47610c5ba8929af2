//! 180-degree (point-reflection) rotation.

use crate::error::BirpError;
use crate::eval::apply;
use crate::store::{NodeId, NodeStore};
use std::collections::HashMap;

/// Rotate the image represented by `node` (at `level`, which must be even)
/// by a point reflection — both the row and column quadrants are swapped at
/// every paired-level split, not a single-axis flip.
///
/// # Errors
/// Returns [`BirpError::BadArg`] if `level` is odd. Propagates
/// [`BirpError::StoreFull`] from the underlying store.
pub fn rotate(store: &mut NodeStore, node: NodeId, level: u8) -> Result<NodeId, BirpError> {
    if level % 2 != 0 {
        return Err(BirpError::BadArg(format!(
            "rotate requires an even level, got {level}"
        )));
    }
    let side = 1i64 << (level / 2);
    let mut memo = HashMap::new();
    rotate_inner(store, node, level, 0, 0, side, &mut memo)
}

/// Recurses over destination quadrants down to a single pixel (read via
/// [`apply`]), then rebuilds bottom-up, swapping `(top-right, bottom-right)`
/// into the new top half and `(top-left, bottom-left)` into the new bottom
/// half.
fn rotate_inner(
    store: &mut NodeStore,
    node: NodeId,
    level: u8,
    r: i64,
    c: i64,
    d: i64,
    memo: &mut HashMap<(u8, i64, i64, i64), NodeId>,
) -> Result<NodeId, BirpError> {
    if d == 1 {
        return Ok(NodeId::leaf(apply(store, node, r, c)));
    }
    if let Some(&cached) = memo.get(&(level, r, c, d)) {
        return Ok(cached);
    }
    let half = d / 2;
    let tl = rotate_inner(store, node, level - 2, r, c, half, memo)?;
    let tr = rotate_inner(store, node, level - 2, r, c + half, half, memo)?;
    let bl = rotate_inner(store, node, level - 2, r + half, c, half, memo)?;
    let br = rotate_inner(store, node, level - 2, r + half, c + half, half, memo)?;

    let top = store.lookup(level - 1, tr, br)?;
    let bottom = store.lookup(level - 1, tl, bl)?;
    let out = store.lookup(level, top, bottom)?;
    memo.insert((level, r, c, d), out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::from_raster;

    #[test]
    fn rotate_twice_is_identity_invariant_6() {
        let mut store = NodeStore::new();
        let buf = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
        let root = from_raster(&mut store, 4, 4, &buf).unwrap();
        let l = crate::raster::min_level(4, 4);
        let once = rotate(&mut store, root, l).unwrap();
        let twice = rotate(&mut store, once, l).unwrap();
        assert_eq!(twice, root);
    }

    #[test]
    fn rotate_is_point_reflection_not_axis_flip() {
        // 2x2 raster, single distinguishing pixel at (0,0).
        let mut store = NodeStore::new();
        let buf = [9u8, 0, 0, 0];
        let root = from_raster(&mut store, 2, 2, &buf).unwrap();
        let l = crate::raster::min_level(2, 2);
        let rotated = rotate(&mut store, root, l).unwrap();
        // A point reflection moves (0,0) to (1,1), not (0,1) or (1,0).
        assert_eq!(apply(&store, rotated, 1, 1), 9);
        assert_eq!(apply(&store, rotated, 0, 0), 0);
        assert_eq!(apply(&store, rotated, 0, 1), 0);
        assert_eq!(apply(&store, rotated, 1, 0), 0);
    }

    #[test]
    fn rejects_odd_level() {
        let mut store = NodeStore::new();
        let err = rotate(&mut store, NodeId::leaf(0), 3).unwrap_err();
        assert!(matches!(err, BirpError::BadArg(_)));
    }
}
