//! Integer power-of-two zoom in (pixel duplication) and zoom out
//! (block OR-reduction).

use crate::error::BirpError;
use crate::eval::apply;
use crate::store::{NodeId, NodeStore, MAX_LEVEL};
use std::collections::HashMap;

/// Result of a zoom: the new root plus the level it now represents (callers
/// must propagate this level into any further operation — zoom-in's
/// subtree is reused verbatim, so the new size is encoded only in the
/// claimed level, not in new structure).
#[derive(Debug, Clone, Copy)]
pub struct Zoomed {
    /// The (possibly unchanged) node.
    pub node: NodeId,
    /// The level `node` now represents.
    pub level: u8,
}

/// Zoom `node` (at `level`) by a signed byte factor.
///
/// Bit 7 of `factor` is the sign: positive zooms in (each pixel becomes a
/// `2^k x 2^k` block of identical pixels); negative zooms out (magnitude
/// `s = (factor XOR 0xFF) + 1`, clamped to `level/2`; each destination pixel
/// is `255` if any source pixel in its `2^s x 2^s` block is non-zero, else
/// `0`). `factor == 0` returns `node` unchanged.
///
/// # Errors
/// Returns [`BirpError::OutOfRange`] if zooming in would push the level
/// past 32. Propagates [`BirpError::StoreFull`] from the underlying store.
pub fn zoom(store: &mut NodeStore, node: NodeId, level: u8, factor: i8) -> Result<Zoomed, BirpError> {
    if factor == 0 {
        return Ok(Zoomed { node, level });
    }
    let side = 1i64 << (level / 2);
    if factor > 0 {
        let k = u32::from(factor as u8);
        let new_level = u32::from(level) + 2 * k;
        if new_level > u32::from(MAX_LEVEL) {
            return Err(BirpError::OutOfRange { level: new_level });
        }
        let shift = 2 * k as u8;
        let mut memo = HashMap::new();
        let out = zoom_in(store, node, level, 0, 0, side, side, shift, &mut memo)?;
        Ok(Zoomed {
            node: out,
            level: new_level as u8,
        })
    } else {
        let raw = ((factor as i32) ^ 0xFF) + 1;
        let mut s = (raw & 0xFF) as u32;
        if s > u32::from(level) / 2 {
            s = u32::from(level) / 2;
        }
        let shift = (2 * s) as u8;
        let mut memo = HashMap::new();
        let out = zoom_out(store, node, level, 0, 0, side, side, shift, &mut memo)?;
        Ok(Zoomed {
            node: out,
            level: level - shift,
        })
    }
}

/// Mirrors `zoom_in`: descend the source at its natural levels, labeling
/// every emitted node with `level + shift` (a fixed offset for the whole
/// call) so the same subtree is reused at a higher notional level.
#[allow(clippy::too_many_arguments)]
fn zoom_in(
    store: &mut NodeStore,
    node: NodeId,
    level: u8,
    r: i64,
    c: i64,
    w: i64,
    h: i64,
    shift: u8,
    memo: &mut HashMap<(u8, i64, i64), NodeId>,
) -> Result<NodeId, BirpError> {
    if level == 0 {
        return Ok(NodeId::leaf(apply(store, node, r, c)));
    }
    if let Some(&cached) = memo.get(&(level, r, c)) {
        return Ok(cached);
    }
    let out = if level % 2 == 0 {
        let half = h / 2;
        let top = zoom_in(store, node, level - 1, r, c, w, half, shift, memo)?;
        let bottom = zoom_in(store, node, level - 1, r + half, c, w, half, shift, memo)?;
        store.lookup(level + shift, top, bottom)?
    } else {
        let half = w / 2;
        let left = zoom_in(store, node, level - 1, r, c, half, h, shift, memo)?;
        let right = zoom_in(store, node, level - 1, r, c + half, half, h, shift, memo)?;
        store.lookup(level + shift, left, right)?
    };
    memo.insert((level, r, c), out);
    Ok(out)
}

/// Mirrors `zoom_out`: descend until `level == shift`, at which point `w x
/// h` (by then each `2^s x 2^s`) covers exactly one destination pixel's
/// source block; OR-sample it via [`apply`]. Internal levels are labeled
/// `level - shift`.
#[allow(clippy::too_many_arguments)]
fn zoom_out(
    store: &mut NodeStore,
    node: NodeId,
    level: u8,
    r: i64,
    c: i64,
    w: i64,
    h: i64,
    shift: u8,
    memo: &mut HashMap<(u8, i64, i64), NodeId>,
) -> Result<NodeId, BirpError> {
    if level == shift {
        for i in r..r + h {
            for j in c..c + w {
                if apply(store, node, i, j) != 0 {
                    return Ok(NodeId::leaf(255));
                }
            }
        }
        return Ok(NodeId::leaf(0));
    }
    if let Some(&cached) = memo.get(&(level, r, c)) {
        return Ok(cached);
    }
    let out = if level % 2 == 0 {
        let half = h / 2;
        let top = zoom_out(store, node, level - 1, r, c, w, half, shift, memo)?;
        let bottom = zoom_out(store, node, level - 1, r + half, c, w, half, shift, memo)?;
        store.lookup(level - shift, top, bottom)?
    } else {
        let half = w / 2;
        let left = zoom_out(store, node, level - 1, r, c, half, h, shift, memo)?;
        let right = zoom_out(store, node, level - 1, r, c + half, half, h, shift, memo)?;
        store.lookup(level - shift, left, right)?
    };
    memo.insert((level, r, c), out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{from_raster, min_level};

    #[test]
    fn zero_factor_is_identity() {
        let mut store = NodeStore::new();
        let buf = [1u8, 2, 3, 4];
        let root = from_raster(&mut store, 2, 2, &buf).unwrap();
        let l = min_level(2, 2);
        let z = zoom(&mut store, root, l, 0).unwrap();
        assert_eq!(z.node, root);
        assert_eq!(z.level, l);
    }

    #[test]
    fn zoom_in_then_out_recovers_or_reduction() {
        let mut store = NodeStore::new();
        let buf = [0u8, 255, 0, 0];
        let root = from_raster(&mut store, 2, 2, &buf).unwrap();
        let l = min_level(2, 2);

        let zoomed_in = zoom(&mut store, root, l, 1).unwrap();
        let zoomed_back = zoom(&mut store, zoomed_in.node, zoomed_in.level, -1).unwrap();

        assert_eq!(zoomed_back.level, l);
        for r in 0..2 {
            for c in 0..2 {
                assert_eq!(
                    apply(&store, zoomed_back.node, r, c),
                    apply(&store, root, r, c)
                );
            }
        }
    }

    #[test]
    fn zoom_in_duplicates_pixels() {
        let mut store = NodeStore::new();
        let buf = [10u8, 20, 30, 40];
        let root = from_raster(&mut store, 2, 2, &buf).unwrap();
        let l = min_level(2, 2);
        let z = zoom(&mut store, root, l, 1).unwrap();
        assert_eq!(z.level, l + 2);
        // Each source pixel (r,c) becomes the 2x2 block at (2r..2r+2, 2c..2c+2).
        for r in 0..2i64 {
            for c in 0..2i64 {
                let v = apply(&store, root, r, c);
                for dr in 0..2i64 {
                    for dc in 0..2i64 {
                        assert_eq!(apply(&store, z.node, 2 * r + dr, 2 * c + dc), v);
                    }
                }
            }
        }
    }

    #[test]
    fn zoom_in_past_32_is_out_of_range() {
        let mut store = NodeStore::new();
        let err = zoom(&mut store, NodeId::leaf(0), 30, 2).unwrap_err();
        assert!(matches!(err, BirpError::OutOfRange { .. }));
    }
}
