//! Raster construction and readback: bytes in, BDD out, and back again.

use crate::error::BirpError;
use crate::store::{NodeId, NodeStore};

/// Largest raster dimension this engine will build a BDD from.
pub const MAX_DIM: u32 = 8192;

/// Smallest even level `l` with `2^(l/2) >= w` and `2^(l/2) >= h`.
///
/// Computed by doubling `l` while `2^l < w*w` or `2^l < h*h`, rather than
/// via `log2`, so the comparison stays exact integer arithmetic for every
/// `w, h <= 8192` (where `w*w`, `h*h` fit comfortably in `u64`).
#[must_use]
pub fn min_level(w: u32, h: u32) -> u8 {
    let w2 = u64::from(w) * u64::from(w);
    let h2 = u64::from(h) * u64::from(h);
    let mut l: u32 = 0;
    while (1u64 << l) < w2 || (1u64 << l) < h2 {
        l += 2;
    }
    l as u8
}

/// Build a BDD from a row-major byte buffer of size `w * h`.
///
/// Recursively partitions the smallest enclosing `2^k x 2^k` square into
/// quadrant-alternating row/column splits: even levels split rows, odd
/// levels split columns. Pixels outside the true `w x h` rectangle (but
/// inside the padded square) read as `0`. Identical subtrees — most
/// commonly the padding itself — collapse for free via [`NodeStore::lookup`].
///
/// # Errors
/// Returns [`BirpError::Dimension`] if `w` or `h` is `0` or exceeds
/// [`MAX_DIM`]. Returns [`BirpError::BadArg`] if `buf` is shorter than
/// `w * h` bytes. Returns [`BirpError::StoreFull`] if the store is
/// exhausted.
pub fn from_raster(
    store: &mut NodeStore,
    w: u32,
    h: u32,
    buf: &[u8],
) -> Result<NodeId, BirpError> {
    if w == 0 || h == 0 || w > MAX_DIM || h > MAX_DIM {
        return Err(BirpError::Dimension { width: w, height: h });
    }
    let needed = (w as usize) * (h as usize);
    if buf.len() < needed {
        return Err(BirpError::BadArg(format!(
            "raster buffer has {} bytes, need at least {needed} for a {w}x{h} image",
            buf.len()
        )));
    }
    let bml = min_level(w, h);
    let side = 1u32 << (bml / 2);
    build(store, bml, side, side, 0, 0, w, h, buf)
}

/// `(row, col)` is the top-left corner of the current subregion within the
/// logical square; `true_w, true_h` are the *unpadded* dimensions used for
/// the out-of-bounds test.
#[allow(clippy::too_many_arguments)]
fn build(
    store: &mut NodeStore,
    level: u8,
    sub_w: u32,
    sub_h: u32,
    row: u32,
    col: u32,
    true_w: u32,
    true_h: u32,
    buf: &[u8],
) -> Result<NodeId, BirpError> {
    if level == 0 {
        if row >= true_h || col >= true_w {
            return Ok(NodeId::leaf(0));
        }
        let idx = (row as usize) * (true_w as usize) + (col as usize);
        return Ok(NodeId::leaf(buf[idx]));
    }
    if level % 2 == 0 {
        let half = sub_h / 2;
        let top = build(store, level - 1, sub_w, half, row, col, true_w, true_h, buf)?;
        let bottom = build(
            store,
            level - 1,
            sub_w,
            half,
            row + half,
            col,
            true_w,
            true_h,
            buf,
        )?;
        store.lookup(level, top, bottom)
    } else {
        let half = sub_w / 2;
        let left = build(store, level - 1, half, sub_h, row, col, true_w, true_h, buf)?;
        let right = build(
            store,
            level - 1,
            half,
            sub_h,
            row,
            col + half,
            true_w,
            true_h,
            buf,
        )?;
        store.lookup(level, left, right)
    }
}

/// Fill a `w * h` row-major buffer by evaluating `node` at every pixel
/// (`crate::eval::apply`, one call per pixel — this is the inverse of
/// [`from_raster`]).
#[must_use]
pub fn to_raster(store: &NodeStore, node: NodeId, w: u32, h: u32) -> Vec<u8> {
    let mut out = vec![0u8; (w as usize) * (h as usize)];
    for r in 0..h {
        for c in 0..w {
            out[(r as usize) * (w as usize) + (c as usize)] =
                crate::eval::apply(store, node, r as i64, c as i64);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_image_collapses_to_one_leaf() {
        let mut store = NodeStore::new();
        let buf = vec![0u8; 16];
        let root = from_raster(&mut store, 4, 4, &buf).unwrap();
        assert_eq!(root, NodeId::leaf(0));
        assert!(store.is_empty());
    }

    #[test]
    fn single_pixel_on_is_isolated() {
        // 2x2 raster [[0,0],[0,255]]
        let mut store = NodeStore::new();
        let buf = [0u8, 0, 0, 255];
        let root = from_raster(&mut store, 2, 2, &buf).unwrap();
        assert_eq!(min_level(2, 2), 2);
        assert_eq!(crate::eval::apply(&store, root, 1, 1), 255);
        assert_eq!(crate::eval::apply(&store, root, 0, 0), 0);
        assert_eq!(crate::eval::apply(&store, root, 0, 1), 0);
        assert_eq!(crate::eval::apply(&store, root, 1, 0), 0);
    }

    #[test]
    fn rejects_oversized_dimensions() {
        let mut store = NodeStore::new();
        let err = from_raster(&mut store, 8193, 4, &[]).unwrap_err();
        assert!(matches!(err, BirpError::Dimension { .. }));
    }

    #[test]
    fn rejects_short_buffer() {
        let mut store = NodeStore::new();
        let err = from_raster(&mut store, 4, 4, &[0u8; 4]).unwrap_err();
        assert!(matches!(err, BirpError::BadArg(_)));
    }

    #[test]
    fn padding_reads_as_zero() {
        let mut store = NodeStore::new();
        // 3x1 raster, all 255; min_level pads out to a square.
        let buf = [255u8, 255, 255];
        let root = from_raster(&mut store, 1, 3, &buf).unwrap();
        let l = min_level(1, 3);
        let side = 1u32 << (l / 2);
        assert_eq!(crate::eval::apply(&store, root, 0, 0), 255);
        assert_eq!(crate::eval::apply(&store, root, 2, 0), 255);
        assert_eq!(crate::eval::apply(&store, root, 0, (side - 1) as i64), 0);
    }
}
