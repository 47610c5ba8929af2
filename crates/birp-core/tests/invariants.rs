//! Cross-cutting property tests for the BDD engine.
//!
//! These exercise universally-quantified invariants over randomly
//! generated small rasters; specific input/output cases and per-operation
//! edge cases live alongside their modules as `#[cfg(test)]` units instead.

use birp_core::{apply, from_raster, map, min_level, rotate, zoom, NodeStore};
use proptest::prelude::*;

fn small_raster() -> impl Strategy<Value = (u32, u32, Vec<u8>)> {
    (1u32..=9, 1u32..=9).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h) as usize).prop_map(move |buf| (w, h, buf))
    })
}

proptest! {
    /// Every stored internal node has distinct children, and structurally
    /// identical triples always resolve to the same index.
    #[test]
    fn no_stored_node_has_equal_children((w, h, buf) in small_raster()) {
        let mut store = NodeStore::new();
        from_raster(&mut store, w, h, &buf).unwrap();
        for id in store.node_ids() {
            prop_assert_ne!(store.left(id), store.right(id));
        }
        // Replaying the same construction must not grow the store (every
        // triple already resolves to the node inserted the first time).
        let before = store.len();
        from_raster(&mut store, w, h, &buf).unwrap();
        prop_assert_eq!(store.len(), before);
    }

    /// `from_raster` then `apply` recovers original pixels in range and
    /// reads `0` in the zero-padded region.
    #[test]
    fn apply_recovers_raster_and_pads_with_zero((w, h, buf) in small_raster()) {
        let mut store = NodeStore::new();
        let root = from_raster(&mut store, w, h, &buf).unwrap();
        let l = min_level(w, h);
        let side = 1i64 << (l / 2);

        for r in 0..h as i64 {
            for c in 0..w as i64 {
                let expect = buf[(r as usize) * (w as usize) + (c as usize)];
                prop_assert_eq!(apply(&store, root, r, c), expect);
            }
        }
        for r in (h as i64)..side {
            prop_assert_eq!(apply(&store, root, r, 0), 0);
        }
        for c in (w as i64)..side {
            prop_assert_eq!(apply(&store, root, 0, c), 0);
        }
    }

    /// `map(_, identity) == identity` and map composes.
    #[test]
    fn map_identity_and_composition((w, h, buf) in small_raster()) {
        let mut store = NodeStore::new();
        let root = from_raster(&mut store, w, h, &buf).unwrap();

        let identity = map(&mut store, root, |v| v).unwrap();
        prop_assert_eq!(identity, root);

        let g = |v: u8| v.wrapping_add(1);
        let f = |v: u8| v ^ 0xAA;
        let composed = map(&mut store, root, move |v| f(g(v))).unwrap();
        let sequential = {
            let gm = map(&mut store, root, g).unwrap();
            map(&mut store, gm, f).unwrap()
        };
        let l = min_level(w, h);
        let side = 1i64 << (l / 2);
        for r in 0..side {
            for c in 0..side {
                prop_assert_eq!(
                    apply(&store, composed, r, c),
                    apply(&store, sequential, r, c)
                );
            }
        }
    }

    /// Rotating twice at the same level is the identity.
    #[test]
    fn rotate_twice_is_identity((w, h, buf) in small_raster()) {
        let mut store = NodeStore::new();
        let root = from_raster(&mut store, w, h, &buf).unwrap();
        let l = min_level(w, h);
        let once = rotate(&mut store, root, l).unwrap();
        let twice = rotate(&mut store, once, l).unwrap();
        prop_assert_eq!(twice, root);
    }

    /// Zooming in then back out the same amount recovers the OR-reduction
    /// — for already-binary (0/255) images this is the identity.
    #[test]
    fn zoom_in_then_out_is_identity_for_binary_images((w, h, buf) in small_raster()) {
        let binary: Vec<u8> = buf.iter().map(|&v| if v >= 128 { 255 } else { 0 }).collect();
        let mut store = NodeStore::new();
        let root = from_raster(&mut store, w, h, &binary).unwrap();
        let l = min_level(w, h);

        let zoomed_in = zoom(&mut store, root, l, 1).unwrap();
        let back = zoom(&mut store, zoomed_in.node, zoomed_in.level, -1).unwrap();
        prop_assert_eq!(back.level, l);

        let side = 1i64 << (l / 2);
        for r in 0..side {
            for c in 0..side {
                prop_assert_eq!(apply(&store, back.node, r, c), apply(&store, root, r, c));
            }
        }
    }
}
