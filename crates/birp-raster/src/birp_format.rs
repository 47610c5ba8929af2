//! BIRP container framing: a 4-byte magic, little-endian width and
//! height, then the node stream defined by `birp_core::serialize`.

use anyhow::{bail, Context, Result};
use birp_core::{NodeId, NodeStore};
use std::io::{Read, Write};
use tracing::debug;

const MAGIC: &[u8; 4] = b"BIRP";

/// Read a framed BIRP container, returning `(width, height, node, store)`.
///
/// # Errors
/// Returns an error if the magic is wrong, the header is truncated, or the
/// node stream fails to deserialize (`birp_core::BirpError::BadFormat`/
/// `Io` surface through here via `anyhow`).
pub fn read_birp(mut r: impl Read) -> Result<(u32, u32, NodeId, NodeStore)> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic).context("reading BIRP magic")?;
    if &magic != MAGIC {
        bail!("not a BIRP file: bad magic {magic:02x?}");
    }
    let mut dims = [0u8; 8];
    r.read_exact(&mut dims).context("reading BIRP dimensions")?;
    let width = u32::from_le_bytes(dims[0..4].try_into().expect("4 bytes"));
    let height = u32::from_le_bytes(dims[4..8].try_into().expect("4 bytes"));

    let mut store = NodeStore::new();
    let node =
        birp_core::deserialize(&mut store, &mut r).context("deserializing BIRP node stream")?;
    debug!(width, height, nodes = store.len(), "read BIRP container");
    Ok((width, height, node, store))
}

/// Write a framed BIRP container.
///
/// # Errors
/// Returns an error if serialization fails (e.g. a level above 32) or on a
/// write failure.
pub fn write_birp(
    mut w: impl Write,
    store: &NodeStore,
    node: NodeId,
    width: u32,
    height: u32,
) -> Result<()> {
    w.write_all(MAGIC)?;
    w.write_all(&width.to_le_bytes())?;
    w.write_all(&height.to_le_bytes())?;
    birp_core::serialize(store, node, &mut w).context("serializing BIRP node stream")?;
    debug!(width, height, "wrote BIRP container");
    Ok(())
}
