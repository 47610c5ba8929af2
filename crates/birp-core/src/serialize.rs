//! Compact preorder-with-back-references binary serialization.
//!
//! The stream is a topological sort of the DAG rooted at the node passed to
//! [`serialize`]; the last record written is the root. Nodes already
//! visited are referenced by their previously recorded serial label rather
//! than re-emitted, so sharing introduced by hash-consing survives the
//! round trip.

use crate::error::BirpError;
use crate::store::{NodeId, NodeStore, MAX_LEVEL};
use std::collections::HashMap;
use std::io::{Read, Write};

const LEAF_TAG: u8 = b'@'; // 0x40

/// Serialize the DAG rooted at `node` to `sink`.
///
/// # Errors
/// Returns [`BirpError::BadArg`] if `node`'s level (or any descendant's)
/// exceeds [`MAX_LEVEL`] — the single-byte tag `'@' + level` cannot encode
/// it. Returns [`BirpError::Io`] on a write failure.
pub fn serialize(store: &NodeStore, node: NodeId, sink: &mut impl Write) -> Result<(), BirpError> {
    let mut labels: HashMap<NodeId, u32> = HashMap::new();
    let mut serial = 0u32;
    serialize_inner(store, node, sink, &mut labels, &mut serial)?;
    Ok(())
}

fn serialize_inner(
    store: &NodeStore,
    node: NodeId,
    sink: &mut impl Write,
    labels: &mut HashMap<NodeId, u32>,
    serial: &mut u32,
) -> Result<u32, BirpError> {
    if let Some(&label) = labels.get(&node) {
        return Ok(label);
    }

    let level = store.level(node);
    if level == 0 {
        let value = store.leaf_value(node).unwrap_or(0);
        sink.write_all(&[LEAF_TAG, value])?;
        *serial += 1;
        labels.insert(node, *serial);
        return Ok(*serial);
    }

    if level > MAX_LEVEL {
        return Err(BirpError::BadArg(format!(
            "level {level} exceeds the serializer's 32-level ceiling"
        )));
    }

    let left_label = serialize_inner(store, store.left(node), sink, labels, serial)?;
    let right_label = serialize_inner(store, store.right(node), sink, labels, serial)?;

    let tag = LEAF_TAG + level;
    sink.write_all(&[tag])?;
    sink.write_all(&left_label.to_le_bytes())?;
    sink.write_all(&right_label.to_le_bytes())?;
    *serial += 1;
    labels.insert(node, *serial);
    Ok(*serial)
}

/// Deserialize a DAG from `src`, inserting every node through
/// [`NodeStore::lookup`] so the result shares structure with whatever else
/// is already in `store`.
///
/// # Errors
/// Returns [`BirpError::BadFormat`] on a malformed byte (tag outside
/// `0x40..=0x60`), premature EOF, or a reference to a serial that was never
/// labeled. Returns [`BirpError::Io`] on a read failure.
pub fn deserialize(store: &mut NodeStore, src: &mut impl Read) -> Result<NodeId, BirpError> {
    let mut labels: HashMap<u32, NodeId> = HashMap::new();
    let mut serial = 0u32;
    let mut last: Option<NodeId> = None;

    loop {
        let mut tag_buf = [0u8; 1];
        if src.read(&mut tag_buf)? == 0 {
            break;
        }
        let tag = tag_buf[0];

        if tag == LEAF_TAG {
            let v = read_one_byte(src)?;
            serial += 1;
            let id = NodeId::leaf(v);
            labels.insert(serial, id);
            last = Some(id);
        } else if (LEAF_TAG + 1..=LEAF_TAG + MAX_LEVEL).contains(&tag) {
            let level = tag - LEAF_TAG;
            let l_serial = read_u32_le(src)?;
            let r_serial = read_u32_le(src)?;
            let left = *labels.get(&l_serial).ok_or_else(|| {
                BirpError::BadFormat(format!("reference to unlabeled serial {l_serial}"))
            })?;
            let right = *labels.get(&r_serial).ok_or_else(|| {
                BirpError::BadFormat(format!("reference to unlabeled serial {r_serial}"))
            })?;
            let id = store.lookup(level, left, right)?;
            serial += 1;
            labels.insert(serial, id);
            last = Some(id);
        } else {
            return Err(BirpError::BadFormat(format!("unexpected tag byte {tag:#x}")));
        }
    }

    last.ok_or_else(|| BirpError::BadFormat("empty BIRP node stream".to_string()))
}

fn read_one_byte(src: &mut impl Read) -> Result<u8, BirpError> {
    let mut buf = [0u8; 1];
    src.read_exact(&mut buf)
        .map_err(|_| BirpError::BadFormat("premature EOF reading leaf value".to_string()))?;
    Ok(buf[0])
}

fn read_u32_le(src: &mut impl Read) -> Result<u32, BirpError> {
    let mut buf = [0u8; 4];
    src.read_exact(&mut buf)
        .map_err(|_| BirpError::BadFormat("premature EOF reading serial reference".to_string()))?;
    Ok(u32::from_le_bytes(buf))
}
