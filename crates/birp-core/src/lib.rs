// crates/birp-core/src/lib.rs

//! The BIRP BDD engine: a hash-consed node store for 2-D grayscale raster
//! images, plus the construction, evaluation, and transform algorithms that
//! operate over it.
//!
//! Raster I/O, ASCII preview, and CLI argument handling live in sibling
//! crates; this crate is just the engine they drive.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod error;
pub mod eval;
pub mod map;
pub mod raster;
pub mod rotate;
pub mod serialize;
pub mod store;
pub mod zoom;

pub use error::BirpError;
pub use eval::apply;
pub use map::map;
pub use raster::{from_raster, min_level, to_raster, MAX_DIM};
pub use rotate::rotate;
pub use serialize::{deserialize, serialize};
pub use store::{NodeId, NodeStore, MAX_LEVEL, NODES_MAX, NUM_LEAVES};
pub use zoom::{zoom, Zoomed};
