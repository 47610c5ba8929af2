// crates/birp-raster/src/lib.rs

//! Raster and container collaborators for the `birp-core` BDD engine: PGM
//! (P5) I/O, the ASCII preview renderer, and BIRP container framing.
//!
//! This crate just marshals bytes to and from the buffers and byte streams
//! `birp-core` consumes and produces.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod ascii;
pub mod birp_format;
pub mod pgm;

pub use birp_format::{read_birp, write_birp};
pub use pgm::{read_pgm, write_pgm};
