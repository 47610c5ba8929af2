//! Error types for the BIRP BDD engine.
//!
//! `birp-core` is a library: every fallible entry point returns
//! `Result<T, BirpError>` rather than panicking, so callers (the CLI, the
//! raster collaborator, or a downstream embedder) decide how to report
//! failure.

use thiserror::Error;

/// Errors produced by the BDD engine.
#[derive(Debug, Error)]
pub enum BirpError {
    /// Width or height is outside the allowed range (`1..=8192`).
    #[error("dimension out of range: width={width}, height={height} (max 8192x8192)")]
    Dimension {
        /// Offending width.
        width: u32,
        /// Offending height.
        height: u32,
    },

    /// The node table or hash table is exhausted.
    #[error("node store full: capacity={capacity} nodes")]
    StoreFull {
        /// The capacity that was exceeded.
        capacity: u32,
    },

    /// A serialized byte stream was malformed.
    #[error("malformed BIRP byte stream: {0}")]
    BadFormat(String),

    /// An invalid CLI argument combination or out-of-range numeric argument.
    #[error("invalid argument: {0}")]
    BadArg(String),

    /// An upstream read/write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A zoom factor would push a level past the single-byte serializer tag
    /// ceiling of 32.
    #[error("zoom out of range: level {level} with requested shift would exceed 32")]
    OutOfRange {
        /// The level that would have been produced.
        level: u32,
    },
}
