//! Error types for tqtex-common.

use thiserror::Error;

/// Low-level reading error shared by the tqtex crates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes at offset {offset} but only {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
