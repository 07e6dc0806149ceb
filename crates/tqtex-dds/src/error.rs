//! Error types for DDS handling.

use thiserror::Error;

/// Errors that can occur when parsing or decoding DDS surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] tqtex_common::Error),

    /// Invalid DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Invalid DDS header.
    #[error("invalid DDS header: {0}")]
    InvalidHeader(String),

    /// Pixel format outside the supported set.
    #[error("unsupported DDS pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// Surface dimensions whose byte size does not fit in memory.
    #[error("surface {width}x{height} is too large to decode")]
    SurfaceTooLarge { width: u32, height: u32 },

    /// Not enough pixel data for the declared surface.
    #[error("{format} data truncated: expected {expected} bytes, got {actual}")]
    TruncatedData {
        format: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
