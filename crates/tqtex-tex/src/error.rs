//! Error types for TEX conversion.
//!
//! Failures split into two classes. [`FormatError`] means the bytes do not
//! follow the container or DDS structure; [`DecodeError`] means the structure
//! was fine but the pixel data does not match what it declares.

use thiserror::Error;

/// The input does not conform to the `.tex` / DDS structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// First four bytes are not `TEX\x01` or `TEX\x02`.
    #[error("unrecognized magic {0:?}")]
    UnrecognizedMagic([u8; 4]),

    /// Buffer ends before the header does.
    #[error("truncated header: needed {needed} bytes, got {available}")]
    TruncatedHeader { needed: usize, available: usize },

    /// Declared payload range does not fit inside the buffer.
    #[error("invalid payload bounds: {offset}+{length} exceeds buffer of {buffer_len} bytes")]
    InvalidPayloadBounds {
        offset: usize,
        length: usize,
        buffer_len: usize,
    },

    /// Width or height is zero.
    #[error("zero dimensions: {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// Payload does not start with a DDS signature.
    #[error("missing DDS signature, found {0:?}")]
    MissingDdsSignature([u8; 4]),

    /// DDS header failed validation.
    #[error("invalid DDS header: {0}")]
    InvalidDdsHeader(String),

    /// DDS pixel format outside DXT1/DXT3/DXT5/BGRA8.
    #[error("unsupported DDS pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// Surface dimensions disagree with the declared dimensions.
    #[error("surface is {actual_width}x{actual_height}, header declares {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// Declared dimensions describe a surface too large to address.
    #[error("surface {width}x{height} is too large to decode")]
    SurfaceTooLarge { width: u32, height: u32 },

    /// Payload cannot hold the declared surface.
    #[error("payload too small for declared format {format}: expected {expected} bytes, got {actual}")]
    PayloadTooSmall {
        format: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// The pixel data is inconsistent with an otherwise valid header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer blocks or samples than the dimensions require.
    #[error("{format} block data truncated: expected {expected} bytes, got {actual}")]
    BlockDataTruncated {
        format: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Decoded buffer length differs from width * height * 4.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    PixelBufferSizeMismatch { expected: usize, actual: usize },
}

/// Errors that can occur when converting a `.tex` file.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed container or DDS structure.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Pixel data inconsistent with the header.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// PNG encoding or writing failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Whether this is a [`FormatError`].
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// Whether this is a [`DecodeError`].
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

impl From<tqtex_dds::Error> for FormatError {
    fn from(err: tqtex_dds::Error) -> Self {
        use tqtex_dds::Error as Dds;

        match err {
            Dds::InvalidMagic(magic) => Self::MissingDdsSignature(magic),
            Dds::InvalidHeader(msg) => Self::InvalidDdsHeader(msg),
            Dds::UnsupportedPixelFormat(msg) => Self::UnsupportedPixelFormat(msg),
            Dds::SurfaceTooLarge { width, height } => Self::SurfaceTooLarge { width, height },
            Dds::TruncatedData {
                format,
                expected,
                actual,
            } => Self::PayloadTooSmall {
                format,
                expected,
                actual,
            },
            Dds::Common(e) => Self::InvalidDdsHeader(e.to_string()),
        }
    }
}

impl From<tqtex_dds::Error> for Error {
    /// Errors raised while decoding pixels: truncation is a decode error,
    /// anything else is structural.
    fn from(err: tqtex_dds::Error) -> Self {
        match err {
            tqtex_dds::Error::TruncatedData {
                format,
                expected,
                actual,
            } => Self::Decode(DecodeError::BlockDataTruncated {
                format,
                expected,
                actual,
            }),
            other => Self::Format(other.into()),
        }
    }
}

/// Result type for TEX operations.
pub type Result<T> = std::result::Result<T, Error>;
