//! DDS surface handling for Titan Quest textures.
//!
//! Titan Quest stores its textures as DDS streams wrapped in a small `.tex`
//! container. This crate understands the DDS half:
//!
//! - [`DdsSurface`] - parse a DDS stream (`DDS ` or the Titan Quest `DDSR`
//!   signature), classify its pixel format and locate the top-level surface
//! - [`decode_blocks`] - DXT1/DXT3/DXT5 block decoding
//! - [`bgra_to_rgba`] - uncompressed 32-bit BGRA unpacking
//!
//! All decoders produce tightly packed, top-down RGBA with one byte per
//! channel. No gamma correction or alpha premultiplication is applied.
//!
//! # Example
//!
//! ```no_run
//! use tqtex_dds::DdsSurface;
//!
//! let data = std::fs::read("texture.dds")?;
//! let surface = DdsSurface::parse(&data)?;
//! let rgba = surface.decode()?;
//! println!("{}x{} {}: {} bytes", surface.width(), surface.height(), surface.format, rgba.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bgra;
mod block;
mod error;
mod format;
mod header;
mod surface;

pub use bgra::{bgra_to_rgba, RowOrder};
pub use block::{decode_blocks, rgb565_to_rgb888};
pub use error::{Error, Result};
pub use format::{block_count, rgba_len, DdsFormat};
pub use header::{DdsHeader, DdsHeaderDxt10, DdsPixelFormat, FourCC};
pub use surface::{decode_surface, DdsSurface};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

/// Titan Quest variant of the DDS magic, otherwise identical to [`DDS_MAGIC`].
pub const DDS_MAGIC_TQ: &[u8; 4] = b"DDSR";
