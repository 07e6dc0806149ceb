//! Pixel decoding.

use tqtex_dds::{decode_surface, RowOrder};

use crate::{PixelSource, Result};

/// Tightly packed RGBA pixels, one byte per channel, top-down rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer(Vec<u8>);

impl PixelBuffer {
    /// Wrap already-decoded RGBA bytes.
    pub fn from_rgba(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes (four per pixel).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take back the underlying bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

/// Decode a classified payload into canonical RGBA.
///
/// Block formats decode 4x4 blocks in row-major order and clip at the
/// edges. BGRA samples are reordered to RGBA; raw payloads are stored
/// bottom-up and get flipped, DDS surfaces are already top-down.
pub fn decode(source: PixelSource<'_>, width: u32, height: u32) -> Result<PixelBuffer> {
    let pixels = match source {
        PixelSource::Dds(surface) => {
            decode_surface(surface.format, surface.data, width, height, RowOrder::TopDown)?
        }
        PixelSource::RawBgra(data) => {
            decode_surface(source.format(), data, width, height, RowOrder::BottomUp)?
        }
    };
    Ok(PixelBuffer(pixels))
}
