//! Pixel format classification.

use std::fmt;

use crate::header::{DdsHeader, DdsHeaderDxt10, DdsPixelFormat, FourCC};
use crate::{Error, Result};

/// Pixel formats the decoder understands.
///
/// Every supported surface maps to exactly one variant; anything else is
/// rejected with [`Error::UnsupportedPixelFormat`] before decoding starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdsFormat {
    /// BC1: two RGB565 endpoints, 2-bit indices, optional 1-bit alpha.
    Dxt1,
    /// BC2: explicit 4-bit alpha followed by a BC1 color block.
    Dxt3,
    /// BC3: interpolated alpha block followed by a BC1 color block.
    Dxt5,
    /// Uncompressed 32-bit samples stored as B, G, R, A.
    Bgra8 {
        /// The alpha byte carries no data (X8R8G8B8) and decodes as 255.
        opaque: bool,
    },
}

impl DdsFormat {
    /// Classify a parsed header.
    pub fn from_header(header: &DdsHeader, dx10: Option<&DdsHeaderDxt10>) -> Result<Self> {
        let pf = header.pixel_format;
        match pf.four_cc {
            FourCC::DXT1 => Ok(Self::Dxt1),
            FourCC::DXT2 | FourCC::DXT3 => Ok(Self::Dxt3),
            FourCC::DXT4 | FourCC::DXT5 => Ok(Self::Dxt5),
            FourCC::DX10 => match dx10 {
                Some(ext) => Self::from_dxgi(ext.dxgi_format),
                None => Err(Error::InvalidHeader("DX10 fourCC without extended header".into())),
            },
            FourCC::NONE => Self::from_masks(&pf),
            other => Err(Error::UnsupportedPixelFormat(format!("fourCC \"{other}\""))),
        }
    }

    fn from_dxgi(dxgi_format: u32) -> Result<Self> {
        match dxgi_format {
            f if DdsHeaderDxt10::BC1.contains(&f) => Ok(Self::Dxt1),
            f if DdsHeaderDxt10::BC2.contains(&f) => Ok(Self::Dxt3),
            f if DdsHeaderDxt10::BC3.contains(&f) => Ok(Self::Dxt5),
            f if DdsHeaderDxt10::B8G8R8A8.contains(&f) => Ok(Self::Bgra8 { opaque: false }),
            DdsHeaderDxt10::B8G8R8X8_UNORM => Ok(Self::Bgra8 { opaque: true }),
            other => Err(Error::UnsupportedPixelFormat(format!("DXGI format {other}"))),
        }
    }

    fn from_masks(pf: &DdsPixelFormat) -> Result<Self> {
        if pf.is_bgra32() {
            let [r, _, _, a] = pf.masks();
            // Unset masks mean "A8R8G8B8 with alpha"; an explicit RGB mask
            // set without an alpha mask means X8R8G8B8.
            return Ok(Self::Bgra8 {
                opaque: a == 0 && r != 0,
            });
        }

        let bits = pf.rgb_bit_count;
        let [r, g, b, a] = pf.masks();
        Err(Error::UnsupportedPixelFormat(format!(
            "{bits}-bit uncompressed (masks r={r:#010x} g={g:#010x} b={b:#010x} a={a:#010x})"
        )))
    }

    /// Short name used in logs and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dxt1 => "DXT1",
            Self::Dxt3 => "DXT3",
            Self::Dxt5 => "DXT5",
            Self::Bgra8 { .. } => "BGRA8",
        }
    }

    /// Bytes per 4x4 block, or `None` for uncompressed formats.
    pub const fn block_size(self) -> Option<usize> {
        match self {
            Self::Dxt1 => Some(8),
            Self::Dxt3 | Self::Dxt5 => Some(16),
            Self::Bgra8 { .. } => None,
        }
    }

    /// Number of bytes the top-level surface occupies.
    ///
    /// Fails with [`Error::SurfaceTooLarge`] when the size does not fit in
    /// `usize`.
    pub fn surface_size(self, width: u32, height: u32) -> Result<usize> {
        match self.block_size() {
            Some(block_size) => block_count(width, height)
                .and_then(|blocks| blocks.checked_mul(block_size))
                .ok_or(Error::SurfaceTooLarge { width, height }),
            None => rgba_len(width, height),
        }
    }
}

impl fmt::Display for DdsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of 4x4 blocks covering a surface, `None` on overflow.
pub fn block_count(width: u32, height: u32) -> Option<usize> {
    let blocks_x = (width as usize).div_ceil(4);
    let blocks_y = (height as usize).div_ceil(4);
    blocks_x.checked_mul(blocks_y)
}

/// Bytes of a tightly packed 4-byte-per-pixel image.
pub fn rgba_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or(Error::SurfaceTooLarge { width, height })
}
