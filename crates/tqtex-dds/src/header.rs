//! DDS header structures.

use std::fmt;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// DDS file header (the 124 bytes that follow the magic).
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeader {
    /// Header size (should be 124).
    pub size: u32,
    /// Header flags.
    pub flags: u32,
    /// Image height.
    pub height: u32,
    /// Image width.
    pub width: u32,
    /// Pitch or linear size.
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Reserved.
    pub reserved1: [u32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: u32,
    /// Surface capabilities 2.
    pub caps2: u32,
    /// Surface capabilities 3.
    pub caps3: u32,
    /// Surface capabilities 4.
    pub caps4: u32,
    /// Reserved.
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    /// `DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT`.
    pub const REQUIRED_FLAGS: u32 = 0x1 | 0x2 | 0x4 | 0x1000;

    /// `DDSCAPS_TEXTURE`.
    pub const CAPS_TEXTURE: u32 = 0x1000;

    /// Build a header describing a single-surface texture.
    pub fn new(width: u32, height: u32, pixel_format: DdsPixelFormat) -> Self {
        Self {
            size: Self::SIZE,
            flags: Self::REQUIRED_FLAGS,
            height,
            width,
            pitch_or_linear_size: 0,
            depth: 0,
            mipmap_count: 1,
            reserved1: [0; 11],
            pixel_format,
            caps: Self::CAPS_TEXTURE,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }

    /// Check if this is a DX10 extended header.
    pub fn is_dx10(&self) -> bool {
        self.pixel_format.four_cc == FourCC::DX10
    }

    /// Number of mip levels, treating the unset value 0 as a single level.
    pub fn mip_levels(&self) -> u32 {
        let count = self.mipmap_count;
        count.max(1)
    }
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsPixelFormat {
    /// Structure size (should be 32).
    pub size: u32,
    /// Pixel format flags.
    pub flags: u32,
    /// Four-character code for compression.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed).
    pub rgb_bit_count: u32,
    /// Red bit mask.
    pub r_bit_mask: u32,
    /// Green bit mask.
    pub g_bit_mask: u32,
    /// Blue bit mask.
    pub b_bit_mask: u32,
    /// Alpha bit mask.
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected structure size.
    pub const SIZE: u32 = 32;

    /// `DDPF_ALPHAPIXELS`.
    pub const ALPHA_PIXELS: u32 = 0x1;
    /// `DDPF_FOURCC`.
    pub const FOURCC: u32 = 0x4;
    /// `DDPF_RGB`.
    pub const RGB: u32 = 0x40;

    /// Standard A8R8G8B8 masks (bytes stored as B, G, R, A).
    pub const BGRA_MASKS: [u32; 4] = [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000];

    /// Pixel format for a block-compressed surface.
    pub fn compressed(four_cc: FourCC) -> Self {
        Self {
            size: Self::SIZE,
            flags: Self::FOURCC,
            four_cc,
            rgb_bit_count: 0,
            r_bit_mask: 0,
            g_bit_mask: 0,
            b_bit_mask: 0,
            a_bit_mask: 0,
        }
    }

    /// Pixel format for an uncompressed 32-bit A8R8G8B8 surface.
    pub fn bgra8() -> Self {
        let [r, g, b, a] = Self::BGRA_MASKS;
        Self {
            size: Self::SIZE,
            flags: Self::RGB | Self::ALPHA_PIXELS,
            four_cc: FourCC::NONE,
            rgb_bit_count: 32,
            r_bit_mask: r,
            g_bit_mask: g,
            b_bit_mask: b,
            a_bit_mask: a,
        }
    }

    /// Color masks as `[r, g, b, a]`.
    pub fn masks(&self) -> [u32; 4] {
        [self.r_bit_mask, self.g_bit_mask, self.b_bit_mask, self.a_bit_mask]
    }

    /// Whether this describes a surface with no fourCC.
    pub fn is_uncompressed(&self) -> bool {
        self.four_cc == FourCC::NONE
    }

    /// Whether the surface is plain 32-bit BGRA (or BGRX) with no fourCC.
    ///
    /// Masks that are all zero are accepted too: some exporters leave them
    /// unset for A8R8G8B8 surfaces.
    pub fn is_bgra32(&self) -> bool {
        let bits = self.rgb_bit_count;
        if !self.is_uncompressed() || bits != 32 {
            return false;
        }
        let [r, g, b, a] = self.masks();
        let [sr, sg, sb, sa] = Self::BGRA_MASKS;
        let all_unset = r == 0 && g == 0 && b == 0 && a == 0;
        all_unset || (r == sr && g == sg && b == sb && (a == sa || a == 0))
    }
}

/// Four-character code for compression type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// No fourCC (uncompressed surface).
    pub const NONE: Self = Self([0; 4]);
    /// DXT1 compression.
    pub const DXT1: Self = Self(*b"DXT1");
    /// DXT2 compression (premultiplied DXT3).
    pub const DXT2: Self = Self(*b"DXT2");
    /// DXT3 compression.
    pub const DXT3: Self = Self(*b"DXT3");
    /// DXT4 compression (premultiplied DXT5).
    pub const DXT4: Self = Self(*b"DXT4");
    /// DXT5 compression.
    pub const DXT5: Self = Self(*b"DXT5");
    /// DX10 extended header.
    pub const DX10: Self = Self(*b"DX10");
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

/// DX10 extended header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeaderDxt10 {
    /// DXGI format.
    pub dxgi_format: u32,
    /// Resource dimension.
    pub resource_dimension: u32,
    /// Misc flags.
    pub misc_flag: u32,
    /// Array size.
    pub array_size: u32,
    /// Misc flags 2.
    pub misc_flags2: u32,
}

impl DdsHeaderDxt10 {
    /// BC1 typeless/UNORM/UNORM_SRGB.
    pub const BC1: [u32; 3] = [70, 71, 72];
    /// BC2 typeless/UNORM/UNORM_SRGB.
    pub const BC2: [u32; 3] = [73, 74, 75];
    /// BC3 typeless/UNORM/UNORM_SRGB.
    pub const BC3: [u32; 3] = [76, 77, 78];
    /// B8G8R8A8 UNORM, typeless and UNORM_SRGB.
    pub const B8G8R8A8: [u32; 3] = [87, 90, 91];
    /// B8G8R8X8 UNORM.
    pub const B8G8R8X8_UNORM: u32 = 88;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_sizes_match_format() {
        assert_eq!(std::mem::size_of::<DdsHeader>(), DdsHeader::SIZE as usize);
        assert_eq!(
            std::mem::size_of::<DdsPixelFormat>(),
            DdsPixelFormat::SIZE as usize
        );
        assert_eq!(std::mem::size_of::<DdsHeaderDxt10>(), 20);
    }

    #[test]
    fn test_pixel_format_offsets() {
        // fourCC sits at DDS-file offset 84, i.e. header offset 80.
        let header = DdsHeader::new(8, 4, DdsPixelFormat::compressed(FourCC::DXT5));
        let bytes = header.as_bytes();
        assert_eq!(&bytes[80..84], b"DXT5");
        assert_eq!(&bytes[8..12], &4u32.to_le_bytes());
        assert_eq!(&bytes[12..16], &8u32.to_le_bytes());
    }

    #[test]
    fn test_bgra32_detection() {
        assert!(DdsPixelFormat::bgra8().is_bgra32());

        let mut bgrx = DdsPixelFormat::bgra8();
        bgrx.a_bit_mask = 0;
        assert!(bgrx.is_bgra32());

        let mut unset = DdsPixelFormat::bgra8();
        unset.r_bit_mask = 0;
        unset.g_bit_mask = 0;
        unset.b_bit_mask = 0;
        unset.a_bit_mask = 0;
        assert!(unset.is_bgra32());

        let mut rgba = DdsPixelFormat::bgra8();
        rgba.r_bit_mask = 0x0000_00FF;
        rgba.b_bit_mask = 0x00FF_0000;
        assert!(!rgba.is_bgra32());

        let mut rgb565 = DdsPixelFormat::bgra8();
        rgb565.rgb_bit_count = 16;
        assert!(!rgb565.is_bgra32());

        assert!(!DdsPixelFormat::compressed(FourCC::DXT1).is_bgra32());
    }

    #[test]
    fn test_four_cc_display() {
        assert_eq!(FourCC::DXT1.to_string(), "DXT1");
        assert_eq!(FourCC(*b"AB\x01\xff").to_string(), "AB\\x01\\xff");
    }
}
