//! DDS stream parsing.

use tqtex_common::BinaryReader;

use crate::bgra::{bgra_to_rgba, RowOrder};
use crate::block::decode_blocks;
use crate::header::{DdsHeader, DdsHeaderDxt10};
use crate::{DdsFormat, Error, Result, DDS_MAGIC, DDS_MAGIC_TQ};

/// A parsed DDS stream: header, classified format and top-level pixel data.
#[derive(Debug, Clone, Copy)]
pub struct DdsSurface<'a> {
    /// Main header.
    pub header: DdsHeader,
    /// Extended header, present when the fourCC is `DX10`.
    pub dx10: Option<DdsHeaderDxt10>,
    /// Classified pixel format.
    pub format: DdsFormat,
    /// Everything after the headers: the top-level surface followed by any
    /// further mip levels.
    pub data: &'a [u8],
}

impl<'a> DdsSurface<'a> {
    /// Size of the magic plus the main header.
    pub const HEADER_LEN: usize = 4 + DdsHeader::SIZE as usize;

    /// Check whether data starts with a DDS signature (`DDS ` or `DDSR`).
    pub fn is_dds(data: &[u8]) -> bool {
        data.len() >= 4 && (&data[..4] == DDS_MAGIC || &data[..4] == DDS_MAGIC_TQ)
    }

    /// Parse a DDS stream.
    ///
    /// Validates the signature and header size, classifies the pixel format
    /// and checks that the top-level surface is fully present.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let magic: [u8; 4] = reader.read_array()?;
        if &magic != DDS_MAGIC && &magic != DDS_MAGIC_TQ {
            return Err(Error::InvalidMagic(magic));
        }

        let header: DdsHeader = reader.read_struct()?;
        let size = header.size;
        if size != DdsHeader::SIZE {
            return Err(Error::InvalidHeader(format!(
                "header size {size}, expected {}",
                DdsHeader::SIZE
            )));
        }

        let (width, height) = (header.width, header.height);
        if width == 0 || height == 0 {
            return Err(Error::InvalidHeader(format!(
                "zero-sized surface {width}x{height}"
            )));
        }

        let dx10 = if header.is_dx10() {
            Some(reader.read_struct::<DdsHeaderDxt10>()?)
        } else {
            None
        };

        let format = DdsFormat::from_header(&header, dx10.as_ref())?;
        let data = reader.remaining_bytes();

        let expected = format.surface_size(width, height)?;
        if data.len() < expected {
            return Err(Error::TruncatedData {
                format: format.name(),
                expected,
                actual: data.len(),
            });
        }

        log::trace!(
            "DDS surface {}x{} {} ({} mip levels, pitch/linear size {})",
            width,
            height,
            format,
            header.mip_levels(),
            { header.pitch_or_linear_size }
        );

        Ok(Self {
            header,
            dx10,
            format,
            data,
        })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.header.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.header.height
    }

    /// Bytes of the top-level surface.
    pub fn top_level(&self) -> &'a [u8] {
        let size = self
            .format
            .surface_size(self.width(), self.height())
            .unwrap_or(self.data.len());
        &self.data[..size.min(self.data.len())]
    }

    /// Decode the top-level surface into top-down RGBA.
    pub fn decode(&self) -> Result<Vec<u8>> {
        decode_surface(self.format, self.top_level(), self.width(), self.height(), RowOrder::TopDown)
    }
}

/// Decode pixel data of a known format into top-down RGBA.
///
/// `order` only applies to uncompressed formats; block-compressed data is
/// always stored top-down.
pub fn decode_surface(
    format: DdsFormat,
    data: &[u8],
    width: u32,
    height: u32,
    order: RowOrder,
) -> Result<Vec<u8>> {
    match format {
        DdsFormat::Dxt1 | DdsFormat::Dxt3 | DdsFormat::Dxt5 => decode_blocks(format, data, width, height),
        DdsFormat::Bgra8 { opaque } => bgra_to_rgba(data, width, height, order, opaque),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use zerocopy::IntoBytes;

    use super::*;
    use crate::header::{DdsPixelFormat, FourCC};

    fn dds_bytes(header: DdsHeader, payload: &[u8]) -> Vec<u8> {
        let mut out = DDS_MAGIC.to_vec();
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn test_parse_dxt1() {
        let block = [0x00, 0xF8, 0x1F, 0x00, 0, 0, 0, 0];
        let data = dds_bytes(
            DdsHeader::new(4, 4, DdsPixelFormat::compressed(FourCC::DXT1)),
            &block,
        );

        let surface = DdsSurface::parse(&data).unwrap();
        assert_eq!(surface.format, DdsFormat::Dxt1);
        assert_eq!((surface.width(), surface.height()), (4, 4));
        assert!(surface.dx10.is_none());

        let rgba = surface.decode().unwrap();
        assert_eq!(&rgba[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_tq_signature_is_accepted() {
        let mut data = dds_bytes(DdsHeader::new(1, 1, DdsPixelFormat::bgra8()), &[1, 2, 3, 4]);
        data[..4].copy_from_slice(DDS_MAGIC_TQ);

        assert!(DdsSurface::is_dds(&data));
        let surface = DdsSurface::parse(&data).unwrap();
        assert_eq!(surface.decode().unwrap(), vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_dx10_header_is_skipped() {
        let ext = DdsHeaderDxt10 {
            dxgi_format: 87,
            resource_dimension: 3,
            misc_flag: 0,
            array_size: 1,
            misc_flags2: 0,
        };
        let mut payload = ext.as_bytes().to_vec();
        payload.extend_from_slice(&[1, 2, 3, 4]);
        let data = dds_bytes(
            DdsHeader::new(1, 1, DdsPixelFormat::compressed(FourCC::DX10)),
            &payload,
        );

        let surface = DdsSurface::parse(&data).unwrap();
        assert_eq!(surface.format, DdsFormat::Bgra8 { opaque: false });
        assert_eq!(surface.data, &[1, 2, 3, 4]);
    }

    #[test]
    fn test_bad_magic() {
        let mut data = dds_bytes(DdsHeader::new(1, 1, DdsPixelFormat::bgra8()), &[0; 4]);
        data[..4].copy_from_slice(b"PNG!");
        assert_eq!(
            DdsSurface::parse(&data).unwrap_err(),
            Error::InvalidMagic(*b"PNG!")
        );
        assert!(!DdsSurface::is_dds(&data));
    }

    #[test]
    fn test_bad_header_size() {
        let mut header = DdsHeader::new(1, 1, DdsPixelFormat::bgra8());
        header.size = 100;
        let data = dds_bytes(header, &[0; 4]);
        assert!(matches!(
            DdsSurface::parse(&data),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_truncated_header() {
        let data = dds_bytes(DdsHeader::new(1, 1, DdsPixelFormat::bgra8()), &[0; 4]);
        for len in 0..DdsSurface::HEADER_LEN {
            assert!(DdsSurface::parse(&data[..len]).is_err(), "length {len}");
        }
    }

    #[test]
    fn test_truncated_surface() {
        let data = dds_bytes(
            DdsHeader::new(8, 8, DdsPixelFormat::compressed(FourCC::DXT5)),
            &[0; 63],
        );
        assert_eq!(
            DdsSurface::parse(&data).unwrap_err(),
            Error::TruncatedData {
                format: "DXT5",
                expected: 64,
                actual: 63
            }
        );
    }

    #[test]
    fn test_oversized_surface() {
        let data = dds_bytes(
            DdsHeader::new(u32::MAX, u32::MAX, DdsPixelFormat::compressed(FourCC::DXT5)),
            &[0; 16],
        );
        assert_eq!(
            DdsSurface::parse(&data).unwrap_err(),
            Error::SurfaceTooLarge {
                width: u32::MAX,
                height: u32::MAX
            }
        );
    }

    #[test]
    fn test_mip_chain_is_ignored() {
        // 4x4 DXT1 plus a trailing 2x2 mip level.
        let mut header = DdsHeader::new(4, 4, DdsPixelFormat::compressed(FourCC::DXT1));
        header.mipmap_count = 3;
        let data = dds_bytes(header, &[0; 24]);

        let surface = DdsSurface::parse(&data).unwrap();
        assert_eq!(surface.header.mip_levels(), 3);
        assert_eq!(surface.top_level().len(), 8);
    }
}
