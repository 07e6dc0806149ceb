//! Payload classification.

use tqtex_dds::{DdsFormat, DdsSurface};

use crate::{FormatError, PayloadFormat};

/// Where the pixels come from and how they are stored.
#[derive(Debug, Clone, Copy)]
pub enum PixelSource<'a> {
    /// A parsed DDS stream; its format is one of the supported set.
    Dds(DdsSurface<'a>),
    /// Bottom-up BGRA rows with no sub-header.
    RawBgra(&'a [u8]),
}

impl PixelSource<'_> {
    /// Pixel format the decoder will apply.
    pub fn format(&self) -> DdsFormat {
        match self {
            Self::Dds(surface) => surface.format,
            Self::RawBgra(_) => DdsFormat::Bgra8 { opaque: false },
        }
    }
}

/// Classify a payload according to its declared format.
///
/// For DDS payloads this validates the signature and header, rejects pixel
/// formats outside DXT1/DXT3/DXT5/BGRA8 and checks that the surface matches
/// the declared dimensions. Both variants are checked for enough bytes to
/// cover `width * height` pixels.
pub fn classify<'a>(
    payload: &'a [u8],
    format: PayloadFormat,
    width: u32,
    height: u32,
) -> Result<PixelSource<'a>, FormatError> {
    match format {
        PayloadFormat::Dds => {
            let surface = DdsSurface::parse(payload)?;
            if surface.width() != width || surface.height() != height {
                return Err(FormatError::DimensionMismatch {
                    width,
                    height,
                    actual_width: surface.width(),
                    actual_height: surface.height(),
                });
            }
            log::trace!(
                "classified DDS payload: {} with {} mip levels",
                surface.format,
                surface.header.mip_levels()
            );
            Ok(PixelSource::Dds(surface))
        }
        PayloadFormat::RawBgra => {
            let format = DdsFormat::Bgra8 { opaque: false };
            let expected = format.surface_size(width, height)?;
            if payload.len() < expected {
                return Err(FormatError::PayloadTooSmall {
                    format: format.name(),
                    expected,
                    actual: payload.len(),
                });
            }
            Ok(PixelSource::RawBgra(payload))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tqtex_dds::{DdsHeader, DdsPixelFormat, FourCC};
    use zerocopy::IntoBytes;

    use super::*;

    fn dds(header: DdsHeader, data: &[u8]) -> Vec<u8> {
        let mut out = b"DDS ".to_vec();
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn test_classify_dxt5() {
        let payload = dds(
            DdsHeader::new(4, 8, DdsPixelFormat::compressed(FourCC::DXT5)),
            &[0; 32],
        );
        let source = classify(&payload, PayloadFormat::Dds, 4, 8).unwrap();
        assert_eq!(source.format(), DdsFormat::Dxt5);
        assert!(matches!(source, PixelSource::Dds(s) if s.data.len() == 32));
    }

    #[test]
    fn test_classify_raw() {
        let payload = [0u8; 16];
        let source = classify(&payload, PayloadFormat::RawBgra, 2, 2).unwrap();
        assert!(matches!(source, PixelSource::RawBgra(data) if data.len() == 16));
    }

    #[test]
    fn test_unsupported_four_cc() {
        let payload = dds(
            DdsHeader::new(4, 4, DdsPixelFormat::compressed(FourCC(*b"ATI1"))),
            &[0; 8],
        );
        assert_eq!(
            classify(&payload, PayloadFormat::Dds, 4, 4).unwrap_err(),
            FormatError::UnsupportedPixelFormat("fourCC \"ATI1\"".into())
        );
    }

    #[test]
    fn test_payload_too_small() {
        let payload = dds(
            DdsHeader::new(8, 8, DdsPixelFormat::compressed(FourCC::DXT1)),
            &[0; 24],
        );
        assert_eq!(
            classify(&payload, PayloadFormat::Dds, 8, 8).unwrap_err(),
            FormatError::PayloadTooSmall {
                format: "DXT1",
                expected: 32,
                actual: 24
            }
        );

        assert_eq!(
            classify(&[0; 15], PayloadFormat::RawBgra, 2, 2).unwrap_err(),
            FormatError::PayloadTooSmall {
                format: "BGRA8",
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_oversized_raw_surface() {
        assert_eq!(
            classify(&[0; 16], PayloadFormat::RawBgra, u32::MAX, u32::MAX).unwrap_err(),
            FormatError::SurfaceTooLarge {
                width: u32::MAX,
                height: u32::MAX
            }
        );
    }

    #[test]
    fn test_dimension_mismatch() {
        let payload = dds(
            DdsHeader::new(4, 4, DdsPixelFormat::compressed(FourCC::DXT1)),
            &[0; 8],
        );
        assert!(matches!(
            classify(&payload, PayloadFormat::Dds, 8, 4),
            Err(FormatError::DimensionMismatch { .. })
        ));
    }
}
