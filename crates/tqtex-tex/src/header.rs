//! TEX container header.
//!
//! Both known container versions start with a 12-byte prefix:
//!
//! | offset | size | field                                           |
//! |--------|------|-------------------------------------------------|
//! | 0      | 4    | magic, `TEX\x01` or `TEX\x02`                   |
//! | 4      | 4    | frame rate (animated textures, otherwise 0)     |
//! | 8      | 4    | payload length, 0 meaning "to end of file"      |
//!
//! The payload that follows is a DDS stream. Its 128-byte header carries the
//! image dimensions, so the container header is only complete once that
//! descriptor is present too.

use std::fmt;
use std::ops::Range;

use tqtex_common::BinaryReader;
use tqtex_dds::{DdsHeader, DdsSurface};

use crate::FormatError;

/// Container version, identified by the magic tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexVersion {
    /// `TEX\x01`
    V1,
    /// `TEX\x02`
    V2,
}

impl fmt::Display for TexVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("TEX v1"),
            Self::V2 => f.write_str("TEX v2"),
        }
    }
}

/// Byte layout of one container version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexLayout {
    /// Version this layout describes.
    pub version: TexVersion,
    /// Magic tag at offset 0.
    pub magic: [u8; 4],
    /// Offset of the `u32` frame rate.
    pub frame_rate_offset: usize,
    /// Offset of the `u32` payload length.
    pub payload_len_offset: usize,
    /// Offset at which the payload starts.
    pub payload_offset: usize,
}

impl TexLayout {
    /// Bytes needed before the declared dimensions and format are known.
    pub const fn header_len(&self) -> usize {
        self.payload_offset + DdsSurface::HEADER_LEN
    }
}

/// Known container layouts, looked up by magic.
pub const LAYOUTS: [TexLayout; 2] = [
    TexLayout {
        version: TexVersion::V1,
        magic: *b"TEX\x01",
        frame_rate_offset: 4,
        payload_len_offset: 8,
        payload_offset: 12,
    },
    TexLayout {
        version: TexVersion::V2,
        magic: *b"TEX\x02",
        frame_rate_offset: 4,
        payload_len_offset: 8,
        payload_offset: 12,
    },
];

/// What the payload range holds.
///
/// Both container versions wrap a DDS stream, so [`parse_header`] always
/// reports [`PayloadFormat::Dds`]. Headerless pixel rows enter the pipeline
/// through [`crate::convert_raw_bgra`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    /// A complete DDS stream, signature included.
    Dds,
    /// Tightly packed BGRA rows, bottom-up, no sub-header.
    RawBgra,
}

/// Parsed container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexHeader {
    /// Container version.
    pub version: TexVersion,
    /// Frame rate field (0 for still textures).
    pub frame_rate: u32,
    /// Declared image width.
    pub width: u32,
    /// Declared image height.
    pub height: u32,
    /// What the payload range holds.
    pub format: PayloadFormat,
    /// Start of the payload within the original buffer.
    pub payload_offset: usize,
    /// Length of the payload.
    pub payload_len: usize,
}

impl TexHeader {
    /// Byte range of the payload within the original buffer.
    pub fn payload_range(&self) -> Range<usize> {
        self.payload_offset..self.payload_offset + self.payload_len
    }

    /// Borrow the payload from the buffer the header was parsed from.
    pub fn payload<'a>(&self, bytes: &'a [u8]) -> Result<&'a [u8], FormatError> {
        bytes
            .get(self.payload_range())
            .ok_or(FormatError::InvalidPayloadBounds {
                offset: self.payload_offset,
                length: self.payload_len,
                buffer_len: bytes.len(),
            })
    }
}

/// Find the layout matching the magic tag.
pub fn layout_for(bytes: &[u8]) -> Result<&'static TexLayout, FormatError> {
    let magic: [u8; 4] = BinaryReader::new(bytes).read_array().map_err(|_| {
        FormatError::TruncatedHeader {
            needed: 4,
            available: bytes.len(),
        }
    })?;

    LAYOUTS
        .iter()
        .find(|layout| layout.magic == magic)
        .ok_or(FormatError::UnrecognizedMagic(magic))
}

/// Locate the embedded stream declared by the container prefix.
pub(crate) fn stream_range(layout: &TexLayout, bytes: &[u8]) -> Result<Range<usize>, FormatError> {
    let reader = BinaryReader::new(bytes);
    let declared = reader
        .u32_at(layout.payload_len_offset)
        .map_err(|_| FormatError::TruncatedHeader {
            needed: layout.payload_offset,
            available: bytes.len(),
        })? as usize;

    let offset = layout.payload_offset;
    let length = if declared == 0 {
        bytes.len().saturating_sub(offset)
    } else {
        declared
    };

    match offset.checked_add(length) {
        Some(end) if end <= bytes.len() => Ok(offset..end),
        _ => Err(FormatError::InvalidPayloadBounds {
            offset,
            length,
            buffer_len: bytes.len(),
        }),
    }
}

/// Parse the container header.
///
/// Pure function of its input: recognizes the version, validates the payload
/// bounds and reads the declared dimensions from the surface descriptor.
pub fn parse_header(bytes: &[u8]) -> Result<TexHeader, FormatError> {
    let layout = layout_for(bytes)?;

    let needed = layout.header_len();
    if bytes.len() < needed {
        return Err(FormatError::TruncatedHeader {
            needed,
            available: bytes.len(),
        });
    }

    let reader = BinaryReader::new(bytes);
    let frame_rate = reader
        .u32_at(layout.frame_rate_offset)
        .map_err(|_| FormatError::TruncatedHeader {
            needed,
            available: bytes.len(),
        })?;

    let stream = stream_range(layout, bytes)?;
    let payload = &bytes[stream.clone()];
    if payload.len() < DdsSurface::HEADER_LEN {
        return Err(FormatError::TruncatedHeader {
            needed: stream.start + DdsSurface::HEADER_LEN,
            available: stream.end,
        });
    }

    if !DdsSurface::is_dds(payload) {
        let mut found = [0u8; 4];
        found.copy_from_slice(&payload[..4]);
        return Err(FormatError::MissingDdsSignature(found));
    }

    let descriptor: DdsHeader = BinaryReader::new_at(payload, 4)
        .read_struct()
        .map_err(|e| FormatError::InvalidDdsHeader(e.to_string()))?;
    let (width, height) = (descriptor.width, descriptor.height);
    if width == 0 || height == 0 {
        return Err(FormatError::ZeroDimensions { width, height });
    }

    let header = TexHeader {
        version: layout.version,
        frame_rate,
        width,
        height,
        format: PayloadFormat::Dds,
        payload_offset: stream.start,
        payload_len: stream.len(),
    };
    log::debug!(
        "{} header: {}x{} {:?} payload at {}..{}",
        header.version,
        header.width,
        header.height,
        header.format,
        header.payload_offset,
        header.payload_offset + header.payload_len
    );

    Ok(header)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tqtex_dds::{DdsPixelFormat, FourCC};
    use zerocopy::IntoBytes;

    use super::*;

    fn tex(magic: &[u8; 4], declared_len: u32, stream: &[u8]) -> Vec<u8> {
        let mut out = magic.to_vec();
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&declared_len.to_le_bytes());
        out.extend_from_slice(stream);
        out
    }

    fn dds(signature: &[u8; 4], header: DdsHeader, data: &[u8]) -> Vec<u8> {
        let mut out = signature.to_vec();
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(data);
        out
    }

    fn dxt1_stream(width: u32, height: u32) -> Vec<u8> {
        let blocks = tqtex_dds::block_count(width, height).unwrap();
        dds(
            b"DDS ",
            DdsHeader::new(width, height, DdsPixelFormat::compressed(FourCC::DXT1)),
            &vec![0; blocks * 8],
        )
    }

    #[test]
    fn test_parse_v1_dds() {
        let stream = dxt1_stream(8, 4);
        let bytes = tex(b"TEX\x01", stream.len() as u32, &stream);

        let header = parse_header(&bytes).unwrap();
        assert_eq!(
            header,
            TexHeader {
                version: TexVersion::V1,
                frame_rate: 0,
                width: 8,
                height: 4,
                format: PayloadFormat::Dds,
                payload_offset: 12,
                payload_len: stream.len(),
            }
        );
        assert_eq!(header.payload(&bytes).unwrap(), &stream[..]);
    }

    #[test]
    fn test_parse_v2_with_frame_rate() {
        let stream = dxt1_stream(4, 4);
        let mut bytes = tex(b"TEX\x02", 0, &stream);
        bytes[4..8].copy_from_slice(&15u32.to_le_bytes());

        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.version, TexVersion::V2);
        assert_eq!(header.frame_rate, 15);
        // Zero length runs to the end of the buffer.
        assert_eq!(header.payload_range(), 12..bytes.len());
    }

    #[test]
    fn test_uncompressed_surface_keeps_descriptor() {
        let stream = dds(b"DDSR", DdsHeader::new(2, 1, DdsPixelFormat::bgra8()), &[7; 8]);
        let bytes = tex(b"TEX\x01", 0, &stream);

        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.format, PayloadFormat::Dds);
        assert_eq!(header.payload_range(), 12..bytes.len());
        assert_eq!(header.payload(&bytes).unwrap(), &stream[..]);
    }

    #[test]
    fn test_unrecognized_magic() {
        let stream = dxt1_stream(4, 4);
        for magic in [b"TEX\x00", b"TEX\x03", b"XET\x01", b"DDS "] {
            let bytes = tex(magic, 0, &stream);
            assert_eq!(
                parse_header(&bytes).unwrap_err(),
                FormatError::UnrecognizedMagic(*magic)
            );
        }
    }

    #[test]
    fn test_every_truncation_fails_cleanly() {
        let stream = dxt1_stream(4, 4);
        let bytes = tex(b"TEX\x01", 0, &stream);
        let header_len = LAYOUTS[0].header_len();

        for len in 0..header_len {
            let err = parse_header(&bytes[..len]).unwrap_err();
            assert!(
                matches!(err, FormatError::TruncatedHeader { .. }),
                "length {len}: {err:?}"
            );
        }
    }

    #[test]
    fn test_payload_out_of_bounds() {
        let stream = dxt1_stream(4, 4);
        let bytes = tex(b"TEX\x01", stream.len() as u32 + 1, &stream);

        assert_eq!(
            parse_header(&bytes).unwrap_err(),
            FormatError::InvalidPayloadBounds {
                offset: 12,
                length: stream.len() + 1,
                buffer_len: bytes.len(),
            }
        );

        let huge = tex(b"TEX\x01", u32::MAX, &stream);
        assert!(matches!(
            parse_header(&huge),
            Err(FormatError::InvalidPayloadBounds { .. })
        ));
    }

    #[test]
    fn test_declared_payload_shorter_than_descriptor() {
        let stream = dxt1_stream(4, 4);
        let bytes = tex(b"TEX\x01", 64, &stream);
        assert!(matches!(
            parse_header(&bytes),
            Err(FormatError::TruncatedHeader { .. })
        ));
    }

    #[test]
    fn test_missing_dds_signature() {
        let mut stream = dxt1_stream(4, 4);
        stream[..4].copy_from_slice(b"PNG\x00");
        let bytes = tex(b"TEX\x01", 0, &stream);
        assert_eq!(
            parse_header(&bytes).unwrap_err(),
            FormatError::MissingDdsSignature(*b"PNG\x00")
        );
    }

    #[test]
    fn test_zero_dimensions() {
        let stream = dxt1_stream(0, 4);
        let bytes = tex(b"TEX\x01", 0, &stream);
        assert_eq!(
            parse_header(&bytes).unwrap_err(),
            FormatError::ZeroDimensions {
                width: 0,
                height: 4
            }
        );
    }
}
