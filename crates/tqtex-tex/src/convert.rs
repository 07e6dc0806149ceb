//! End-to-end conversion.

use tqtex_dds::{DdsSurface, DDS_MAGIC};

use crate::header::{layout_for, stream_range};
use crate::{assemble, classify, decode, parse_header, DecodedImage, FormatError, PayloadFormat, Result};

/// Convert the full contents of a `.tex` file into an RGBA image.
///
/// Runs header parsing, payload classification, pixel decoding and image
/// assembly in sequence. Any failure aborts the conversion; no partial image
/// is ever returned.
///
/// Short block or sample data is caught while classifying the payload, so it
/// surfaces as [`FormatError::PayloadTooSmall`] rather than
/// [`crate::DecodeError::BlockDataTruncated`].
///
/// # Example
///
/// ```no_run
/// let bytes = std::fs::read("creature.tex")?;
/// let image = tqtex_tex::convert(&bytes)?;
/// image.save_png("creature.png")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn convert(bytes: &[u8]) -> Result<DecodedImage> {
    let header = parse_header(bytes)?;
    let payload = header.payload(bytes)?;
    let source = classify(payload, header.format, header.width, header.height)?;

    log::debug!(
        "decoding {} {}x{} texture as {}",
        header.version,
        header.width,
        header.height,
        source.format()
    );

    let pixels = decode(source, header.width, header.height)?;
    assemble(header.width, header.height, pixels)
}

/// Convert headerless BGRA rows, stored bottom-up, into an RGBA image.
pub fn convert_raw_bgra(pixels: &[u8], width: u32, height: u32) -> Result<DecodedImage> {
    if width == 0 || height == 0 {
        return Err(FormatError::ZeroDimensions { width, height }.into());
    }

    let source = classify(pixels, PayloadFormat::RawBgra, width, height)?;
    let decoded = decode(source, width, height)?;
    assemble(width, height, decoded)
}

/// Extract the embedded DDS stream.
///
/// The Titan Quest `DDSR` signature is rewritten to the standard `DDS ` so
/// the result opens in ordinary DDS tools.
pub fn tex_to_dds(bytes: &[u8]) -> Result<Vec<u8>> {
    let layout = layout_for(bytes)?;
    let stream = &bytes[stream_range(layout, bytes)?];

    if !DdsSurface::is_dds(stream) {
        let mut found = [0u8; 4];
        let len = stream.len().min(4);
        found[..len].copy_from_slice(&stream[..len]);
        return Err(FormatError::MissingDdsSignature(found).into());
    }

    let mut dds = stream.to_vec();
    dds[..4].copy_from_slice(DDS_MAGIC);
    Ok(dds)
}
