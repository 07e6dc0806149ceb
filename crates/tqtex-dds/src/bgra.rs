//! Uncompressed 32-bit BGRA unpacking.

use crate::format::rgba_len;
use crate::{Error, Result};

/// Row order of an uncompressed surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// First stored row is the top of the image (standard DDS).
    TopDown,
    /// First stored row is the bottom of the image.
    BottomUp,
}

/// Reorder tightly packed B, G, R, A samples into top-down RGBA.
///
/// With `opaque` set the stored alpha byte is ignored and every output
/// texel gets alpha 255 (X8R8G8B8 surfaces). Bytes beyond
/// `width * height * 4` are ignored.
pub fn bgra_to_rgba(
    data: &[u8],
    width: u32,
    height: u32,
    order: RowOrder,
    opaque: bool,
) -> Result<Vec<u8>> {
    let row_len = rgba_len(width, 1)?;
    let expected = rgba_len(width, height)?;
    if data.len() < expected {
        return Err(Error::TruncatedData {
            format: "BGRA8",
            expected,
            actual: data.len(),
        });
    }

    let mut out = Vec::with_capacity(expected);
    let rows = data[..expected].chunks_exact(row_len.max(1));
    let mut push_row = |row: &[u8]| {
        for bgra in row.chunks_exact(4) {
            let alpha = if opaque { 255 } else { bgra[3] };
            out.extend_from_slice(&[bgra[2], bgra[1], bgra[0], alpha]);
        }
    };

    match order {
        RowOrder::TopDown => rows.for_each(&mut push_row),
        RowOrder::BottomUp => rows.rev().for_each(&mut push_row),
    }

    Ok(out)
}
