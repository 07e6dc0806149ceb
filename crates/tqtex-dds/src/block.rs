//! DXT1/DXT3/DXT5 (BC1/BC2/BC3) block decoding.
//!
//! Each block covers a 4x4 texel region. Blocks are stored row-major,
//! left-to-right then top-to-bottom; blocks hanging over the right or bottom
//! edge of a surface whose size is not a multiple of four are clipped.

use crate::format::rgba_len;
use crate::{DdsFormat, Error, Result};

/// One decoded 4x4 block, texels in row-major order.
type Texels = [[u8; 4]; 16];

/// Decode a block-compressed surface into tightly packed RGBA.
///
/// `format` must be one of the block formats; uncompressed formats are
/// handled by [`crate::bgra::bgra_to_rgba`].
pub fn decode_blocks(format: DdsFormat, data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let (decode_block, block_size): (fn(&[u8]) -> Texels, usize) = match format {
        DdsFormat::Dxt1 => (decode_dxt1_block, 8),
        DdsFormat::Dxt3 => (decode_dxt3_block, 16),
        DdsFormat::Dxt5 => (decode_dxt5_block, 16),
        DdsFormat::Bgra8 { .. } => {
            return Err(Error::UnsupportedPixelFormat(format!(
                "{format} is not block-compressed"
            )))
        }
    };

    let expected = format.surface_size(width, height)?;
    if data.len() < expected {
        return Err(Error::TruncatedData {
            format: format.name(),
            expected,
            actual: data.len(),
        });
    }

    let blocks_x = (width as usize).div_ceil(4);
    let mut out = vec![0u8; rgba_len(width, height)?];

    for (index, block) in data[..expected].chunks_exact(block_size).enumerate() {
        let texels = decode_block(block);
        write_block(&mut out, width, height, index % blocks_x, index / blocks_x, &texels);
    }

    Ok(out)
}

fn decode_dxt1_block(block: &[u8]) -> Texels {
    decode_color_block(block, false)
}

fn decode_dxt3_block(block: &[u8]) -> Texels {
    let mut texels = decode_color_block(&block[8..], true);
    apply_explicit_alpha(&mut texels, &block[..8]);
    texels
}

fn decode_dxt5_block(block: &[u8]) -> Texels {
    let mut texels = decode_color_block(&block[8..], true);
    apply_interpolated_alpha(&mut texels, &block[..8]);
    texels
}

/// Expand an RGB565 color to 8 bits per channel by bit replication.
pub fn rgb565_to_rgb888(color: u16) -> [u8; 3] {
    let r = ((color >> 11) & 0x1F) as u8;
    let g = ((color >> 5) & 0x3F) as u8;
    let b = (color & 0x1F) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

/// Decode the 8-byte color part shared by all three formats.
///
/// DXT3 and DXT5 always use the four-color palette; DXT1 switches to three
/// colors plus transparent black when `c0 <= c1`.
fn decode_color_block(block: &[u8], force_four_color: bool) -> Texels {
    let c0 = u16::from_le_bytes([block[0], block[1]]);
    let c1 = u16::from_le_bytes([block[2], block[3]]);
    let indices = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);

    let [r0, g0, b0] = rgb565_to_rgb888(c0);
    let [r1, g1, b1] = rgb565_to_rgb888(c1);
    let lerp = |a: u8, b: u8, wa: u16, wb: u16| ((a as u16 * wa + b as u16 * wb) / (wa + wb)) as u8;

    let mut palette = [[r0, g0, b0, 255], [r1, g1, b1, 255], [0; 4], [0; 4]];
    if force_four_color || c0 > c1 {
        palette[2] = [lerp(r0, r1, 2, 1), lerp(g0, g1, 2, 1), lerp(b0, b1, 2, 1), 255];
        palette[3] = [lerp(r0, r1, 1, 2), lerp(g0, g1, 1, 2), lerp(b0, b1, 1, 2), 255];
    } else {
        palette[2] = [lerp(r0, r1, 1, 1), lerp(g0, g1, 1, 1), lerp(b0, b1, 1, 1), 255];
        // palette[3] stays transparent black
    }

    let mut texels = [[0u8; 4]; 16];
    for (i, texel) in texels.iter_mut().enumerate() {
        *texel = palette[((indices >> (2 * i)) & 0x3) as usize];
    }
    texels
}

/// DXT3: sixteen explicit 4-bit alpha values, low nibble first.
fn apply_explicit_alpha(texels: &mut Texels, alpha: &[u8]) {
    let bits = u64::from_le_bytes([
        alpha[0], alpha[1], alpha[2], alpha[3], alpha[4], alpha[5], alpha[6], alpha[7],
    ]);
    for (i, texel) in texels.iter_mut().enumerate() {
        let nibble = ((bits >> (4 * i)) & 0xF) as u8;
        texel[3] = nibble * 17;
    }
}

/// DXT5: two alpha endpoints and sixteen 3-bit palette indices.
fn apply_interpolated_alpha(texels: &mut Texels, alpha: &[u8]) {
    let palette = alpha_palette(alpha[0], alpha[1]);
    let bits = u64::from_le_bytes([
        alpha[2], alpha[3], alpha[4], alpha[5], alpha[6], alpha[7], 0, 0,
    ]);
    for (i, texel) in texels.iter_mut().enumerate() {
        texel[3] = palette[((bits >> (3 * i)) & 0x7) as usize];
    }
}

/// Build the eight-entry DXT5 alpha palette.
fn alpha_palette(a0: u8, a1: u8) -> [u8; 8] {
    let (a0w, a1w) = (a0 as u16, a1 as u16);
    let mut palette = [a0, a1, 0, 0, 0, 0, 0, 0];
    if a0 > a1 {
        for (step, entry) in palette[2..].iter_mut().enumerate() {
            let step = step as u16 + 1;
            *entry = (((7 - step) * a0w + step * a1w) / 7) as u8;
        }
    } else {
        for (step, entry) in palette[2..6].iter_mut().enumerate() {
            let step = step as u16 + 1;
            *entry = (((5 - step) * a0w + step * a1w) / 5) as u8;
        }
        palette[6] = 0;
        palette[7] = 255;
    }
    palette
}

/// Copy a decoded block into the output, clipping at the surface edges.
fn write_block(out: &mut [u8], width: u32, height: u32, block_x: usize, block_y: usize, texels: &Texels) {
    let (width, height) = (width as usize, height as usize);
    for row in 0..4 {
        let y = block_y * 4 + row;
        if y >= height {
            break;
        }
        for col in 0..4 {
            let x = block_x * 4 + col;
            if x >= width {
                break;
            }
            let offset = (y * width + x) * 4;
            out[offset..offset + 4].copy_from_slice(&texels[row * 4 + col]);
        }
    }
}
