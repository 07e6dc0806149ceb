//! Image assembly and PNG output.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::{DecodeError, PixelBuffer, Result};

/// A fully decoded texture: the only artifact a conversion produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: PixelBuffer,
}

/// Wrap decoded pixels with their dimensions.
///
/// Fails with [`DecodeError::PixelBufferSizeMismatch`] unless the buffer is
/// exactly `width * height * 4` bytes.
pub fn assemble(width: u32, height: u32, pixels: PixelBuffer) -> Result<DecodedImage> {
    let expected = tqtex_dds::rgba_len(width, height)?;
    if pixels.len() != expected {
        return Err(DecodeError::PixelBufferSizeMismatch {
            expected,
            actual: pixels.len(),
        }
        .into());
    }
    Ok(DecodedImage {
        width,
        height,
        pixels,
    })
}

impl DecodedImage {
    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA bytes, top-down rows.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    /// RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.pixels()[offset..offset + 4]);
        Some(rgba)
    }

    /// Convert into an `image` buffer for further processing.
    pub fn into_rgba_image(self) -> Result<RgbaImage> {
        let expected = self.width as usize * self.height as usize * 4;
        let actual = self.pixels.len();
        RgbaImage::from_raw(self.width, self.height, self.pixels.into_inner())
            .ok_or_else(|| DecodeError::PixelBufferSizeMismatch { expected, actual }.into())
    }

    /// Encode as PNG in memory.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.clone()
            .into_rgba_image()?
            .write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    /// Write a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.clone()
            .into_rgba_image()?
            .save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}
