//! Titan Quest `.tex` texture decoding.
//!
//! A `.tex` file is a 12-byte container prefix followed by a DDS stream.
//! Conversion is a straight pipeline, each stage failing fast:
//!
//! 1. [`parse_header`] - recognize the version, locate the payload, read the
//!    declared dimensions and payload format
//! 2. [`classify`] - validate the payload and produce a [`PixelSource`]
//! 3. [`decode`] - decode DXT blocks or reorder BGRA samples into a
//!    [`PixelBuffer`]
//! 4. [`assemble`] - wrap the pixels into a [`DecodedImage`]
//!
//! [`convert`] runs all four. [`convert_raw_bgra`] does the same for a
//! headerless buffer of bottom-up BGRA rows. Everything here is a pure
//! function of its input, so conversions can run on as many threads as the
//! caller likes.
//!
//! # Example
//!
//! ```no_run
//! use tqtex_tex::convert;
//!
//! let bytes = std::fs::read("texture.tex")?;
//! let image = convert(&bytes)?;
//! println!("{}x{}", image.width(), image.height());
//! image.save_png("texture.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod assemble;
mod classify;
mod convert;
mod decode;
mod error;
mod header;

pub use assemble::{assemble, DecodedImage};
pub use classify::{classify, PixelSource};
pub use convert::{convert, convert_raw_bgra, tex_to_dds};
pub use decode::{decode, PixelBuffer};
pub use error::{DecodeError, Error, FormatError, Result};
pub use header::{layout_for, parse_header, PayloadFormat, TexHeader, TexLayout, TexVersion, LAYOUTS};
