//! tqtex - Titan Quest texture conversion library.
//!
//! This crate provides a unified interface to the tqtex crates.
//!
//! # Crates
//!
//! - [`tqtex_common`] - Bounds-checked binary reading
//! - [`tqtex_dds`] - DDS surface parsing and DXT1/DXT3/DXT5/BGRA decoding
//! - [`tqtex_tex`] - `.tex` container parsing and the conversion pipeline
//!
//! # Example
//!
//! ```no_run
//! use tqtex::prelude::*;
//!
//! let bytes = std::fs::read("ui_button.tex")?;
//! let header = parse_header(&bytes)?;
//! println!("{} {}x{}", header.version, header.width, header.height);
//!
//! let image = convert(&bytes)?;
//! image.save_png("ui_button.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use tqtex_common as common;
pub use tqtex_dds as dds;
pub use tqtex_tex as tex;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tqtex_common::BinaryReader;
    pub use tqtex_dds::{DdsFormat, DdsSurface};
    pub use tqtex_tex::{
        convert, convert_raw_bgra, parse_header, tex_to_dds, DecodedImage, PayloadFormat,
        TexHeader, TexVersion,
    };
}

// Re-export commonly used types at the crate root
pub use tqtex_tex::{convert, DecodedImage, Error, Result};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
