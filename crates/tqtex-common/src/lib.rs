//! Common utilities for tqtex.
//!
//! This crate provides the foundational pieces shared by the texture crates:
//!
//! - [`BinaryReader`] - Bounds-checked, zero-copy reading from byte slices
//! - [`Error`] - Buffer underrun errors

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::BinaryReader;
