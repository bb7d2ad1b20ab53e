//! glyphgrid library crate.
//!
//! Converts images into grids of best-matching text glyphs with per-cell
//! colors, written out as an image or an HTML document.

pub mod cli;
pub mod color;
pub mod compose;
pub mod config;
pub mod engine;
pub mod error;
pub mod glyph;
pub mod job;
pub mod kernel;
pub mod pixel;
pub mod transfer;

pub use error::Error;
