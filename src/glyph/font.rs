//! Font rasterizer capability.
//!
//! The glyph set needs only two primitives from a font backend: measure a
//! character's advance width and render a character's coverage into a pixel
//! surface. Everything else (resolution by name, fallback, filtering) is
//! built on top of these in [`super::set`].

use std::fmt;

use serde::Deserialize;

use super::GlyphError;
use crate::transfer::CellSize;

/// Font style requested alongside the family name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn name(&self) -> &'static str {
        match self {
            FontStyle::Regular => "regular",
            FontStyle::Bold => "bold",
            FontStyle::Italic => "italic",
            FontStyle::BoldItalic => "bold-italic",
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRequest {
    /// Family name; empty means "use the generic monospace font"
    pub family: String,
    /// Pixel size
    pub size: u32,
    pub style: FontStyle,
}

impl FontRequest {
    pub fn new(family: impl Into<String>, size: u32, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            size,
            style,
        }
    }
}

/// Row-major 8-bit coverage of one rendered character, `0` = untouched,
/// `255` = fully inked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Coverage {
    pub fn blank(cell: CellSize) -> Self {
        Self {
            width: cell.width,
            height: cell.height,
            data: vec![0; cell.width as usize * cell.height as usize],
        }
    }

    pub fn at(&self, x: u32, y: u32) -> u8 {
        self.data[(y * self.width + x) as usize]
    }
}

/// A font opened at a fixed pixel size. Dropping it releases the font.
pub trait LoadedFont {
    /// Resolved family name.
    fn family(&self) -> &str;

    /// Horizontal advance of `ch`, in pixels.
    fn advance_width(&self, ch: char) -> f32;

    /// Distance between baselines, in pixels.
    fn line_height(&self) -> f32;

    /// Render `ch` into a surface of exactly `cell` size, glyph origin at the
    /// surface's top-left line box.
    fn render(&self, ch: char, cell: CellSize) -> Result<Coverage, GlyphError>;
}

/// Source of fonts.
pub trait FontRasterizer {
    /// Open the named family in the given style and size, or `None` when
    /// no such font is available.
    fn open(&self, family: &str, style: FontStyle, size: u32) -> Option<Box<dyn LoadedFont>>;

    /// Open the generic monospaced fallback font. Failure here is fatal.
    fn open_generic_monospace(
        &self,
        style: FontStyle,
        size: u32,
    ) -> Result<Box<dyn LoadedFont>, GlyphError>;
}
