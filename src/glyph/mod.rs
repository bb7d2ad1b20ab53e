//! Glyph templates.
//!
//! 1. **Font backend** - [`FontRasterizer`] / [`LoadedFont`] abstract the
//!    two things needed from a font: advance widths and coverage rendering.
//! 2. **Glyph set** - [`GlyphSet`] resolves a font (with fallback), renders
//!    every candidate character and drops the ones the font cannot draw.
//! 3. **fontdue** - [`FontdueRasterizer`] is the on-disk implementation.

mod font;
mod fontdue_backend;
mod set;

pub use font::{Coverage, FontRasterizer, FontRequest, FontStyle, LoadedFont};
pub use fontdue_backend::{FontFace, FontdueFont, FontdueRasterizer, DEFAULT_FALLBACK_FAMILIES};
pub use set::{
    candidate_chars, is_candidate, is_monospaced, GlyphSet, MISSING_GLYPH_PROBE, MONOSPACE_PROBES,
    TEMPLATE_BACKGROUND,
};

use std::path::PathBuf;

/// Errors raised while resolving fonts or rendering glyphs.
#[derive(Debug, thiserror::Error)]
pub enum GlyphError {
    #[error("no monospaced font available (tried: {})", .tried.join(", "))]
    NoMonospaceFont { tried: Vec<String> },

    #[error("font \"{family}\" has an empty character cell")]
    EmptyCell { family: String },

    #[error("glyph {ch:?} rendered at {actual:?}, cell is {expected:?}")]
    SurfaceSize {
        ch: char,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("character {ch:?} is outside the glyph range")]
    UnsupportedCharacter { ch: char },

    #[error("template for {ch:?} is {actual:?}, cell is {expected:?}")]
    TemplateSize {
        ch: char,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("failed to load font {}: {reason}", .path.display())]
    FontLoad { path: PathBuf, reason: String },
}
