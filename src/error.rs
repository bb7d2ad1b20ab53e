//! Crate-level error returned by a conversion job.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::glyph::GlyphError;
use crate::transfer::TransferError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the compute engine could not be initialized")]
    EngineUnavailable,

    #[error(
        "The scale is too large for this font size. Either increase the font size or decrease the scale. \
         ({font_size}px at scale {scale} renders below 4px)"
    )]
    ScaleTooLarge { font_size: u32, scale: f32 },

    #[error("failed to read image \"{}\": {source}", .path.display())]
    ImageRead {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to write image \"{}\": {source}", .path.display())]
    ImageWrite {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to write \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Glyph(#[from] GlyphError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
