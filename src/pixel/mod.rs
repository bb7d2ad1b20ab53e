//! Pixel buffers and the whole-image operations applied to them.
//!
//! 1. **Buffer** - planar RGB storage with clamped scalar arithmetic
//! 2. **Greyscale** - lightness-based desaturation
//! 3. **Tone** - the contrast/brightness curve applied before matching

mod buffer;
mod greyscale;
mod tone;

pub use buffer::PixelBuffer;
pub use greyscale::lightness;
pub use tone::ToneMap;

/// Errors raised by pixel buffer construction and binary operations.
#[derive(Debug, thiserror::Error)]
pub enum PixelError {
    #[error("expected {expected} bytes for a {width}x{height} RGB buffer, got {actual}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("channel planes have differing shapes")]
    RaggedPlanes,

    #[error("buffer dimensions differ: {left:?} vs {right:?}")]
    DimensionMismatch { left: (u32, u32), right: (u32, u32) },
}
