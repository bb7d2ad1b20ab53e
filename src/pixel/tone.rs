//! Contrast/brightness adjustment applied before glyph matching.

use serde::Deserialize;

use super::PixelBuffer;

/// A linear tone curve: `value * scale + offset`.
///
/// Compressing the input range away from pure black keeps dark regions
/// distinguishable from the glyph background during matching. The engine
/// undoes the curve with [`ToneMap::restore`] when it reports cell colors.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ToneMap {
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_offset")]
    pub offset: i32,
}

fn default_scale() -> f32 {
    0.75
}

fn default_offset() -> i32 {
    64
}

impl Default for ToneMap {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            offset: default_offset(),
        }
    }
}

impl ToneMap {
    /// A curve that leaves every value unchanged.
    pub const IDENTITY: ToneMap = ToneMap {
        scale: 1.0,
        offset: 0,
    };

    /// Scale then offset every channel, clamping as it goes.
    pub fn apply(&self, buffer: &PixelBuffer) -> PixelBuffer {
        buffer.scale(self.scale).add(self.offset)
    }

    /// Map a toned channel value back to the original range.
    pub fn restore(&self, value: f32) -> f32 {
        if self.scale == 0.0 {
            return 0.0;
        }
        ((value - self.offset as f32) / self.scale).clamp(0.0, 255.0)
    }
}
