//! Greyscale conversion for pixel buffers.

use super::PixelBuffer;
use crate::color::Rgb;

/// Lightness of one pixel: the brightest channel plus half the darkest,
/// saturating at 255.
pub fn lightness(color: Rgb) -> u8 {
    let max = color.r.max(color.g).max(color.b) as f32;
    let min = color.r.min(color.g).min(color.b) as f32;
    (max + min * 0.5).min(255.0) as u8
}

impl PixelBuffer {
    /// Return a copy with every pixel replaced by its [`lightness`] on all
    /// three channels.
    pub fn greyscale(&self) -> PixelBuffer {
        let mut grey = PixelBuffer::new(self.width(), self.height());
        for x in 0..self.width() {
            for y in 0..self.height() {
                grey.set_pixel(x, y, Rgb::grey(lightness(self.pixel(x, y))));
            }
        }
        grey
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lightness_pure_colors() {
        assert_eq!(lightness(Rgb::new(255, 0, 0)), 255);
        assert_eq!(lightness(Rgb::new(0, 0, 128)), 128);
        assert_eq!(lightness(Rgb::BLACK), 0);
    }

    #[test]
    fn test_lightness_saturates() {
        // 200 + 200 * 0.5 = 300 -> 255
        assert_eq!(lightness(Rgb::new(200, 220, 200)), 255);
        // 100 + 50 * 0.5 = 125
        assert_eq!(lightness(Rgb::new(50, 100, 80)), 125);
    }

    #[test]
    fn test_greyscale_sets_all_channels() {
        let mut p = PixelBuffer::new(2, 1);
        p.set_pixel(0, 0, Rgb::new(50, 100, 80));
        p.set_pixel(1, 0, Rgb::new(10, 0, 0));
        let g = p.greyscale();
        assert_eq!(g.pixel(0, 0), Rgb::grey(125));
        assert_eq!(g.pixel(1, 0), Rgb::grey(10));
        // source untouched
        assert_eq!(p.pixel(1, 0), Rgb::new(10, 0, 0));
    }
}
