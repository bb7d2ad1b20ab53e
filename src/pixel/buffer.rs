//! The canonical RGB pixel grid.
//!
//! Storage is planar and column-major: one plane per channel, each plane
//! laid out column after column (`x * height + y`). The wire format produced
//! by [`PixelBuffer::serialize`] is interleaved and row-major. The two orders
//! never coincide, so every crossing goes through `serialize` or
//! `from_interleaved`.

use super::PixelError;
use crate::color::Rgb;

const CHANNELS: usize = 3;

/// An RGB image with three equally sized channel planes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    planes: [Vec<u8>; CHANNELS],
}

impl PixelBuffer {
    /// Create a `width x height` buffer of uniform grey.
    ///
    /// A zero width or height yields a valid, empty buffer.
    pub fn filled(width: u32, height: u32, brightness: u8) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            planes: [
                vec![brightness; len],
                vec![brightness; len],
                vec![brightness; len],
            ],
        }
    }

    /// Create a black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Copy the channels out of a decoded image.
    pub fn from_rgb_image(image: &image::RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let mut buffer = Self::new(width, height);
        for (x, y, pixel) in image.enumerate_pixels() {
            buffer.set_pixel(x, y, Rgb::new(pixel[0], pixel[1], pixel[2]));
        }
        buffer
    }

    /// Convert to an `image` crate buffer for encoding.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let c = self.pixel(x, y);
            image::Rgb([c.r, c.g, c.b])
        })
    }

    /// Rebuild a buffer from a row-major interleaved RGB stream.
    ///
    /// Inverse of [`serialize`](Self::serialize).
    pub fn from_interleaved(width: u32, height: u32, bytes: &[u8]) -> Result<Self, PixelError> {
        let expected = width as usize * height as usize * CHANNELS;
        if bytes.len() != expected {
            return Err(PixelError::LengthMismatch {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }

        let mut buffer = Self::new(width, height);
        for (i, rgb) in bytes.chunks_exact(CHANNELS).enumerate() {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            buffer.set_pixel(x, y, Rgb::from_triple(rgb));
        }
        Ok(buffer)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Length of the serialized form in bytes.
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * CHANNELS
    }

    fn index(&self, x: u32, y: u32) -> usize {
        x as usize * self.height as usize + y as usize
    }

    /// Read one pixel. Panics when `(x, y)` is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let i = self.index(x, y);
        Rgb::new(self.planes[0][i], self.planes[1][i], self.planes[2][i])
    }

    /// Overwrite one pixel in place. Panics when `(x, y)` is out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        let i = self.index(x, y);
        self.planes[0][i] = color.r;
        self.planes[1][i] = color.g;
        self.planes[2][i] = color.b;
    }

    /// Replace all three planes with per-column data.
    ///
    /// `columns[c][x][y]` is channel `c` at `(x, y)`. Width and height are
    /// taken from the shape of the assigned planes, which must all agree.
    pub fn set_pixels(&mut self, columns: [Vec<Vec<u8>>; CHANNELS]) -> Result<(), PixelError> {
        let width = columns[0].len();
        let height = columns[0].first().map_or(0, Vec::len);

        let ragged = columns
            .iter()
            .any(|plane| plane.len() != width || plane.iter().any(|col| col.len() != height));
        if ragged {
            return Err(PixelError::RaggedPlanes);
        }

        let [r, g, b] = columns;
        self.width = width as u32;
        self.height = if width == 0 { 0 } else { height as u32 };
        self.planes = [r.concat(), g.concat(), b.concat()];
        Ok(())
    }

    fn map_channels(&self, f: impl Fn(u8) -> u8) -> Self {
        Self {
            width: self.width,
            height: self.height,
            planes: [
                self.planes[0].iter().map(|&v| f(v)).collect(),
                self.planes[1].iter().map(|&v| f(v)).collect(),
                self.planes[2].iter().map(|&v| f(v)).collect(),
            ],
        }
    }

    /// Add a scalar to every channel of every pixel, clamped to 0..=255.
    pub fn add(&self, amount: i32) -> Self {
        self.map_channels(|v| (v as i32).saturating_add(amount).clamp(0, 255) as u8)
    }

    /// Multiply every channel of every pixel by a scalar, truncating and
    /// clamping to 0..=255.
    pub fn scale(&self, factor: f32) -> Self {
        self.map_channels(|v| ((v as f32 * factor) as i32).clamp(0, 255) as u8)
    }

    /// `255 - value` on every channel.
    pub fn invert(&self) -> Self {
        self.map_channels(|v| 255 - v)
    }

    /// Per-pixel clamped sum of two buffers of the same size.
    pub fn saturating_add(&self, other: &PixelBuffer) -> Result<Self, PixelError> {
        if self.width != other.width || self.height != other.height {
            return Err(PixelError::DimensionMismatch {
                left: (self.width, self.height),
                right: (other.width, other.height),
            });
        }
        let sum = |a: &[u8], b: &[u8]| -> Vec<u8> {
            a.iter().zip(b).map(|(&x, &y)| x.saturating_add(y)).collect()
        };
        Ok(Self {
            width: self.width,
            height: self.height,
            planes: [
                sum(&self.planes[0], &other.planes[0]),
                sum(&self.planes[1], &other.planes[1]),
                sum(&self.planes[2], &other.planes[2]),
            ],
        })
    }

    /// Flatten to interleaved RGB in row-major scan order: rows top to
    /// bottom, columns left to right, `R, G, B` per pixel.
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_len());
        for y in 0..self.height {
            for x in 0..self.width {
                let i = self.index(x, y);
                bytes.push(self.planes[0][i]);
                bytes.push(self.planes[1][i]);
                bytes.push(self.planes[2][i]);
            }
        }
        bytes
    }
}
