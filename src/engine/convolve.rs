//! Kernel filtering.

use crate::color::Rgb;
use crate::pixel::PixelBuffer;
use crate::transfer::KernelRecord;

/// Filter `image` through `kernel`.
///
/// The kernel is centred on each pixel; samples falling outside the image
/// read as zero. Each channel's weighted sum is multiplied by the kernel's
/// multiplier, clamped to 0..=255 and inverted when the kernel asks for it.
/// The output has the input's dimensions.
pub fn convolve(image: &PixelBuffer, kernel: &KernelRecord) -> PixelBuffer {
    let (width, height) = (image.width() as i64, image.height() as i64);
    let (half_w, half_h) = ((kernel.width / 2) as i64, (kernel.height / 2) as i64);
    let mut output = PixelBuffer::new(image.width(), image.height());

    for y in 0..height {
        for x in 0..width {
            let mut sum = [0f32; 3];
            for ky in 0..kernel.height {
                let sy = y + ky as i64 - half_h;
                if sy < 0 || sy >= height {
                    continue;
                }
                for kx in 0..kernel.width {
                    let sx = x + kx as i64 - half_w;
                    if sx < 0 || sx >= width {
                        continue;
                    }
                    let w = kernel.weight(kx, ky);
                    let src = image.pixel(sx as u32, sy as u32);
                    sum[0] += src.r as f32 * w;
                    sum[1] += src.g as f32 * w;
                    sum[2] += src.b as f32 * w;
                }
            }

            let channel = |v: f32| {
                let v = (v * kernel.mult).clamp(0.0, 255.0) as u8;
                if kernel.invert {
                    255 - v
                } else {
                    v
                }
            };
            output.set_pixel(
                x as u32,
                y as u32,
                Rgb::new(channel(sum[0]), channel(sum[1]), channel(sum[2])),
            );
        }
    }
    output
}
