//! In-process glyph matcher.

use super::{convolve, ComputeEngine, EngineError, EngineOutput, EngineRequest};
use crate::pixel::{PixelBuffer, ToneMap};
use crate::transfer::{decode_buffer, decode_many, output_cell_count, CellSize, ROW_BREAK};

/// Matches on the calling thread.
///
/// For every cell it picks the template with the smallest summed absolute
/// channel difference against every kernel-filtered copy of the image. Ties
/// go to the template that comes first. Cell colors are the tone-restored
/// mean of the unfiltered image.
#[derive(Debug, Clone, Default)]
pub struct CpuEngine {
    tone: ToneMap,
    ready: bool,
}

impl CpuEngine {
    /// `tone` is the curve the pipeline applied to the image, undone when
    /// reporting colors.
    pub fn new(tone: ToneMap) -> Self {
        Self { tone, ready: false }
    }

    fn validate(
        &self,
        request: &EngineRequest,
        image: &PixelBuffer,
        templates: &[PixelBuffer],
    ) -> Result<(), EngineError> {
        if templates.is_empty() {
            return Err(EngineError::NoGlyphs);
        }
        for (i, kernel) in request.kernels.iter().enumerate() {
            kernel.validate(&format!("#{}", i))?;
        }
        if templates.len() != request.char_map.len() {
            return Err(EngineError::CharMapMismatch {
                templates: templates.len(),
                codes: request.char_map.len(),
            });
        }
        let cell = request.cell;
        if let Some((index, t)) = templates
            .iter()
            .enumerate()
            .find(|(_, t)| (t.width(), t.height()) != (cell.width, cell.height) || t.is_empty())
        {
            return Err(EngineError::CellMismatch {
                index,
                expected: (cell.width, cell.height),
                actual: (t.width(), t.height()),
            });
        }
        let computed = output_cell_count(image.width(), image.height(), cell);
        if computed != request.output_len {
            return Err(EngineError::OutputLength {
                requested: request.output_len,
                computed,
            });
        }
        Ok(())
    }

    fn cell_color(&self, image: &PixelBuffer, x0: u32, y0: u32, x1: u32, y1: u32) -> [u8; 3] {
        let count = ((x1 - x0) * (y1 - y0)) as f32;
        if count == 0.0 {
            return [0; 3];
        }
        let mut sum = [0f32; 3];
        for y in y0..y1 {
            for x in x0..x1 {
                let p = image.pixel(x, y);
                sum[0] += self.tone.restore(p.r as f32);
                sum[1] += self.tone.restore(p.g as f32);
                sum[2] += self.tone.restore(p.b as f32);
            }
        }
        sum.map(|s| (s / count) as u8)
    }
}

fn score(filtered: &[PixelBuffer], template: &PixelBuffer, x0: u32, y0: u32, x1: u32, y1: u32) -> u64 {
    let mut diff = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            let t = template.pixel(x - x0, y - y0);
            for image in filtered {
                let p = image.pixel(x, y);
                diff += p.r.abs_diff(t.r) as u64 + p.g.abs_diff(t.g) as u64 + p.b.abs_diff(t.b) as u64;
            }
        }
    }
    diff
}

impl ComputeEngine for CpuEngine {
    fn init(&mut self) -> bool {
        self.ready = true;
        true
    }

    fn match_glyphs(&mut self, request: &EngineRequest) -> Result<EngineOutput, EngineError> {
        if !self.ready {
            return Err(EngineError::NotInitialized);
        }
        let (image, _) = decode_buffer(&request.image)?;
        let templates = decode_many(&request.glyphs)?;
        self.validate(request, &image, &templates)?;

        let filtered: Vec<PixelBuffer> = request.kernels.iter().map(|k| convolve(&image, k)).collect();

        let CellSize { width: cw, height: ch } = request.cell;
        let columns = image.width() / cw + 1;
        let rows = image.height() / ch;
        log::debug!(
            "matching {}x{} cells against {} glyphs through {} kernels",
            columns - 1,
            rows,
            templates.len(),
            filtered.len()
        );

        let mut output = EngineOutput {
            characters: Vec::with_capacity(request.output_len),
            colors: Vec::with_capacity(request.output_len * 3),
        };
        for row in 0..rows {
            for col in 0..columns {
                if col == columns - 1 {
                    output.characters.push(ROW_BREAK);
                    output.colors.extend_from_slice(&[255; 3]);
                    continue;
                }
                let (x0, y0) = (col * cw, row * ch);
                let (x1, y1) = ((x0 + cw).min(image.width()), (y0 + ch).min(image.height()));

                let mut best = (u64::MAX, request.char_map[0]);
                for (template, &code) in templates.iter().zip(&request.char_map) {
                    let diff = score(&filtered, template, x0, y0, x1, y1);
                    if diff < best.0 {
                        best = (diff, code);
                    }
                }
                output.characters.push(best.1);
                output.colors.extend_from_slice(&self.cell_color(&image, x0, y0, x1, y1));
            }
        }
        Ok(output)
    }
}
