//! Painting results back into an image.

use crate::color::Rgb;
use crate::glyph::{GlyphSet, TEMPLATE_BACKGROUND};
use crate::pixel::PixelBuffer;
use crate::transfer::{CellSize, ResultCell};

/// Default canvas grey, matching the glyph template background.
pub const DEFAULT_BACKGROUND: u8 = TEMPLATE_BACKGROUND;

/// Where one glyph lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub character: u8,
    pub color: Rgb,
    pub row: usize,
    pub column: usize,
    /// Top-left pixel, possibly off-canvas
    pub x: i64,
    pub y: i64,
}

/// The grid recovered from a flat result stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterLayout {
    /// Row breaks plus one
    pub rows: usize,
    /// Cells before the first row break, or every cell if there is none
    pub row_width: usize,
    /// Top-left of the centred grid
    pub origin: (i64, i64),
    pub cell: CellSize,
    /// Every non-break cell in stream order
    pub placements: Vec<Placement>,
}

impl RasterLayout {
    /// Lay `cells` out centred on a `width x height` canvas.
    pub fn compute(cells: &[ResultCell], cell: CellSize, width: u32, height: u32) -> Self {
        let breaks = cells.iter().filter(|c| c.is_row_break()).count();
        let rows = breaks + 1;
        let row_width = cells
            .iter()
            .position(ResultCell::is_row_break)
            .unwrap_or(cells.len());

        let (cw, ch) = (cell.width as i64, cell.height as i64);
        let origin = (
            (width as i64 - row_width as i64 * cw).div_euclid(2),
            (height as i64 - rows as i64 * ch).div_euclid(2),
        );

        let mut placements = Vec::with_capacity(cells.len() - breaks);
        let (mut row, mut column) = (0, 0);
        for c in cells {
            if c.is_row_break() {
                row += 1;
                column = 0;
                continue;
            }
            placements.push(Placement {
                character: c.character,
                color: c.color,
                row,
                column,
                x: origin.0 + column as i64 * cw,
                y: origin.1 + row as i64 * ch,
            });
            column += 1;
        }

        Self {
            rows,
            row_width,
            origin,
            cell,
            placements,
        }
    }
}

/// Paints glyph templates, tinted with each cell's color, onto a canvas the
/// size of the source image.
#[derive(Debug, Clone, Copy)]
pub struct RasterCompositor<'a> {
    glyphs: &'a GlyphSet,
    background: u8,
}

impl<'a> RasterCompositor<'a> {
    pub fn new(glyphs: &'a GlyphSet) -> Self {
        Self {
            glyphs,
            background: DEFAULT_BACKGROUND,
        }
    }

    pub fn with_background(mut self, background: u8) -> Self {
        self.background = background;
        self
    }

    pub fn layout(&self, cells: &[ResultCell], width: u32, height: u32) -> RasterLayout {
        RasterLayout::compute(cells, self.glyphs.cell_size(), width, height)
    }

    pub fn compose(&self, cells: &[ResultCell], width: u32, height: u32) -> PixelBuffer {
        let mut canvas = PixelBuffer::filled(width, height, self.background);
        let layout = self.layout(cells, width, height);

        for p in &layout.placements {
            let Some(template) = self.glyphs.get(char::from(p.character)) else {
                log::debug!("no template for character {:#04x}, leaving cell blank", p.character);
                continue;
            };
            paint(&mut canvas, template, p);
        }
        canvas
    }
}

/// Template brightness above the background is coverage.
fn coverage(level: u8) -> f32 {
    (level.saturating_sub(TEMPLATE_BACKGROUND) as f32 / (255 - TEMPLATE_BACKGROUND) as f32).min(1.0)
}

fn blend(under: u8, over: u8, alpha: f32) -> u8 {
    (under as f32 + (over as f32 - under as f32) * alpha).round() as u8
}

fn paint(canvas: &mut PixelBuffer, template: &PixelBuffer, p: &Placement) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    for ty in 0..template.height() {
        let y = p.y + ty as i64;
        if y < 0 || y >= h {
            continue;
        }
        for tx in 0..template.width() {
            let x = p.x + tx as i64;
            if x < 0 || x >= w {
                continue;
            }
            let alpha = coverage(template.pixel(tx, ty).r);
            if alpha == 0.0 {
                continue;
            }
            let under = canvas.pixel(x as u32, y as u32);
            canvas.set_pixel(
                x as u32,
                y as u32,
                Rgb::new(
                    blend(under.r, p.color.r, alpha),
                    blend(under.g, p.color.g, alpha),
                    blend(under.b, p.color.b, alpha),
                ),
            );
        }
    }
}
