//! Interpreting the engine's flat result arrays.

use super::TransferError;
use crate::color::Rgb;

/// Row-break sentinel inside the character stream.
pub const ROW_BREAK: u8 = b'\n';

/// One output grid position: a character code and its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultCell {
    pub character: u8,
    pub color: Rgb,
}

impl ResultCell {
    pub fn new(character: u8, color: Rgb) -> Self {
        Self { character, color }
    }

    pub fn is_row_break(&self) -> bool {
        self.character == ROW_BREAK
    }

    /// The character as a Latin-1 `char`.
    pub fn as_char(&self) -> char {
        char::from(self.character)
    }
}

/// Width and height of one glyph cell in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Number of cells the engine returns for an image:
/// `(image_width / cell_width + 1) * (image_height / cell_height)`.
///
/// The extra column per row is the row-break sentinel.
pub fn output_cell_count(image_width: u32, image_height: u32, cell: CellSize) -> usize {
    let columns = image_width / cell.width.max(1) + 1;
    let rows = image_height / cell.height.max(1);
    columns as usize * rows as usize
}

/// Zip the character and interleaved-RGB arrays positionally into cells.
pub fn zip_results(
    characters: &[u8],
    colors: &[u8],
    expected: usize,
) -> Result<Vec<ResultCell>, TransferError> {
    if characters.len() != expected {
        return Err(TransferError::ResultLength {
            what: "characters",
            expected,
            actual: characters.len(),
        });
    }
    if colors.len() != expected * 3 {
        return Err(TransferError::ResultLength {
            what: "colors",
            expected: expected * 3,
            actual: colors.len(),
        });
    }
    Ok(characters
        .iter()
        .zip(colors.chunks_exact(3))
        .map(|(&c, rgb)| ResultCell::new(c, Rgb::from_triple(rgb)))
        .collect())
}
