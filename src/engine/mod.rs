//! The compute engine boundary.
//!
//! The pipeline never matches glyphs itself. It frames the image, kernel
//! bank and glyph templates into an [`EngineRequest`], hands it to a
//! [`ComputeEngine`] and gets back two flat arrays, one character code and
//! one RGB triple per output cell.
//!
//! [`CpuEngine`] is the in-process implementation.

mod convolve;
mod cpu;

pub use convolve::convolve;
pub use cpu::CpuEngine;

use crate::transfer::{CellSize, ChunkRecord, KernelRecord, TransferError};

/// Everything the engine needs for one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRequest {
    /// Chunk sequence of the toned input image
    pub image: Vec<ChunkRecord>,
    /// Kernel bank, in bank order
    pub kernels: Vec<KernelRecord>,
    /// Concatenated chunk sequences of every glyph template
    pub glyphs: Vec<ChunkRecord>,
    /// Character code of each glyph template, by template index
    pub char_map: Vec<u8>,
    pub cell: CellSize,
    /// Number of result cells expected back
    pub output_len: usize,
}

/// The engine's reply: parallel arrays of `output_len` characters and
/// `output_len * 3` color bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    pub characters: Vec<u8>,
    pub colors: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine was not initialized")]
    NotInitialized,

    #[error("request carries no glyph templates")]
    NoGlyphs,

    #[error("{templates} glyph templates but {codes} character codes")]
    CharMapMismatch { templates: usize, codes: usize },

    #[error("glyph template {index} is {actual:?}, cell is {expected:?}")]
    CellMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("request expects {requested} cells, image yields {computed}")]
    OutputLength { requested: usize, computed: usize },

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

/// Something that can match image cells to glyphs.
pub trait ComputeEngine {
    /// Bring the engine up. `false` means it is unavailable and no
    /// conversion may run.
    fn init(&mut self) -> bool;

    /// Run one blocking match over a full request.
    fn match_glyphs(&mut self, request: &EngineRequest) -> Result<EngineOutput, EngineError>;
}
