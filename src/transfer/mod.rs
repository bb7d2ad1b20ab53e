//! Framing between the pipeline and the compute engine.
//!
//! Pixel buffers cross the boundary as sequences of fixed-capacity
//! [`ChunkRecord`]s, kernels as [`KernelRecord`]s, and results come back as
//! two flat arrays that [`zip_results`] turns into [`ResultCell`]s.

mod chunk;
mod kernel_record;
mod result;

pub use chunk::{
    chunk_count, decode_buffer, decode_many, encode_buffer, encode_buffer_with_capacity,
    encode_many, encode_many_with_capacity, split_bytes, ChunkRecord, CHUNK_CAPACITY,
    FRAME_HEADER_LEN,
};
pub use kernel_record::{encode_kernels, KernelRecord, KERNEL_CAPACITY};
pub use result::{output_cell_count, zip_results, CellSize, ResultCell, ROW_BREAK};

use crate::pixel::PixelError;

/// Errors raised while framing or unframing transfer data.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("chunk sequence ended without a final chunk")]
    MissingFinalChunk,

    #[error("chunk {index} has dimensions {found:?}, sequence started with {expected:?}")]
    DimensionChange {
        index: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("reassembled {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("truncated frame: need {needed} bytes, have {available}")]
    TruncatedFrame { needed: usize, available: usize },

    #[error("payload of {size} bytes exceeds chunk capacity {capacity}")]
    PayloadTooLarge { size: usize, capacity: usize },

    #[error("invalid final flag byte {0}")]
    BadFinalFlag(u8),

    #[error("kernel '{name}' has {weights} weights, capacity is {capacity}")]
    KernelTooLarge {
        name: String,
        weights: usize,
        capacity: usize,
    },

    #[error("kernel '{name}' is {width}x{height} but has {weights} weights")]
    KernelShape {
        name: String,
        width: u32,
        height: u32,
        weights: usize,
    },

    #[error("engine returned {actual} {what} bytes, expected {expected}")]
    ResultLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Pixel(#[from] PixelError),
}
