//! Fixed-capacity chunk framing for pixel buffers.

use super::TransferError;
use crate::pixel::PixelBuffer;

/// Payload capacity of one chunk record, a little under 64 KiB so the
/// receiving side has room for its own framing bytes.
pub const CHUNK_CAPACITY: usize = 65536 - 17;

/// Bytes preceding the payload in the wire form of a record.
pub const FRAME_HEADER_LEN: usize = 4 + 4 + 4 + 1;

/// One framed slice of a serialized pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    /// Width of the logical buffer this chunk belongs to
    pub width: u32,
    /// Height of the logical buffer this chunk belongs to
    pub height: u32,
    /// Number of meaningful bytes in `payload`
    pub payload_size: usize,
    /// Set on the chunk that completes the logical buffer
    pub is_final: bool,
    pub payload: Vec<u8>,
}

impl ChunkRecord {
    /// Encode as `width:u32, height:u32, payload_size:u32, is_final:u8,
    /// payload`, integers little-endian.
    ///
    /// Fails when `payload_size` exceeds the payload actually held or the
    /// chunk capacity.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransferError> {
        if self.payload_size > self.payload.len() {
            return Err(TransferError::TruncatedFrame {
                needed: self.payload_size,
                available: self.payload.len(),
            });
        }
        if self.payload_size > CHUNK_CAPACITY {
            return Err(TransferError::PayloadTooLarge {
                size: self.payload_size,
                capacity: CHUNK_CAPACITY,
            });
        }
        let mut out = Vec::with_capacity(FRAME_HEADER_LEN + self.payload_size);
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&(self.payload_size as u32).to_le_bytes());
        out.push(u8::from(self.is_final));
        out.extend_from_slice(&self.payload[..self.payload_size]);
        Ok(out)
    }

    /// Decode one record from the front of `bytes`.
    ///
    /// Returns the record and the number of bytes it occupied.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), TransferError> {
        if bytes.len() < FRAME_HEADER_LEN {
            return Err(TransferError::TruncatedFrame {
                needed: FRAME_HEADER_LEN,
                available: bytes.len(),
            });
        }
        let word = |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        let width = word(0);
        let height = word(4);
        let payload_size = word(8) as usize;
        let is_final = match bytes[12] {
            0 => false,
            1 => true,
            other => return Err(TransferError::BadFinalFlag(other)),
        };

        if payload_size > CHUNK_CAPACITY {
            return Err(TransferError::PayloadTooLarge {
                size: payload_size,
                capacity: CHUNK_CAPACITY,
            });
        }
        let end = FRAME_HEADER_LEN + payload_size;
        if bytes.len() < end {
            return Err(TransferError::TruncatedFrame {
                needed: end,
                available: bytes.len(),
            });
        }

        let record = ChunkRecord {
            width,
            height,
            payload_size,
            is_final,
            payload: bytes[FRAME_HEADER_LEN..end].to_vec(),
        };
        Ok((record, end))
    }
}

/// Number of chunks a byte stream of `len` bytes occupies: `ceil(len / cap)`,
/// never less than one.
pub fn chunk_count(len: usize, capacity: usize) -> usize {
    len.div_ceil(capacity).max(1)
}

/// Split a serialized buffer into chunk records of at most `capacity` bytes.
///
/// Every chunk carries the logical buffer's dimensions. The last chunk
/// holds `len - (n - 1) * capacity` bytes and is the only one marked final.
/// An empty stream still produces one (empty, final) chunk.
pub fn split_bytes(width: u32, height: u32, bytes: &[u8], capacity: usize) -> Vec<ChunkRecord> {
    assert!(capacity > 0, "chunk capacity must be non-zero");

    let count = chunk_count(bytes.len(), capacity);
    let mut records = Vec::with_capacity(count);
    let mut consumed = 0;
    for i in 0..count {
        let end = (consumed + capacity).min(bytes.len());
        let payload = bytes[consumed..end].to_vec();
        consumed = end;
        records.push(ChunkRecord {
            width,
            height,
            payload_size: payload.len(),
            is_final: i + 1 == count && consumed == bytes.len(),
            payload,
        });
    }
    records
}

/// Split one buffer using the standard [`CHUNK_CAPACITY`].
pub fn encode_buffer(buffer: &PixelBuffer) -> Vec<ChunkRecord> {
    encode_buffer_with_capacity(buffer, CHUNK_CAPACITY)
}

pub fn encode_buffer_with_capacity(buffer: &PixelBuffer, capacity: usize) -> Vec<ChunkRecord> {
    split_bytes(buffer.width(), buffer.height(), &buffer.serialize(), capacity)
}

/// Concatenate the independent chunk sequences of several buffers, in the
/// order given.
///
/// Each buffer's own count is computed from its own length; nothing is
/// carried across buffers.
pub fn encode_many<'a, I>(buffers: I) -> Vec<ChunkRecord>
where
    I: IntoIterator<Item = &'a PixelBuffer>,
{
    encode_many_with_capacity(buffers, CHUNK_CAPACITY)
}

pub fn encode_many_with_capacity<'a, I>(buffers: I, capacity: usize) -> Vec<ChunkRecord>
where
    I: IntoIterator<Item = &'a PixelBuffer>,
{
    let mut records = Vec::new();
    for buffer in buffers {
        let chunks = encode_buffer_with_capacity(buffer, capacity);
        log::trace!(
            "{}x{} buffer -> {} chunk(s)",
            buffer.width(),
            buffer.height(),
            chunks.len()
        );
        records.extend(chunks);
    }
    records
}

/// Reassemble the first logical buffer from a chunk sequence.
///
/// Returns the buffer and the number of records consumed.
pub fn decode_buffer(records: &[ChunkRecord]) -> Result<(PixelBuffer, usize), TransferError> {
    let first = records.first().ok_or(TransferError::MissingFinalChunk)?;
    let (width, height) = (first.width, first.height);
    let expected = width as usize * height as usize * 3;

    let mut bytes = Vec::with_capacity(expected);
    for (i, record) in records.iter().enumerate() {
        if (record.width, record.height) != (width, height) {
            return Err(TransferError::DimensionChange {
                index: i,
                expected: (width, height),
                found: (record.width, record.height),
            });
        }
        if record.payload_size > record.payload.len() {
            return Err(TransferError::TruncatedFrame {
                needed: record.payload_size,
                available: record.payload.len(),
            });
        }
        bytes.extend_from_slice(&record.payload[..record.payload_size]);
        if bytes.len() > expected {
            return Err(TransferError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        if record.is_final {
            if bytes.len() != expected {
                return Err(TransferError::LengthMismatch {
                    expected,
                    actual: bytes.len(),
                });
            }
            let buffer = PixelBuffer::from_interleaved(width, height, &bytes)?;
            return Ok((buffer, i + 1));
        }
    }
    Err(TransferError::MissingFinalChunk)
}

/// Reassemble every logical buffer in a concatenated chunk sequence.
pub fn decode_many(records: &[ChunkRecord]) -> Result<Vec<PixelBuffer>, TransferError> {
    let mut buffers = Vec::new();
    let mut rest = records;
    while !rest.is_empty() {
        let (buffer, used) = decode_buffer(rest)?;
        buffers.push(buffer);
        rest = &rest[used..];
    }
    Ok(buffers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut p = PixelBuffer::new(width, height);
        for x in 0..width {
            for y in 0..height {
                p.set_pixel(x, y, Rgb::new(x as u8, y as u8, (x + y) as u8));
            }
        }
        p
    }

    #[test]
    fn test_chunk_count_rounds_up() {
        assert_eq!(chunk_count(0, 10), 1);
        assert_eq!(chunk_count(1, 10), 1);
        assert_eq!(chunk_count(10, 10), 1);
        assert_eq!(chunk_count(11, 10), 2);
        assert_eq!(chunk_count(30, 10), 3);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_tail() {
        // 2x5 RGB = 30 bytes, capacity 10 -> exactly 3 full chunks
        let chunks = encode_buffer_with_capacity(&gradient(2, 5), 10);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.payload_size == 10));
        assert_eq!(chunks.iter().filter(|c| c.is_final).count(), 1);
        assert!(chunks[2].is_final);
    }

    #[test]
    fn test_last_chunk_holds_remainder() {
        // 3x3 RGB = 27 bytes, capacity 10
        let chunks = encode_buffer_with_capacity(&gradient(3, 3), 10);
        let sizes: Vec<_> = chunks.iter().map(|c| c.payload_size).collect();
        assert_eq!(sizes, vec![10, 10, 7]);
        assert_eq!(
            chunks.iter().map(|c| c.is_final).collect::<Vec<_>>(),
            vec![false, false, true]
        );
        assert!(chunks.iter().all(|c| (c.width, c.height) == (3, 3)));
    }

    #[test]
    fn test_empty_buffer_yields_one_final_chunk() {
        let chunks = encode_buffer(&PixelBuffer::new(0, 0));
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_final);
        assert_eq!(chunks[0].payload_size, 0);
        let (back, used) = decode_buffer(&chunks).unwrap();
        assert_eq!(used, 1);
        assert!(back.is_empty());
    }

    #[test]
    fn test_standard_capacity_split() {
        // 160x140 RGB = 67_200 bytes -> two chunks at the standard capacity
        let p = gradient(160, 140);
        let chunks = encode_buffer(&p);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].payload_size, CHUNK_CAPACITY);
        assert_eq!(chunks[1].payload_size, 67_200 - CHUNK_CAPACITY);
        assert_eq!(decode_buffer(&chunks).unwrap().0, p);
    }

    #[test]
    fn test_multi_buffer_sequences_are_independent() {
        let a = gradient(3, 3); // 27 bytes -> 3 chunks at cap 10
        let b = gradient(1, 2); // 6 bytes -> 1 chunk
        let c = gradient(2, 5); // 30 bytes -> 3 chunks
        let chunks = encode_many_with_capacity([&a, &b, &c], 10);
        assert_eq!(chunks.len(), 7);
        let finals: Vec<_> = chunks
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_final)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(finals, vec![2, 3, 6]);
        assert_eq!(decode_many(&chunks).unwrap(), vec![a, b, c]);
    }

    #[test]
    fn test_decode_without_final_chunk_fails() {
        let mut chunks = encode_buffer_with_capacity(&gradient(3, 3), 10);
        chunks.pop();
        assert!(matches!(
            decode_buffer(&chunks),
            Err(TransferError::MissingFinalChunk)
        ));
    }

    #[test]
    fn test_decode_rejects_dimension_change() {
        let mut chunks = encode_buffer_with_capacity(&gradient(3, 3), 10);
        chunks[1].width = 4;
        assert!(matches!(
            decode_buffer(&chunks),
            Err(TransferError::DimensionChange { index: 1, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_short_payload() {
        let mut chunks = encode_buffer_with_capacity(&gradient(3, 3), 10);
        chunks[2].payload_size = 6;
        assert!(matches!(
            decode_buffer(&chunks),
            Err(TransferError::LengthMismatch {
                expected: 27,
                actual: 26
            })
        ));
    }

    #[test]
    fn test_wire_frame_round_trip() {
        let chunks = encode_buffer_with_capacity(&gradient(3, 3), 10);
        let mut wire = Vec::new();
        for c in &chunks {
            wire.extend(c.to_bytes().unwrap());
        }
        assert_eq!(wire.len(), 3 * FRAME_HEADER_LEN + 27);

        let mut rest = wire.as_slice();
        let mut decoded = Vec::new();
        while !rest.is_empty() {
            let (record, used) = ChunkRecord::from_bytes(rest).unwrap();
            decoded.push(record);
            rest = &rest[used..];
        }
        assert_eq!(decoded, chunks);
    }

    #[test]
    fn test_from_bytes_rejects_truncation_and_oversize() {
        let frame = encode_buffer_with_capacity(&gradient(1, 1), 10)[0].to_bytes().unwrap();
        assert!(matches!(
            ChunkRecord::from_bytes(&frame[..frame.len() - 1]),
            Err(TransferError::TruncatedFrame { .. })
        ));
        assert!(matches!(
            ChunkRecord::from_bytes(&frame[..5]),
            Err(TransferError::TruncatedFrame { .. })
        ));

        let mut oversized = frame.clone();
        oversized[8..12].copy_from_slice(&((CHUNK_CAPACITY + 1) as u32).to_le_bytes());
        assert!(matches!(
            ChunkRecord::from_bytes(&oversized),
            Err(TransferError::PayloadTooLarge { .. })
        ));

        let mut bad_flag = frame;
        bad_flag[12] = 7;
        assert!(matches!(
            ChunkRecord::from_bytes(&bad_flag),
            Err(TransferError::BadFinalFlag(7))
        ));
    }

    #[test]
    fn test_to_bytes_rejects_inconsistent_record() {
        let mut short = encode_buffer_with_capacity(&gradient(2, 2), 10)[0].clone();
        short.payload_size = short.payload.len() + 1;
        assert!(matches!(
            short.to_bytes(),
            Err(TransferError::TruncatedFrame { needed: 11, available: 10 })
        ));

        let oversized = ChunkRecord {
            width: 1,
            height: 1,
            payload_size: CHUNK_CAPACITY + 1,
            is_final: true,
            payload: vec![0; CHUNK_CAPACITY + 1],
        };
        assert!(matches!(
            oversized.to_bytes(),
            Err(TransferError::PayloadTooLarge { .. })
        ));
    }
}
