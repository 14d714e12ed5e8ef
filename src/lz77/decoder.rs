//! Token decoding
//!
//! Flag-byte and token handling for the LZ77 decompressor.

use super::{state::Lz77State, MIN_COPY_LENGTH, TOKENS_PER_FLAG};
use crate::source::ByteSource;
use crate::{GbaViewError, Result};

impl Lz77State {
    /// Read the next compressed byte
    fn read_byte(&mut self, source: &ByteSource) -> Result<u8> {
        let byte = source
            .get(self.in_pos)
            .ok_or(GbaViewError::UnexpectedEof {
                offset: self.in_pos,
            })?;
        self.in_pos += 1;
        Ok(byte)
    }

    /// Decode tokens until the declared size has been produced
    pub fn expand(&mut self, source: &ByteSource) -> Result<()> {
        while !self.is_complete() {
            let flags = self.read_byte(source)?;

            for bit in (0..TOKENS_PER_FLAG).rev() {
                // Remaining bits of the last flag byte are padding
                if self.is_complete() {
                    break;
                }

                if flags & (1 << bit) != 0 {
                    self.decode_back_reference(source)?;
                } else {
                    self.decode_literal(source)?;
                }
            }
        }

        Ok(())
    }

    /// Copy one byte straight from the input
    fn decode_literal(&mut self, source: &ByteSource) -> Result<()> {
        let byte = self.read_byte(source)?;
        self.output[self.out_pos] = byte;
        self.out_pos += 1;
        self.stats.literal_count += 1;
        Ok(())
    }

    /// Copy a run of earlier output
    ///
    /// Token layout: `LLLL DDDD DDDD DDDD`, length = L + 3, distance = D + 1.
    /// Copies go byte by byte so a distance shorter than the length repeats
    /// the last `distance` bytes.
    fn decode_back_reference(&mut self, source: &ByteSource) -> Result<()> {
        let b0 = self.read_byte(source)?;
        let b1 = self.read_byte(source)?;

        let length = MIN_COPY_LENGTH + (b0 >> 4) as usize;
        let distance = 1 + ((((b0 & 0x0F) as usize) << 8) | b1 as usize);

        let start = self.out_pos;
        if distance > self.size() || distance > start {
            return Err(GbaViewError::InvalidBackReference {
                distance,
                position: start,
            });
        }

        let base = start - distance;
        let end = (start + length).min(self.size());
        for i in 0..end - start {
            self.output[start + i] = self.output[base + i % distance];
        }
        self.out_pos = end;

        self.stats.back_reference_count += 1;
        self.stats.longest_copy = self.stats.longest_copy.max(end - start);
        Ok(())
    }
}
