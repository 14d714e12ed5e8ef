//! GBA BIOS LZ77 (type 0x10) decompression
//!
//! This module decodes the LZ77 variant understood by the GBA BIOS
//! `LZ77UnComp` calls. A stream starts with a 4-byte header (tag `0x10`,
//! 24-bit little-endian decompressed size) followed by groups of one flag byte
//! and up to eight tokens. Flag bits are read from most to least significant:
//! a clear bit is a literal byte, a set bit is a two-byte back-reference.
//!
//! Decompression only reads the source; nothing here writes compressed data.

mod decoder;
mod state;

pub use state::{Lz77State, Lz77Stats};

use crate::common::{to_raw_offset, GbaViewError, StreamHeader, HEADER_SIZE, LZ77_TAG};
use crate::source::ByteSource;
use crate::Result;

/// Number of tokens described by one flag byte
pub const TOKENS_PER_FLAG: u32 = 8;

/// Shortest copy a back-reference can encode
pub const MIN_COPY_LENGTH: usize = 3;

/// Longest copy a back-reference can encode
pub const MAX_COPY_LENGTH: usize = MIN_COPY_LENGTH + 0xF;

/// Farthest distance a back-reference can reach
pub const MAX_DISTANCE: usize = 0x1000;

/// Read the stream header at `addr`
pub fn read_header(source: &ByteSource, addr: u32) -> Result<StreamHeader> {
    let offset = to_raw_offset(addr) as usize;
    source
        .slice(offset, HEADER_SIZE)
        .and_then(StreamHeader::parse)
        .ok_or(GbaViewError::UnexpectedEof {
            offset: offset.saturating_add(source.remaining(offset)),
        })
}

/// Decompress the LZ77 stream starting at `addr`
///
/// # Returns
/// A vector whose length is exactly the size declared in the stream header
pub fn decompress(source: &ByteSource, addr: u32) -> Result<Vec<u8>> {
    decompress_with_stats(source, addr).map(|(data, _)| data)
}

/// Decompress the LZ77 stream starting at `addr`, also returning token statistics
pub fn decompress_with_stats(source: &ByteSource, addr: u32) -> Result<(Vec<u8>, Lz77Stats)> {
    let offset = to_raw_offset(addr) as usize;
    let header = read_header(source, addr)?;
    if header.tag != LZ77_TAG {
        return Err(GbaViewError::InvalidHeader {
            offset: offset as u32,
            tag: header.tag,
        });
    }

    let mut state = Lz77State::new(header, offset);
    state.expand(source)?;
    Ok(state.finish())
}
