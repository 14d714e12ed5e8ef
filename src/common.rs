//! Common types and constants for GBA ROM graphics decoding
//!
//! This module defines the core types, constants, and address helpers shared by
//! the decompressor, the pointer scanner, and the decode orchestrator.

use crate::codec::CodecError;
use thiserror::Error;

/// Base address at which the cartridge ROM is mapped into GBA memory
pub const ROM_BASE: u32 = 0x0800_0000;

/// Most significant byte of a little-endian pointer into the ROM region
pub const POINTER_TERMINATOR: u8 = 0x08;

/// Format tag of a BIOS LZ77 compressed stream
pub const LZ77_TAG: u8 = 0x10;

/// Size of the stream header (tag + 24-bit decompressed size)
pub const HEADER_SIZE: usize = 4;

/// Smallest decompressed size accepted as an image stream (one 8x8 tile at 4bpp)
pub const MIN_STREAM_SIZE: u32 = 32;

/// Decompressed sizes at or above this are rejected as implausible (32 KiB)
pub const MAX_STREAM_SIZE: u32 = 32 * 1024;

/// Convert a possibly mapped address into a raw offset into the ROM buffer
///
/// Values at or above [`ROM_BASE`] have the base removed; anything below is
/// already a raw offset. Applying this twice yields the same result.
pub fn to_raw_offset(addr: u32) -> u32 {
    if addr >= ROM_BASE {
        addr - ROM_BASE
    } else {
        addr
    }
}

/// Convert a raw offset into its mapped ROM address
pub fn to_mapped_address(offset: u32) -> u32 {
    to_raw_offset(offset).wrapping_add(ROM_BASE)
}

/// Header at the start of a compressed stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    /// Format tag byte (0x10 for LZ77)
    pub tag: u8,
    /// Declared decompressed size in bytes
    pub size: u32,
}

impl StreamHeader {
    /// Parse a header from the first four bytes of `bytes`
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [tag, b0, b1, b2, ..] => Some(Self {
                tag: *tag,
                size: u32::from_le_bytes([*b0, *b1, *b2, 0]),
            }),
            _ => None,
        }
    }

    /// Whether the tag marks an LZ77 stream
    pub fn is_lz77(&self) -> bool {
        self.tag == LZ77_TAG
    }

    /// Whether the declared size is plausible for tile graphics
    pub fn has_plausible_size(&self) -> bool {
        (MIN_STREAM_SIZE..MAX_STREAM_SIZE).contains(&self.size)
    }
}

/// Error type for gbaview operations
#[derive(Debug, Error)]
pub enum GbaViewError {
    /// Tag byte at the claimed stream start is not the LZ77 tag
    #[error("Invalid LZ77 header at 0x{offset:X}: tag 0x{tag:02X}")]
    InvalidHeader {
        /// Raw offset of the stream
        offset: u32,
        /// Tag byte found there
        tag: u8,
    },

    /// Back-reference points outside the decompressed data
    #[error("Invalid back-reference: distance {distance} at output position {position}")]
    InvalidBackReference {
        /// Decoded copy distance
        distance: usize,
        /// Output position when the token was read
        position: usize,
    },

    /// Compressed stream runs past the end of the buffer
    #[error("Unexpected end of input at 0x{offset:X}")]
    UnexpectedEof {
        /// Raw offset of the missing byte
        offset: usize,
    },

    /// Image is not a compressed stream and no fallback length was given
    #[error("Image is not compressed and no length is known")]
    MissingImageLength,

    /// Decompressed palette is shorter than one palette
    #[error("Palette too small: need {required} bytes, got {actual}")]
    PaletteTooSmall {
        /// Bytes required for the active bit depth
        required: usize,
        /// Bytes available
        actual: usize,
    },

    /// Codec rejected the palette bytes
    #[error("Palette decode failed: {0}")]
    PaletteDecodeFailed(#[source] CodecError),

    /// Codec rejected the tile bytes
    #[error("Image decode failed: {0}")]
    ImageDecodeFailed(#[source] CodecError),

    /// Tilemap cell resolution or composition failed
    #[error("Tilemap decode failed: {0}")]
    TilemapDecodeFailed(#[source] CodecError),

    /// Decoding succeeded but produced an empty raster
    #[error("Image has a size of 0")]
    ZeroSizeImage,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for gbaview operations
pub type Result<T> = std::result::Result<T, GbaViewError>;
