//! gbaview - GBA ROM graphics explorer
//!
//! This crate helps reverse engineers find graphics inside Game Boy Advance
//! ROM images without knowing where anything lives. It scans the ROM for
//! pointer-shaped words, recognizes BIOS LZ77 (type `0x10`) streams, decompresses
//! them, and decodes tile data, palettes and tilemaps into RGBA rasters.
//!
//! # Features
//!
//! - Pointer discovery with sorted next/previous navigation
//! - Cheap header checks and strict trial-decompression checks
//! - LZ77 decompression that never panics on truncated or garbage input
//! - Pluggable tile/palette codecs, with a linear 2/4/8 bpp GBA codec included
//! - Plain tiled images and tilemap-composed images
//! - Optional concurrent batch decoding (`async` feature)
//!
//! # Example
//!
//! ```no_run
//! use gbaview::{scan_candidates, ByteSource, Bpp, LinearCodec, ViewState};
//!
//! let rom = ByteSource::from(std::fs::read("game.gba")?);
//! let pointers = scan_candidates(&rom);
//!
//! let mut view = ViewState::new();
//! view.next_image(&pointers);
//! view.set_palette(0x0812_3400);
//!
//! let codec = LinearCodec::new(Bpp::Four);
//! match view.decode(&rom, &pointers, &codec) {
//!     Ok(image) => println!("{}x{}", image.width(), image.height()),
//!     Err(e) => println!("{}", view.describe_error(&e)),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod codec;
pub mod common;
pub mod decode;
pub mod error;
pub mod lz77;
pub mod scan;
pub mod source;
pub mod view;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_batch;

// Re-export commonly used types
pub use codec::{Bpp, Codec, CodecError, LinearCodec, Palette, Tile, TilemapEntry};
pub use common::{
    to_mapped_address, to_raw_offset, GbaViewError, Result, StreamHeader, LZ77_TAG,
    MAX_STREAM_SIZE, MIN_STREAM_SIZE, ROM_BASE,
};
pub use decode::{decode_image, decode_tilemap, DecodeOptions, DecodeResult, ResolvedBytes};
pub use lz77::{decompress_with_stats, Lz77Stats};
pub use scan::{classify, is_candidate, scan, scan_candidates, Candidate, PointerSet};
pub use source::ByteSource;
pub use view::ViewState;

// Re-export async types when async feature is enabled
#[cfg(feature = "async")]
pub use async_batch::{AsyncBatchDecoder, ImageRequest};

// Convenience functions

/// Decompress the LZ77 stream at `addr` in `data`
///
/// # Arguments
/// * `data` - The ROM bytes
/// * `addr` - Stream address, mapped (`0x08xxxxxx`) or raw
///
/// # Returns
/// A vector of exactly the declared decompressed size
pub fn decompress(data: &[u8], addr: u32) -> Result<Vec<u8>> {
    lz77::decompress(&ByteSource::new(data.to_vec()), addr)
}

/// Find pointers in `data` that address plausible LZ77 streams
///
/// # Arguments
/// * `data` - The ROM bytes
///
/// # Returns
/// Raw offsets in ascending order
pub fn find_pointers(data: &[u8]) -> PointerSet {
    scan_candidates(&ByteSource::new(data.to_vec()))
}
