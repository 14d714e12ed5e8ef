//! Image and tilemap decoding
//!
//! Turns an image address, a palette address and optionally a tilemap address
//! into a raster. Each address is decompressed when it holds a valid LZ77
//! stream and read as raw bytes otherwise. Every call is a pure function of
//! its arguments.

use crate::codec::Codec;
use crate::common::to_raw_offset;
use crate::scan::is_candidate;
use crate::source::ByteSource;
use crate::{lz77, GbaViewError, Result};
use image::RgbaImage;

/// Outcome of a decode: a complete raster or exactly one error
pub type DecodeResult = Result<RgbaImage>;

/// Default cap on the raw image span taken when the image is not compressed
pub const DEFAULT_IMAGE_SPAN_CAP: usize = 20480;

/// Default number of tiles read for an uncompressed tilemap image
pub const DEFAULT_TILEMAP_IMAGE_TILES: usize = 1024;

/// Default number of palettes read for an uncompressed tilemap palette set
pub const DEFAULT_TILEMAP_PALETTES: usize = 16;

/// Default bytes read for an uncompressed tilemap
pub const DEFAULT_TILEMAP_BYTES: usize = 1024;

/// Size limits applied to uncompressed spans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Longest raw image span derived from pointer spacing
    pub image_span_cap: usize,
    /// Tiles read for an uncompressed tilemap image
    pub tilemap_image_tiles: usize,
    /// Palettes read for an uncompressed tilemap palette set
    pub tilemap_palettes: usize,
    /// Bytes read for an uncompressed tilemap
    pub tilemap_bytes: usize,
}

impl DecodeOptions {
    /// Create options with the default limits
    pub fn new() -> Self {
        Self {
            image_span_cap: DEFAULT_IMAGE_SPAN_CAP,
            tilemap_image_tiles: DEFAULT_TILEMAP_IMAGE_TILES,
            tilemap_palettes: DEFAULT_TILEMAP_PALETTES,
            tilemap_bytes: DEFAULT_TILEMAP_BYTES,
        }
    }

    /// Set the raw image span cap
    pub fn with_image_span_cap(mut self, cap: usize) -> Self {
        self.image_span_cap = cap;
        self
    }

    /// Set the tile count read for uncompressed tilemap images
    pub fn with_tilemap_image_tiles(mut self, tiles: usize) -> Self {
        self.tilemap_image_tiles = tiles;
        self
    }

    /// Set the palette count read for uncompressed tilemap palettes
    pub fn with_tilemap_palettes(mut self, palettes: usize) -> Self {
        self.tilemap_palettes = palettes;
        self
    }

    /// Set the byte count read for uncompressed tilemaps
    pub fn with_tilemap_bytes(mut self, bytes: usize) -> Self {
        self.tilemap_bytes = bytes;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes fetched for one address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedBytes {
    /// Decompressed stream or raw span
    pub data: Vec<u8>,
    /// Whether `data` came from an LZ77 stream
    pub compressed: bool,
}

/// Fetch the bytes at `addr`
///
/// A strictly valid LZ77 stream is decompressed. Otherwise `fallback_len`
/// raw bytes are taken (truncated at the end of the buffer); without a
/// fallback the result is `None`.
pub fn resolve_bytes(
    source: &ByteSource,
    addr: u32,
    fallback_len: Option<usize>,
) -> Option<ResolvedBytes> {
    let offset = to_raw_offset(addr);
    if is_candidate(source, offset, false) {
        // The strict check is a trial decompression; keep its output
        match lz77::decompress(source, offset) {
            Ok(data) => {
                log::debug!(
                    "Loading compressed data at 0x{offset:X} ({} bytes)",
                    data.len()
                );
                return Some(ResolvedBytes {
                    data,
                    compressed: true,
                });
            }
            Err(e) => log::trace!("Stream at 0x{offset:X} rejected: {e}"),
        }
    }

    let len = fallback_len?;
    log::debug!("Loading uncompressed data at 0x{offset:X} ({len} bytes)");
    Some(ResolvedBytes {
        data: source.slice_clamped(offset as usize, len).to_vec(),
        compressed: false,
    })
}

/// Fetch the bytes at `addr`, reading `len` raw bytes when it is not compressed
fn resolve_span(source: &ByteSource, addr: u32, len: usize) -> ResolvedBytes {
    resolve_bytes(source, addr, Some(len)).unwrap_or_default()
}

/// Zero-pad `data` to a whole number of `tile_size` tiles
fn pad_to_tiles(data: &mut Vec<u8>, tile_size: usize) {
    if tile_size == 0 {
        return;
    }
    let remainder = data.len() % tile_size;
    if remainder != 0 {
        data.resize(data.len() + tile_size - remainder, 0);
    }
}

fn check_dimensions(image: RgbaImage) -> DecodeResult {
    if image.width() == 0 || image.height() == 0 {
        return Err(GbaViewError::ZeroSizeImage);
    }
    Ok(image)
}

/// Decode a plain tiled image
///
/// # Arguments
/// * `image_addr` - Tile data, compressed or raw
/// * `palette_addr` - One palette, compressed or raw
/// * `fallback_len` - Raw span to read when the image is not compressed
/// * `width` - Tiles per row
pub fn decode_image<C: Codec + ?Sized>(
    source: &ByteSource,
    codec: &C,
    image_addr: u32,
    palette_addr: u32,
    fallback_len: Option<usize>,
    width: u32,
) -> DecodeResult {
    let bpp = codec.bits_per_pixel();

    let mut image_data = resolve_bytes(source, image_addr, fallback_len)
        .ok_or(GbaViewError::MissingImageLength)?
        .data;
    pad_to_tiles(&mut image_data, codec.tile_byte_size());

    let palette_size = codec.palette_byte_size(bpp);
    let mut palette = resolve_span(source, palette_addr, palette_size);
    if palette.compressed && palette.data.len() < palette_size {
        return Err(GbaViewError::PaletteTooSmall {
            required: palette_size,
            actual: palette.data.len(),
        });
    }
    palette.data.truncate(palette_size);

    let palette = codec
        .decode_palette(&palette.data, bpp)
        .map_err(GbaViewError::PaletteDecodeFailed)?;
    let image = codec
        .decode_image(&image_data, &palette, width)
        .map_err(GbaViewError::ImageDecodeFailed)?;

    check_dimensions(image)
}

/// Decode an image assembled from a tilemap
///
/// # Arguments
/// * `image_addr` - Tile data, compressed or raw
/// * `palettes_addr` - Palette set, compressed or raw
/// * `tilemap_addr` - Screen entries, compressed or raw
/// * `width` - Cells per row
/// * `options` - Raw span sizes used for uncompressed inputs
pub fn decode_tilemap<C: Codec + ?Sized>(
    source: &ByteSource,
    codec: &C,
    image_addr: u32,
    palettes_addr: u32,
    tilemap_addr: u32,
    width: u32,
    options: &DecodeOptions,
) -> DecodeResult {
    let bpp = codec.bits_per_pixel();
    let tile_size = codec.tile_byte_size();
    let palette_size = codec.palette_byte_size(bpp);

    let image_len = options.tilemap_image_tiles.saturating_mul(tile_size);
    let mut image_data = resolve_span(source, image_addr, image_len).data;
    pad_to_tiles(&mut image_data, tile_size);

    let palettes_len = options.tilemap_palettes.saturating_mul(palette_size);
    let palettes = resolve_span(source, palettes_addr, palettes_len);
    if palettes.compressed && palettes.data.len() < palette_size {
        return Err(GbaViewError::PaletteTooSmall {
            required: palette_size,
            actual: palettes.data.len(),
        });
    }

    let tilemap_data = resolve_span(source, tilemap_addr, options.tilemap_bytes).data;

    let tiles = codec
        .decode_tiles(&image_data)
        .map_err(GbaViewError::ImageDecodeFailed)?;
    let palettes = codec
        .decode_palettes(&palettes.data, bpp, true)
        .map_err(GbaViewError::PaletteDecodeFailed)?;
    let cells = codec
        .decode_tilemap_cells(&tilemap_data, &tiles, &palettes)
        .map_err(GbaViewError::TilemapDecodeFailed)?;
    let image = codec
        .compose_raster(&cells, width)
        .map_err(GbaViewError::TilemapDecodeFailed)?;

    check_dimensions(image)
}
