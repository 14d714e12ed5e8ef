//! Tile and palette decoding
//!
//! The decode orchestrator never looks at pixel bit layouts itself. Everything
//! bit-depth specific goes through the [`Codec`] trait, so other tile formats
//! can be plugged in. [`LinearCodec`] implements the linear 2/4/8 bpp layout
//! used by GBA character data with BGR555 palettes.

mod linear;
mod tilemap;

pub use linear::{Bpp, LinearCodec};
pub use tilemap::TilemapEntry;

use image::{Rgba, RgbaImage};
use thiserror::Error;

/// Width and height of a tile in pixels
pub const TILE_DIM: u32 = 8;

/// Pixels in one tile
pub const TILE_PIXELS: usize = (TILE_DIM * TILE_DIM) as usize;

/// Largest raster, in pixels, a codec will allocate (64 MiB of RGBA)
pub const MAX_RASTER_PIXELS: u64 = 1 << 24;

/// Fully transparent pixel used for unused raster cells
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Error raised by a codec when its input cannot be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Bit depth the codec cannot handle
    #[error("Unsupported bit depth: {0} bpp")]
    UnsupportedBitDepth(u32),

    /// Fewer palette bytes than one palette needs
    #[error("Palette data too short: expected {expected} bytes, got {actual}")]
    PaletteTooShort {
        /// Bytes required
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },

    /// Tile data is not a whole number of tiles
    #[error("Tile data length {len} is not a multiple of {tile_size}")]
    MisalignedTileData {
        /// Bytes supplied
        len: usize,
        /// Bytes per tile
        tile_size: usize,
    },

    /// Raster width of zero tiles
    #[error("Width must be at least one tile")]
    ZeroWidth,

    /// Raster would exceed [`MAX_RASTER_PIXELS`]
    #[error("Raster of {columns}x{rows} tiles is too large")]
    DimensionsTooLarge {
        /// Tiles per row
        columns: u32,
        /// Tile rows
        rows: usize,
    },

    /// Pixel value has no entry in the palette
    #[error("Color index {index} out of range for a {count}-color palette")]
    ColorIndexOutOfRange {
        /// Pixel value
        index: u8,
        /// Palette entries available
        count: usize,
    },

    /// Tilemap refers to a tile that was not decoded
    #[error("Tile index {index} out of range ({count} tiles)")]
    TileIndexOutOfRange {
        /// Referenced tile
        index: usize,
        /// Tiles available
        count: usize,
    },

    /// Tilemap refers to a palette that was not decoded
    #[error("Palette index {index} out of range ({count} palettes)")]
    PaletteIndexOutOfRange {
        /// Referenced palette
        index: usize,
        /// Palettes available
        count: usize,
    },

    /// Cells of different sizes cannot be composed
    #[error("Cell {index} is {width}x{height}, expected {expected_width}x{expected_height}")]
    MismatchedCell {
        /// Position of the offending cell
        index: usize,
        /// Its width
        width: u32,
        /// Its height
        height: u32,
        /// Width of the first cell
        expected_width: u32,
        /// Height of the first cell
        expected_height: u32,
    },
}

/// Color table resolved from palette bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba<u8>>,
}

impl Palette {
    /// Create a palette from resolved colors
    pub fn new(colors: Vec<Rgba<u8>>) -> Self {
        Self { colors }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no entries
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for a pixel value
    pub fn color(&self, index: u8) -> Result<Rgba<u8>, CodecError> {
        self.colors
            .get(index as usize)
            .copied()
            .ok_or(CodecError::ColorIndexOutOfRange {
                index,
                count: self.colors.len(),
            })
    }

    /// All entries
    pub fn colors(&self) -> &[Rgba<u8>] {
        &self.colors
    }
}

/// One 8x8 tile of palette indices, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    indices: [u8; TILE_PIXELS],
}

impl Tile {
    /// Create a tile from row-major palette indices
    pub fn new(indices: [u8; TILE_PIXELS]) -> Self {
        Self { indices }
    }

    /// Palette index at (`x`, `y`), or `None` outside the tile
    pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= TILE_DIM || y >= TILE_DIM {
            return None;
        }
        Some(self.indices[(y * TILE_DIM + x) as usize])
    }

    /// All indices, row-major
    pub fn indices(&self) -> &[u8; TILE_PIXELS] {
        &self.indices
    }

    /// Render the tile through a palette
    pub fn render(&self, palette: &Palette) -> Result<RgbaImage, CodecError> {
        let mut image = RgbaImage::new(TILE_DIM, TILE_DIM);
        for (i, &index) in self.indices.iter().enumerate() {
            let (x, y) = (i as u32 % TILE_DIM, i as u32 / TILE_DIM);
            image.put_pixel(x, y, palette.color(index)?);
        }
        Ok(image)
    }
}

/// Tile and palette decoding capability
///
/// Implementations turn raw character, palette and tilemap bytes into colors.
/// Every method is pure; faults are reported as [`CodecError`].
pub trait Codec {
    /// Bits per pixel of the tile data this codec reads
    fn bits_per_pixel(&self) -> u32;

    /// Bytes per 8x8 tile
    fn tile_byte_size(&self) -> usize;

    /// Bytes in one palette at `bpp` bits per pixel
    fn palette_byte_size(&self, bpp: u32) -> usize;

    /// Decode one palette (opaque colors)
    fn decode_palette(&self, bytes: &[u8], bpp: u32) -> Result<Palette, CodecError>;

    /// Decode tile bytes into a raster `width` tiles wide
    fn decode_image(
        &self,
        tile_bytes: &[u8],
        palette: &Palette,
        width: u32,
    ) -> Result<RgbaImage, CodecError>;

    /// Decode tile bytes into unpaletted tiles
    fn decode_tiles(&self, tile_bytes: &[u8]) -> Result<Vec<Tile>, CodecError>;

    /// Decode consecutive palettes; with `alpha`, index 0 is transparent
    fn decode_palettes(
        &self,
        bytes: &[u8],
        bpp: u32,
        alpha: bool,
    ) -> Result<Vec<Palette>, CodecError>;

    /// Resolve tilemap entries against decoded tiles and palettes
    fn decode_tilemap_cells(
        &self,
        tilemap_bytes: &[u8],
        tiles: &[Tile],
        palettes: &[Palette],
    ) -> Result<Vec<RgbaImage>, CodecError>;

    /// Arrange cells row-major into a raster `width` cells wide
    fn compose_raster(&self, cells: &[RgbaImage], width: u32) -> Result<RgbaImage, CodecError>;
}
