//! Linear GBA tile codec
//!
//! Character data is stored tile by tile, each tile row-major, with the
//! leftmost pixel of each byte in its lowest bits. Palettes are arrays of
//! little-endian BGR555 colors.

use super::tilemap::TilemapEntry;
use super::{
    Codec, CodecError, Palette, Tile, MAX_RASTER_PIXELS, TILE_DIM, TILE_PIXELS, TRANSPARENT,
};
use image::{imageops, Rgba, RgbaImage};

/// Supported bit depths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bpp {
    /// 4 colors per palette
    Two = 2,
    /// 16 colors per palette
    Four = 4,
    /// 256 colors, single palette
    Eight = 8,
}

impl Bpp {
    /// Create a Bpp from a bit count
    pub fn from_bits(bits: u32) -> Result<Self, CodecError> {
        match bits {
            2 => Ok(Bpp::Two),
            4 => Ok(Bpp::Four),
            8 => Ok(Bpp::Eight),
            _ => Err(CodecError::UnsupportedBitDepth(bits)),
        }
    }

    /// Bits per pixel
    pub fn bits(&self) -> u32 {
        *self as u32
    }

    /// Entries in one palette
    pub fn colors(&self) -> usize {
        1 << self.bits()
    }

    /// Bytes per tile
    pub fn tile_byte_size(&self) -> usize {
        TILE_PIXELS * self.bits() as usize / 8
    }

    /// Bytes per palette (two per color)
    pub fn palette_byte_size(&self) -> usize {
        self.colors() * 2
    }
}

/// Expand a BGR555 color to 8 bits per channel
fn bgr555_to_rgba(raw: u16, alpha: u8) -> Rgba<u8> {
    let expand = |c: u16| {
        let c = (c & 0x1F) as u8;
        (c << 3) | (c >> 2)
    };
    Rgba([expand(raw), expand(raw >> 5), expand(raw >> 10), alpha])
}

/// Codec for linear 2/4/8 bpp tiles and BGR555 palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearCodec {
    bpp: Bpp,
}

impl LinearCodec {
    /// Create a codec for the given bit depth
    pub fn new(bpp: Bpp) -> Self {
        Self { bpp }
    }

    /// Bit depth handled by this codec
    pub fn bpp(&self) -> Bpp {
        self.bpp
    }

    fn decode_tile(&self, bytes: &[u8]) -> Tile {
        let bits = self.bpp.bits();
        let per_byte = (8 / bits) as usize;
        let mask = ((1u16 << bits) - 1) as u8;

        let mut indices = [0u8; TILE_PIXELS];
        for (i, index) in indices.iter_mut().enumerate() {
            let shift = (i % per_byte) as u32 * bits;
            *index = (bytes[i / per_byte] >> shift) & mask;
        }
        Tile::new(indices)
    }

    fn palette_from(bytes: &[u8], alpha: bool) -> Palette {
        Palette::new(
            bytes
                .chunks_exact(2)
                .enumerate()
                .map(|(i, pair)| {
                    let raw = u16::from_le_bytes([pair[0], pair[1]]);
                    let a = if alpha && i == 0 { 0 } else { 0xFF };
                    bgr555_to_rgba(raw, a)
                })
                .collect(),
        )
    }
}

impl Default for LinearCodec {
    fn default() -> Self {
        Self::new(Bpp::Four)
    }
}

impl Codec for LinearCodec {
    fn bits_per_pixel(&self) -> u32 {
        self.bpp.bits()
    }

    fn tile_byte_size(&self) -> usize {
        self.bpp.tile_byte_size()
    }

    fn palette_byte_size(&self, bpp: u32) -> usize {
        Bpp::from_bits(bpp).map_or(0, |bpp| bpp.palette_byte_size())
    }

    fn decode_palette(&self, bytes: &[u8], bpp: u32) -> Result<Palette, CodecError> {
        let expected = Bpp::from_bits(bpp)?.palette_byte_size();
        if bytes.len() < expected {
            return Err(CodecError::PaletteTooShort {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self::palette_from(&bytes[..expected], false))
    }

    fn decode_image(
        &self,
        tile_bytes: &[u8],
        palette: &Palette,
        width: u32,
    ) -> Result<RgbaImage, CodecError> {
        let cells = self
            .decode_tiles(tile_bytes)?
            .iter()
            .map(|tile| tile.render(palette))
            .collect::<Result<Vec<_>, _>>()?;
        self.compose_raster(&cells, width)
    }

    fn decode_tiles(&self, tile_bytes: &[u8]) -> Result<Vec<Tile>, CodecError> {
        let tile_size = self.tile_byte_size();
        if tile_bytes.len() % tile_size != 0 {
            return Err(CodecError::MisalignedTileData {
                len: tile_bytes.len(),
                tile_size,
            });
        }
        Ok(tile_bytes
            .chunks_exact(tile_size)
            .map(|chunk| self.decode_tile(chunk))
            .collect())
    }

    fn decode_palettes(
        &self,
        bytes: &[u8],
        bpp: u32,
        alpha: bool,
    ) -> Result<Vec<Palette>, CodecError> {
        let size = Bpp::from_bits(bpp)?.palette_byte_size();
        if bytes.len() < size {
            return Err(CodecError::PaletteTooShort {
                expected: size,
                actual: bytes.len(),
            });
        }
        Ok(bytes
            .chunks_exact(size)
            .map(|chunk| Self::palette_from(chunk, alpha))
            .collect())
    }

    fn decode_tilemap_cells(
        &self,
        tilemap_bytes: &[u8],
        tiles: &[Tile],
        palettes: &[Palette],
    ) -> Result<Vec<RgbaImage>, CodecError> {
        let single_palette = self.bpp == Bpp::Eight;
        TilemapEntry::parse_all(tilemap_bytes)
            .iter()
            .map(|entry| entry.resolve(tiles, palettes, single_palette))
            .collect()
    }

    fn compose_raster(&self, cells: &[RgbaImage], width: u32) -> Result<RgbaImage, CodecError> {
        if width == 0 {
            return Err(CodecError::ZeroWidth);
        }
        let (cell_w, cell_h) = cells
            .first()
            .map_or((TILE_DIM, TILE_DIM), |cell| cell.dimensions());
        let rows = cells.len().div_ceil(width as usize);
        let too_large = CodecError::DimensionsTooLarge {
            columns: width,
            rows,
        };
        let raster_w = width.checked_mul(cell_w).ok_or(too_large.clone())?;
        let raster_h = u32::try_from(rows)
            .ok()
            .and_then(|rows| rows.checked_mul(cell_h))
            .ok_or(too_large.clone())?;
        if u64::from(raster_w) * u64::from(raster_h) > MAX_RASTER_PIXELS {
            return Err(too_large);
        }

        let mut raster = RgbaImage::from_pixel(raster_w, raster_h, TRANSPARENT);
        for (i, cell) in cells.iter().enumerate() {
            if cell.dimensions() != (cell_w, cell_h) {
                return Err(CodecError::MismatchedCell {
                    index: i,
                    width: cell.width(),
                    height: cell.height(),
                    expected_width: cell_w,
                    expected_height: cell_h,
                });
            }
            let x = (i % width as usize) as i64 * cell_w as i64;
            let y = (i / width as usize) as i64 * cell_h as i64;
            imageops::replace(&mut raster, cell, x, y);
        }
        Ok(raster)
    }
}
