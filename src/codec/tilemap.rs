//! Text-mode tilemap entries

use super::{CodecError, Palette, Tile};
use image::imageops;
use image::RgbaImage;

/// One 16-bit screen entry: `PPPP VHTT TTTT TTTT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilemapEntry {
    /// Tile number (10 bits)
    pub tile: u16,
    /// Mirror the tile left to right
    pub flip_x: bool,
    /// Mirror the tile top to bottom
    pub flip_y: bool,
    /// Palette bank (4 bits)
    pub palette: u8,
}

impl TilemapEntry {
    /// Unpack a raw screen entry
    pub fn from_raw(raw: u16) -> Self {
        Self {
            tile: raw & 0x03FF,
            flip_x: raw & 0x0400 != 0,
            flip_y: raw & 0x0800 != 0,
            palette: (raw >> 12) as u8,
        }
    }

    /// Parse little-endian entries; a trailing odd byte is ignored
    pub fn parse_all(bytes: &[u8]) -> Vec<Self> {
        bytes
            .chunks_exact(2)
            .map(|pair| Self::from_raw(u16::from_le_bytes([pair[0], pair[1]])))
            .collect()
    }

    /// Render this entry using the given tiles and palettes
    ///
    /// When `single_palette` is set (8 bpp), the palette bank is ignored.
    pub fn resolve(
        &self,
        tiles: &[Tile],
        palettes: &[Palette],
        single_palette: bool,
    ) -> Result<RgbaImage, CodecError> {
        let tile = tiles
            .get(self.tile as usize)
            .ok_or(CodecError::TileIndexOutOfRange {
                index: self.tile as usize,
                count: tiles.len(),
            })?;
        let bank = if single_palette {
            0
        } else {
            self.palette as usize
        };
        let palette = palettes
            .get(bank)
            .ok_or(CodecError::PaletteIndexOutOfRange {
                index: bank,
                count: palettes.len(),
            })?;

        let mut cell = tile.render(palette)?;
        if self.flip_x {
            imageops::flip_horizontal_in_place(&mut cell);
        }
        if self.flip_y {
            imageops::flip_vertical_in_place(&mut cell);
        }
        Ok(cell)
    }
}
