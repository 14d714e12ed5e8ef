//! Caller-owned viewer state
//!
//! A front end browsing a ROM keeps the current image, palette and tilemap
//! addresses plus the layout width in a [`ViewState`] and passes it to each
//! decode. Nothing here is global; two views over the same ROM are independent.

use crate::codec::Codec;
use crate::common::{to_mapped_address, to_raw_offset};
use crate::decode::{decode_image, decode_tilemap, DecodeOptions, DecodeResult};
use crate::scan::PointerSet;
use crate::source::ByteSource;
use crate::GbaViewError;

/// Default layout width in tiles
pub const DEFAULT_WIDTH: u32 = 16;

/// Navigation state for browsing graphics in a ROM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    image: u32,
    palette: u32,
    tilemap: u32,
    width: u32,
    /// Decode through the tilemap instead of laying tiles out directly
    pub tilemap_enabled: bool,
    /// Span limits for uncompressed data
    pub options: DecodeOptions,
}

impl ViewState {
    /// Create a view at offset zero with the default width
    pub fn new() -> Self {
        Self {
            image: 0,
            palette: 0,
            tilemap: 0,
            width: DEFAULT_WIDTH,
            tilemap_enabled: false,
            options: DecodeOptions::default(),
        }
    }

    /// Use the given span limits
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Current image offset
    pub fn image(&self) -> u32 {
        self.image
    }

    /// Current palette offset
    pub fn palette(&self) -> u32 {
        self.palette
    }

    /// Current tilemap offset
    pub fn tilemap(&self) -> u32 {
        self.tilemap
    }

    /// Layout width in tiles
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Point the image at `addr` (mapped or raw)
    pub fn set_image(&mut self, addr: u32) {
        self.image = to_raw_offset(addr);
    }

    /// Point the palette at `addr` (mapped or raw)
    pub fn set_palette(&mut self, addr: u32) {
        self.palette = to_raw_offset(addr);
    }

    /// Point the tilemap at `addr` (mapped or raw)
    pub fn set_tilemap(&mut self, addr: u32) {
        self.tilemap = to_raw_offset(addr);
    }

    /// Set the layout width; values below one tile are raised to one
    pub fn set_width(&mut self, width: u32) {
        self.width = width.max(1);
    }

    /// Move the image to the next pointer, returning whether it moved
    pub fn next_image(&mut self, pointers: &PointerSet) -> bool {
        let target = pointers.next_after(self.image);
        Self::step(&mut self.image, target)
    }

    /// Move the image to the previous pointer, returning whether it moved
    pub fn prev_image(&mut self, pointers: &PointerSet) -> bool {
        let target = pointers.prev_before(self.image);
        Self::step(&mut self.image, target)
    }

    /// Move the palette to the next pointer, returning whether it moved
    pub fn next_palette(&mut self, pointers: &PointerSet) -> bool {
        let target = pointers.next_after(self.palette);
        Self::step(&mut self.palette, target)
    }

    /// Move the palette to the previous pointer, returning whether it moved
    pub fn prev_palette(&mut self, pointers: &PointerSet) -> bool {
        let target = pointers.prev_before(self.palette);
        Self::step(&mut self.palette, target)
    }

    fn step(current: &mut u32, target: Option<u32>) -> bool {
        match target {
            Some(offset) => {
                *current = offset;
                true
            }
            None => false,
        }
    }

    /// Raw bytes assumed to belong to an uncompressed image
    ///
    /// Runs to the next known pointer, or to the end of the ROM, and never
    /// exceeds the configured cap.
    pub fn image_span(&self, source: &ByteSource, pointers: &PointerSet) -> usize {
        let start = self.image as usize;
        let span = match pointers.next_after(self.image) {
            Some(next) => next as usize - start,
            None => source.remaining(start),
        };
        span.min(self.options.image_span_cap)
    }

    /// Decode what the view currently points at
    pub fn decode<C: Codec + ?Sized>(
        &self,
        source: &ByteSource,
        pointers: &PointerSet,
        codec: &C,
    ) -> DecodeResult {
        if self.tilemap_enabled {
            decode_tilemap(
                source,
                codec,
                self.image,
                self.palette,
                self.tilemap,
                self.width,
                &self.options,
            )
        } else {
            let span = self.image_span(source, pointers);
            decode_image(
                source,
                codec,
                self.image,
                self.palette,
                Some(span),
                self.width,
            )
        }
    }

    /// Status line for a failed decode of this view
    pub fn describe_error(&self, error: &GbaViewError) -> String {
        match error {
            GbaViewError::PaletteTooSmall { .. } => format!(
                "The compressed data at 0x{:X} is too small for a palette",
                to_mapped_address(self.palette)
            ),
            GbaViewError::PaletteDecodeFailed(_) => format!(
                "Failed to decode palette at 0x{:X}",
                to_mapped_address(self.palette)
            ),
            GbaViewError::ImageDecodeFailed(_) | GbaViewError::MissingImageLength => format!(
                "Failed to decode image at 0x{:X}",
                to_mapped_address(self.image)
            ),
            GbaViewError::TilemapDecodeFailed(_) => format!(
                "Failed to decode tilemap at 0x{:X}",
                to_mapped_address(self.tilemap)
            ),
            GbaViewError::ZeroSizeImage => "Image has a size of 0".to_string(),
            other => format!("Unknown error: {other}"),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}
