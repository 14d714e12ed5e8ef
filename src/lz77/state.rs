//! Decompression state management
//!
//! Holds the cursors and output buffer of a single LZ77 stream being decoded.

use crate::common::{StreamHeader, HEADER_SIZE};

/// Token statistics gathered while decompressing one stream
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Lz77Stats {
    /// Number of literal tokens decoded
    pub literal_count: usize,
    /// Number of back-reference tokens decoded
    pub back_reference_count: usize,
    /// Longest copy performed by a back-reference (after clamping to the declared size)
    pub longest_copy: usize,
    /// Compressed bytes consumed, header included
    pub compressed_size: usize,
}

/// Decompression state for one LZ77 stream
#[derive(Debug)]
pub struct Lz77State {
    /// Parsed stream header
    pub header: StreamHeader,
    /// Raw offset of the stream header in the source
    pub stream_start: usize,
    /// Next source offset to read
    pub in_pos: usize,
    /// Next output position to write
    pub out_pos: usize,
    /// Output buffer, sized to the declared length up front
    pub output: Vec<u8>,
    /// Statistics collected so far
    pub stats: Lz77Stats,
}

impl Lz77State {
    /// Create the state for a stream whose header sits at `stream_start`
    pub fn new(header: StreamHeader, stream_start: usize) -> Self {
        Self {
            header,
            stream_start,
            in_pos: stream_start + HEADER_SIZE,
            out_pos: 0,
            output: vec![0; header.size as usize],
            stats: Lz77Stats::default(),
        }
    }

    /// Declared decompressed size
    pub fn size(&self) -> usize {
        self.output.len()
    }

    /// Whether the declared size has been produced
    pub fn is_complete(&self) -> bool {
        self.out_pos >= self.size()
    }

    /// Consume the state, returning the output and final statistics
    pub fn finish(mut self) -> (Vec<u8>, Lz77Stats) {
        self.stats.compressed_size = self.in_pos - self.stream_start;
        (self.output, self.stats)
    }
}
