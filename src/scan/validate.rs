//! Compressed stream header validation

use crate::common::{to_raw_offset, StreamHeader, HEADER_SIZE};
use crate::lz77;
use crate::source::ByteSource;

/// How far an address got through validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// No plausible LZ77 header at the address
    NotCandidate,
    /// Header looks right but the stream was not decoded
    Plausible,
    /// The stream decompresses cleanly
    Confirmed,
}

fn plausible_header(source: &ByteSource, offset: usize) -> bool {
    // Header plus at least one flag byte
    if source.remaining(offset) < HEADER_SIZE + 1 {
        return false;
    }
    source
        .slice(offset, HEADER_SIZE)
        .and_then(StreamHeader::parse)
        .is_some_and(|header| header.is_lz77() && header.has_plausible_size())
}

/// Whether `addr` addresses a compressed image stream
///
/// The cheap check only looks at the header: LZ77 tag and a size between 32
/// bytes and 32 KiB. With `strict`, the stream must also decompress without
/// error. Never fails; anything unreadable is simply not a candidate.
pub fn is_candidate(source: &ByteSource, addr: u32, strict: bool) -> bool {
    let offset = to_raw_offset(addr) as usize;
    if !plausible_header(source, offset) {
        return false;
    }
    !strict || lz77::decompress(source, addr).is_ok()
}

/// Run both checks and report the furthest one passed
pub fn classify(source: &ByteSource, addr: u32) -> Candidate {
    if !is_candidate(source, addr, false) {
        Candidate::NotCandidate
    } else if is_candidate(source, addr, true) {
        Candidate::Confirmed
    } else {
        Candidate::Plausible
    }
}
