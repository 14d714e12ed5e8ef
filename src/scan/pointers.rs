//! Pointer scanning and navigation

use super::validate::is_candidate;
use crate::common::{to_raw_offset, POINTER_TERMINATOR};
use crate::source::ByteSource;
use std::collections::BTreeSet;

/// Sorted set of unique raw offsets found in a ROM
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerSet {
    offsets: Vec<u32>,
}

impl PointerSet {
    /// Build a set from arbitrary addresses, normalizing, sorting and deduplicating them
    pub fn from_addresses(addresses: impl IntoIterator<Item = u32>) -> Self {
        let unique: BTreeSet<u32> = addresses.into_iter().map(to_raw_offset).collect();
        Self {
            offsets: unique.into_iter().collect(),
        }
    }

    /// Number of offsets
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Offsets in ascending order
    pub fn as_slice(&self) -> &[u32] {
        &self.offsets
    }

    /// Iterate over offsets in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.offsets.iter().copied()
    }

    /// Smallest offset
    pub fn first(&self) -> Option<u32> {
        self.offsets.first().copied()
    }

    /// Largest offset
    pub fn last(&self) -> Option<u32> {
        self.offsets.last().copied()
    }

    /// Whether `addr` is in the set
    pub fn contains(&self, addr: u32) -> bool {
        self.offsets.binary_search(&to_raw_offset(addr)).is_ok()
    }

    /// Smallest offset strictly greater than `addr`
    pub fn next_after(&self, addr: u32) -> Option<u32> {
        let addr = to_raw_offset(addr);
        let index = self.offsets.partition_point(|&offset| offset <= addr);
        self.offsets.get(index).copied()
    }

    /// Largest offset strictly less than `addr`
    pub fn prev_before(&self, addr: u32) -> Option<u32> {
        let addr = to_raw_offset(addr);
        let index = self.offsets.partition_point(|&offset| offset < addr);
        index.checked_sub(1).map(|i| self.offsets[i])
    }

    /// Keep only offsets matching `predicate`
    pub fn filter(&self, predicate: impl FnMut(&u32) -> bool) -> Self {
        Self {
            offsets: self.offsets.iter().copied().filter(predicate).collect(),
        }
    }
}

impl IntoIterator for PointerSet {
    type Item = u32;
    type IntoIter = std::vec::IntoIter<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.offsets.into_iter()
    }
}

/// Collect every word ending in the ROM terminator byte as a raw offset
///
/// A terminator in the first three bytes of the buffer has no complete word
/// behind it and is skipped.
pub fn scan(source: &ByteSource) -> PointerSet {
    let pointers = PointerSet::from_addresses(
        source
            .as_bytes()
            .windows(4)
            .filter(|word| word[3] == POINTER_TERMINATOR)
            .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]])),
    );
    log::trace!(
        "Found {} unique pointers in {} bytes",
        pointers.len(),
        source.len()
    );
    pointers
}

/// Scan for pointers and keep those addressing a plausible LZ77 header
pub fn scan_candidates(source: &ByteSource) -> PointerSet {
    let candidates = scan(source).filter(|&offset| is_candidate(source, offset, false));
    log::debug!("{} pointers look like compressed streams", candidates.len());
    candidates
}
