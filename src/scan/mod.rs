//! Pointer discovery and header validation
//!
//! The scanner collects every little-endian word whose top byte is the ROM
//! region byte `0x08`, which finds most pointers into the cartridge at the cost
//! of many false positives. The validator then separates addresses that look
//! like LZ77 stream headers from the rest.

mod pointers;
mod validate;

pub use pointers::{scan, scan_candidates, PointerSet};
pub use validate::{classify, is_candidate, Candidate};
