//! Immutable ROM buffer
//!
//! [`ByteSource`] wraps the loaded cartridge image. Clones share the same
//! allocation, so a source can be handed to worker threads without copying.

use bytes::Bytes;

/// Immutable, randomly addressable view of a loaded binary image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteSource {
    data: Bytes,
}

impl ByteSource {
    /// Create a source from owned bytes
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Total length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The whole buffer
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Byte at `offset`, if in bounds
    pub fn get(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    /// Exactly `len` bytes starting at `offset`, or `None` if that runs past the end
    pub fn slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.data.get(offset..end)
    }

    /// Up to `len` bytes starting at `offset`, truncated at the end of the buffer
    ///
    /// Returns an empty slice when `offset` is past the end.
    pub fn slice_clamped(&self, offset: usize, len: usize) -> &[u8] {
        let start = offset.min(self.data.len());
        let end = offset.saturating_add(len).min(self.data.len());
        &self.data[start..end]
    }

    /// Bytes remaining from `offset` to the end of the buffer
    pub fn remaining(&self, offset: usize) -> usize {
        self.data.len().saturating_sub(offset)
    }
}

impl From<Vec<u8>> for ByteSource {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&'static [u8]> for ByteSource {
    fn from(data: &'static [u8]) -> Self {
        Self::new(data)
    }
}

impl AsRef<[u8]> for ByteSource {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
