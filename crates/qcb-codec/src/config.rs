//! Reader configuration.

use std::num::NonZeroUsize;

/// Configuration for [`ChunkedTickReader`](crate::ChunkedTickReader).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Number of bytes requested from the source per read.
    ///
    /// Any size decodes correctly, including sizes smaller than a record.
    pub chunk_size: NonZeroUsize,
}

impl ReaderConfig {
    /// Default chunk size in bytes.
    pub const DEFAULT_CHUNK_SIZE: usize = 4096;

    /// Sets the chunk size.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: NonZeroUsize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: NonZeroUsize::new(Self::DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}
