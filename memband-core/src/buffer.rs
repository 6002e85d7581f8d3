//! Benchmark Buffers
//!
//! Three process-lifetime buffers of 64-bit elements: source, destination
//! and staging. Every element is written with [`SENTINEL`] at allocation
//! time so that the kernel never pays first-touch page faults inside a
//! timed span.

use crate::ELEMENT_BYTES;
use std::collections::TryReserveError;
use thiserror::Error;

/// Value written into every element right after allocation
pub const SENTINEL: u64 = 0xaa;

/// Errors that can occur while committing benchmark memory
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("Error allocating memory: {elements} elements ({bytes} bytes): {source}")]
    Allocation {
        elements: usize,
        bytes: usize,
        #[source]
        source: TryReserveError,
    },
}

/// An owned, fully committed run of 64-bit elements
#[derive(Debug)]
pub struct Buffer {
    data: Vec<u64>,
}

impl Buffer {
    /// Allocate `count` elements, zero them, then overwrite each with [`SENTINEL`].
    pub fn allocate(count: usize) -> Result<Self, BufferError> {
        let mut data = Vec::new();
        data.try_reserve_exact(count)
            .map_err(|source| BufferError::Allocation {
                elements: count,
                bytes: count.saturating_mul(ELEMENT_BYTES),
                source,
            })?;
        data.resize(count, 0);
        data.fill(SENTINEL);
        Ok(Self { data })
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size in bytes
    pub fn byte_len(&self) -> usize {
        self.data.len() * ELEMENT_BYTES
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u64] {
        &mut self.data
    }
}

/// The source/destination/staging triple shared by every kernel invocation
#[derive(Debug)]
pub struct BufferSet {
    pub source: Buffer,
    pub destination: Buffer,
    pub staging: Buffer,
}

impl BufferSet {
    /// Allocate all three buffers through `alloc`.
    ///
    /// Source and destination hold `array_elements`; staging holds
    /// `block_elements`.
    pub fn allocate_with<F>(
        array_elements: usize,
        block_elements: usize,
        mut alloc: F,
    ) -> Result<Self, BufferError>
    where
        F: FnMut(usize) -> Result<Buffer, BufferError>,
    {
        Ok(Self {
            source: alloc(array_elements)?,
            destination: alloc(array_elements)?,
            staging: alloc(block_elements)?,
        })
    }

    /// Allocate all three buffers on the heap.
    pub fn allocate(array_elements: usize, block_elements: usize) -> Result<Self, BufferError> {
        Self::allocate_with(array_elements, block_elements, Buffer::allocate)
    }

    /// Total bytes committed across all three buffers
    pub fn committed_bytes(&self) -> usize {
        self.source.byte_len() + self.destination.byte_len() + self.staging.byte_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_fills_sentinel() {
        let buf = Buffer::allocate(1024).unwrap();
        assert_eq!(buf.len(), 1024);
        assert_eq!(buf.byte_len(), 1024 * ELEMENT_BYTES);
        assert!(buf.as_slice().iter().all(|&v| v == SENTINEL));
    }

    #[test]
    fn test_allocate_empty() {
        let buf = Buffer::allocate(0).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_impossible_allocation_is_reported() {
        let err = Buffer::allocate(usize::MAX / 2).unwrap_err();
        assert!(err.to_string().starts_with("Error allocating memory"));
    }

    #[test]
    fn test_buffer_set_sizes() {
        let set = BufferSet::allocate(4096, 512).unwrap();
        assert_eq!(set.source.len(), 4096);
        assert_eq!(set.destination.len(), 4096);
        assert_eq!(set.staging.len(), 512);
        assert_eq!(set.committed_bytes(), (4096 * 2 + 512) * ELEMENT_BYTES);
    }

    #[test]
    fn test_allocate_with_stops_at_first_failure() {
        let mut calls = 0;
        let result = BufferSet::allocate_with(64, 8, |count| {
            calls += 1;
            if calls == 2 {
                Buffer::allocate(usize::MAX / 2)
            } else {
                Buffer::allocate(count)
            }
        });
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }
}
