// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Growable pooled byte storage backing every writer session.
//!
//! [`ExtensibleBuffer`] follows a two-phase write protocol: callers obtain a
//! writable span with [`ExtensibleBuffer::request_span`], fill it, then commit
//! with [`ExtensibleBuffer::advance`]. A span must not be retained across
//! calls to `request_span`/`advance` — growth may reallocate the backing
//! store. Capacity only grows, never shrinks, within a session.

pub mod pool;

pub use pool::{BufferLease, BufferPool};

use crate::error::{CodecError, Result};

/// Block size used when a buffer is first grown from empty.
pub const BUFFER_BLOCK_SIZE: usize = 2 * 1024;

/// Growable contiguous byte store with a committed-length cursor.
///
/// Invariant: `written_len <= capacity` at all times; `request_span` never
/// returns an empty region.
#[derive(Debug)]
pub struct ExtensibleBuffer {
    data: Vec<u8>,
    written: usize,
    read_only: bool,
}

impl Default for ExtensibleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtensibleBuffer {
    /// Create an empty buffer. Storage is allocated lazily on the first
    /// `request_span`.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            written: 0,
            read_only: false,
        }
    }

    /// Create a buffer with a preallocated capacity.
    pub fn with_capacity(initial_capacity: usize) -> Result<Self> {
        if initial_capacity == 0 {
            return Err(CodecError::InvalidArgument {
                reason: "initial capacity must be positive".into(),
            });
        }
        Ok(Self {
            data: vec![0; initial_capacity],
            written: 0,
            read_only: false,
        })
    }

    /// Number of committed bytes.
    pub fn len(&self) -> usize {
        self.written
    }

    /// True if nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Total capacity of the backing store.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Free capacity still writable without growth.
    pub fn free_capacity(&self) -> usize {
        self.data.len() - self.written
    }

    /// Toggle the read-only flag. A read-only buffer rejects
    /// `request_span`/`advance`.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// The committed region.
    pub fn written(&self) -> &[u8] {
        &self.data[..self.written]
    }

    /// Return a writable span of at least `min_size` bytes, growing the
    /// backing store if the free capacity is insufficient. A `min_size` of
    /// zero still yields a non-empty span.
    ///
    /// Growth doubles the current capacity (at least [`BUFFER_BLOCK_SIZE`]
    /// on first allocation) and preserves all committed bytes at their
    /// original offsets.
    pub fn request_span(&mut self, min_size: usize) -> Result<&mut [u8]> {
        if self.read_only {
            return Err(CodecError::InvalidOperation {
                reason: "buffer is read-only".into(),
            });
        }
        let needed = min_size.max(1);
        if needed > self.free_capacity() {
            self.grow(needed);
        }
        Ok(&mut self.data[self.written..])
    }

    /// Commit `count` bytes previously filled through `request_span`.
    pub fn advance(&mut self, count: usize) -> Result<()> {
        if self.read_only {
            return Err(CodecError::InvalidOperation {
                reason: "buffer is read-only".into(),
            });
        }
        if count > self.free_capacity() {
            return Err(CodecError::InvalidOperation {
                reason: format!(
                    "advanced too far: {} exceeds free capacity {}",
                    count,
                    self.free_capacity()
                ),
            });
        }
        self.written += count;
        Ok(())
    }

    /// Reset the write cursor. Previously returned spans are invalidated; a
    /// fresh acquisition from the pool behaves as if newly constructed.
    pub fn clear(&mut self) {
        self.written = 0;
        self.read_only = false;
    }

    fn grow(&mut self, needed: usize) {
        let grow_by = needed.max(self.data.len()).max(BUFFER_BLOCK_SIZE);
        let new_size = self.data.len() + grow_by;
        log::trace!(
            "[buffer] grow {} -> {} (need {})",
            self.data.len(),
            new_size,
            needed
        );
        self.data.resize(new_size, 0);
    }
}
