// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide buffer pool.
//!
//! Writer sessions acquire a [`BufferLease`] at session start and own it
//! exclusively until disposal; the lease clears the buffer and hands it back
//! to the pool on `Drop`, on every exit path including failure. The pool is
//! populated lazily and lives for the process.

use std::sync::OnceLock;

use parking_lot::Mutex;

use super::ExtensibleBuffer;

/// Upper bound on idle buffers retained by the pool. Buffers released while
/// the free list is full are dropped instead of cached.
const MAX_IDLE_BUFFERS: usize = 32;

static GLOBAL_POOL: OnceLock<BufferPool> = OnceLock::new();

/// Free list of reusable [`ExtensibleBuffer`]s.
pub struct BufferPool {
    free: Mutex<Vec<ExtensibleBuffer>>,
}

impl BufferPool {
    fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }

    /// The process-wide pool.
    pub fn global() -> &'static BufferPool {
        GLOBAL_POOL.get_or_init(BufferPool::new)
    }

    /// Acquire a cleared buffer, reusing an idle one when available.
    ///
    /// Leases borrow the pool for the rest of the process; acquire through
    /// [`BufferPool::global`].
    pub fn acquire(&'static self) -> BufferLease {
        let buf = self.free.lock().pop();
        let buf = match buf {
            Some(b) => b,
            None => {
                log::trace!("[pool] free list empty, allocating fresh buffer");
                ExtensibleBuffer::new()
            }
        };
        BufferLease {
            pool: self,
            buf: Some(buf),
        }
    }

    /// Number of idle buffers currently cached.
    pub fn idle_count(&self) -> usize {
        self.free.lock().len()
    }

    fn release(&self, mut buf: ExtensibleBuffer) {
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < MAX_IDLE_BUFFERS {
            free.push(buf);
        } else {
            log::trace!("[pool] free list full, dropping buffer");
        }
    }
}

/// Exclusive, scoped ownership of one pooled buffer.
///
/// Dereferences to [`ExtensibleBuffer`]; returns the buffer to its pool when
/// dropped. A disposed buffer must never be touched again — the borrow
/// checker enforces this.
pub struct BufferLease {
    pool: &'static BufferPool,
    buf: Option<ExtensibleBuffer>,
}

impl BufferLease {
    /// Acquire a lease from the global pool.
    pub fn from_global() -> Self {
        BufferPool::global().acquire()
    }
}

impl std::ops::Deref for BufferLease {
    type Target = ExtensibleBuffer;

    fn deref(&self) -> &ExtensibleBuffer {
        // Invariant: `buf` is Some until Drop.
        self.buf.as_ref().expect("lease already released")
    }
}

impl std::ops::DerefMut for BufferLease {
    fn deref_mut(&mut self) -> &mut ExtensibleBuffer {
        self.buf.as_mut().expect("lease already released")
    }
}

impl Drop for BufferLease {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}
