//! # Chunked memory buffer
//!
//! Append-only, pop-from-front store for undelivered trace bytes, kept as
//! an ordered sequence of fixed-capacity chunks. Producers append under the
//! subsystem lock; an external consumer drains completed chunks one at a
//! time via [`ChunkedBuffer::pop_chunk`].
//!
//! ## Invariants
//!
//! - Every chunk except the current tail is completely full.
//! - Byte order within and across chunks is exact FIFO write order.
//! - At most `max_chunks` chunks exist; once the bound is reached the
//!   remainder of the offending write is discarded (reject-newest,
//!   byte-granular — see [`ChunkedBuffer::write`]).
//!
//! Chunk storage is ownership-based: popping moves the [`Chunk`] out of the
//! buffer and releasing it is simply `Drop`, so the producer/consumer
//! ownership handoff cannot double-free or use freed memory.

use std::collections::VecDeque;

use log::warn;

use crate::diagnostics::RateLimited;
use crate::domain::DropStats;

/// One fixed-capacity storage unit inside the chunked buffer.
///
/// Capacity is fixed at allocation time to the buffer's configured chunk
/// size. A chunk popped from the buffer is exclusively owned by the caller;
/// its payload stays valid until the `Chunk` is dropped.
#[derive(Debug)]
pub struct Chunk {
    data: Box<[u8]>,
    filled: usize,
}

impl Chunk {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            filled: 0,
        }
    }

    /// Payload capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of payload bytes written so far.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.filled
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.filled == self.data.len()
    }

    /// The valid payload bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.filled]
    }

    /// Copy as many bytes as fit into the remaining space; returns the
    /// number copied.
    fn fill_from(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.data.len() - self.filled);
        self.data[self.filled..self.filled + n].copy_from_slice(&bytes[..n]);
        self.filled += n;
        n
    }
}

/// Bounded FIFO of fixed-capacity chunks holding undelivered trace bytes.
///
/// The front chunk is the oldest, the back chunk is the current write
/// target. Not internally synchronized: all mutation must happen under the
/// subsystem lock.
#[derive(Debug)]
pub struct ChunkedBuffer {
    chunks: VecDeque<Chunk>,
    chunk_size: usize,
    max_chunks: usize,
    drops: DropStats,
    drop_warn: RateLimited,
}

impl ChunkedBuffer {
    /// Create an empty buffer.
    ///
    /// `chunk_size` and `max_chunks` are validated upstream by
    /// [`EventLogConfig::validate`](crate::EventLogConfig::validate); zero
    /// values here would make every write a drop.
    #[must_use]
    pub fn new(chunk_size: usize, max_chunks: usize) -> Self {
        debug_assert!(chunk_size > 0, "chunk size must be non-zero");
        debug_assert!(max_chunks > 0, "chunk bound must allow at least one chunk");
        Self {
            chunks: VecDeque::new(),
            chunk_size,
            max_chunks,
            drops: DropStats::default(),
            drop_warn: RateLimited::default(),
        }
    }

    /// Append `bytes`, splitting across newly allocated chunks as needed.
    ///
    /// Pure memory copy: never performs I/O and never blocks on the
    /// consumer. When allocating another chunk would exceed the configured
    /// bound, the remainder of the write is dropped (reject-newest): bytes
    /// that fit in already-allocated space are kept, the rest are counted
    /// in [`drop_stats`](Self::drop_stats) and reported through a
    /// rate-limited warning. The producer is never slowed or failed.
    pub fn write(&mut self, bytes: &[u8]) {
        let mut remaining = bytes;
        while !remaining.is_empty() {
            match self.writable_tail(true) {
                Some(tail) => {
                    let copied = tail.fill_from(remaining);
                    remaining = &remaining[copied..];
                }
                None => {
                    self.note_dropped(remaining.len());
                    break;
                }
            }
        }
    }

    /// Remove and return the oldest *full* chunk, transferring ownership to
    /// the caller.
    ///
    /// Returns `None` when the buffer is empty or when the only chunk is a
    /// partially filled tail; a partial tail is never returned, even at
    /// shutdown (draining it requires tearing the buffer down). Calling
    /// this on an empty buffer any number of times has no side effects.
    pub fn pop_chunk(&mut self) -> Option<Chunk> {
        // Non-tail chunks are always full, so the front is poppable iff it
        // is not the sole (partial) tail.
        let poppable =
            self.chunks.len() > 1 || self.chunks.front().is_some_and(Chunk::is_full);
        if poppable {
            self.chunks.pop_front()
        } else {
            None
        }
    }

    /// Re-chunk all live bytes to `new_chunk_size`, preserving content and
    /// FIFO order exactly.
    ///
    /// Migration re-writes every chunk's live bytes into freshly sized
    /// chunks and is exempt from the chunk bound, so no bytes are lost;
    /// peak memory temporarily doubles. A zero size is rejected with a
    /// warning rather than an error: resize is reachable from paths that
    /// must not fail.
    pub fn resize(&mut self, new_chunk_size: usize) {
        if new_chunk_size == 0 {
            warn!("eventlog: ignoring buffer resize to zero chunk size");
            return;
        }
        if new_chunk_size == self.chunk_size {
            return;
        }

        let old = std::mem::take(&mut self.chunks);
        self.chunk_size = new_chunk_size;
        for chunk in old {
            let mut remaining = chunk.as_bytes();
            while !remaining.is_empty() {
                if let Some(tail) = self.writable_tail(false) {
                    let copied = tail.fill_from(remaining);
                    remaining = &remaining[copied..];
                }
            }
        }
    }

    /// Configured payload capacity of each chunk.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of live chunks, including a partial tail.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total undelivered payload bytes across all chunks.
    #[must_use]
    pub fn buffered_bytes(&self) -> u64 {
        self.chunks.iter().map(|c| c.filled() as u64).sum()
    }

    /// Fill offset of the tail chunk; 0 when the buffer is empty.
    #[must_use]
    pub fn tail_fill(&self) -> usize {
        self.chunks.back().map_or(0, Chunk::filled)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Cumulative overload-drop accounting. Survives [`resize`](Self::resize).
    #[must_use]
    pub fn drop_stats(&self) -> DropStats {
        self.drops
    }

    /// Read-only traversal from oldest to newest, for sanity checks.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// Return the chunk bytes should currently be copied into, allocating a
    /// fresh tail when the current one is full or absent. `None` only when
    /// `enforce_bound` is set and the bound has been reached.
    fn writable_tail(&mut self, enforce_bound: bool) -> Option<&mut Chunk> {
        if self.chunks.back().is_none_or(Chunk::is_full) {
            if enforce_bound && self.chunks.len() >= self.max_chunks {
                return None;
            }
            self.chunks.push_back(Chunk::with_capacity(self.chunk_size));
        }
        self.chunks.back_mut()
    }

    fn note_dropped(&mut self, len: usize) {
        self.drops.records += 1;
        self.drops.bytes += len as u64;
        if let Some(suppressed) = self.drop_warn.record() {
            warn!(
                "eventlog: chunk bound reached ({} chunks of {} bytes); \
                 dropped {} bytes ({} earlier drops suppressed, {} writes affected)",
                self.max_chunks, self.chunk_size, len, suppressed, self.drops.records
            );
        }
    }
}
