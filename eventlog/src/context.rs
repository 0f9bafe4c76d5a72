//! # Event log context
//!
//! The explicit, injectable context object owning the delivery core: one
//! process-wide lock around the sink router. The host runtime creates it at
//! subsystem start, hands it to producers and the pull consumer, and drops
//! it at subsystem stop (after all producers have quiesced — the context
//! does not enforce that precondition).
//!
//! Concurrency model: plain OS threads and one `std::sync::Mutex`, no
//! async. Every operation takes the same lock; lock granularity alone
//! provides mutual exclusion across delivery, reconfiguration, resize, and
//! draining. Lock poisoning is recovered (`PoisonError::into_inner`), so a
//! panic on some unrelated producer thread can never make tracing panic
//! too.

use std::fs::File;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::chunked_buffer::Chunk;
use crate::config::EventLogConfig;
use crate::domain::{DropStats, EventLogError, RecordCallback, SinkKind};
use crate::sink::SinkRouter;

/// Buffering-and-delivery core for one tracing subsystem instance.
///
/// Producers call [`deliver`](Self::deliver) concurrently; a pull consumer
/// polls [`pop_chunk`](Self::pop_chunk). All delivery operations complete
/// or silently degrade — they never return errors and never panic.
pub struct EventLogContext {
    router: Mutex<SinkRouter>,
    /// Format preamble supplied by the encoding layer; treated as opaque.
    header: Vec<u8>,
}

impl EventLogContext {
    /// Create a context in the Disabled state.
    ///
    /// # Errors
    /// Returns an error when the configuration is unusable (zero chunk
    /// size or zero chunk bound).
    pub fn new(config: EventLogConfig) -> Result<Self, EventLogError> {
        config.validate()?;
        Ok(Self {
            router: Mutex::new(SinkRouter::new(&config)),
            header: config.header,
        })
    }

    /// Deliver one opaque, pre-serialized record to the active sink.
    ///
    /// - *File*: synchronous write under the lock (slow storage throttles
    ///   all producers).
    /// - *Callback*: invoked exactly once with the record bytes, on this
    ///   thread, **after** the lock is released — the callback may safely
    ///   call back into this context. Note that a callback delivering a
    ///   new record through this same context recurses.
    /// - *Pull queue*: buffered; subject to the bounded-drop policy.
    /// - *Disabled*: discarded silently.
    pub fn deliver(&self, record: &[u8]) {
        // The guard is a temporary: the lock is released before invocation.
        let callback = self.router().route(record);
        if let Some(callback) = callback {
            callback(record);
        }
    }

    /// Attach file delivery, or detach it with `None`.
    ///
    /// Returns the previously attached file when `close_previous` is
    /// false; drops (closes) it when true. `emit_header` writes the
    /// configured preamble to the new file — pass false when reattaching a
    /// file that already carries one.
    ///
    /// There is no non-detaching way to observe *which* file is attached
    /// ([`sink_kind`](Self::sink_kind) reveals only the mode): to inspect
    /// the handle, detach it with `close_previous = false` and reattach.
    ///
    /// # Errors
    /// Returns an error if writing the header to the new file fails; the
    /// previous sink then stays attached and the new file is closed.
    /// Producers never see this error.
    pub fn set_file_sink(
        &self,
        file: Option<File>,
        close_previous: bool,
        emit_header: bool,
    ) -> Result<Option<File>, EventLogError> {
        self.router().set_file(file, close_previous, emit_header, &self.header)
    }

    /// Attach push-callback delivery, or detach it with `None`.
    ///
    /// Returns the previously attached file per `close_previous` (see
    /// [`set_file_sink`](Self::set_file_sink)). `emit_header` pushes the
    /// configured preamble through the callback once, outside the lock.
    pub fn set_callback_sink(
        &self,
        callback: Option<RecordCallback>,
        close_previous: bool,
        emit_header: bool,
    ) -> Option<File> {
        let (previous, header_push) =
            self.router()
                .set_callback(callback, close_previous, emit_header, &self.header);
        if let Some(push) = header_push {
            push(&self.header);
        }
        previous
    }

    /// Attach pull-queue delivery: records are buffered in memory until the
    /// consumer drains them via [`pop_chunk`](Self::pop_chunk).
    ///
    /// `emit_header` places the configured preamble at the head of the
    /// fresh queue so the consumer pops it before any record. Returns the
    /// previously attached file per `close_previous`.
    pub fn set_pull_sink(&self, close_previous: bool, emit_header: bool) -> Option<File> {
        self.router().set_pull(close_previous, emit_header, &self.header)
    }

    /// Explicit transition to the Disabled state; subsequent deliveries
    /// are discarded. Returns the previously attached file per
    /// `close_previous`.
    pub fn disable(&self, close_previous: bool) -> Option<File> {
        self.router().disable(close_previous)
    }

    /// Retrieve the oldest full chunk from the pull queue, transferring
    /// ownership to the caller (dropping the chunk releases it).
    ///
    /// `None` is a normal result — no full chunk yet, or no pull queue
    /// active — and the consumer is expected to poll again later; there is
    /// no blocking wait. A partially filled tail is never returned.
    pub fn pop_chunk(&self) -> Option<Chunk> {
        self.router().pop_chunk()
    }

    /// Live reconfiguration of chunk granularity.
    ///
    /// An active pull queue is migrated chunk by chunk, preserving byte
    /// order and content exactly (peak memory temporarily doubles). The
    /// new size also applies to pull queues attached later. Zero is
    /// rejected with a warning.
    pub fn resize_buffers(&self, new_chunk_size: usize) {
        self.router().resize(new_chunk_size);
    }

    /// The currently active delivery mode.
    #[must_use]
    pub fn sink_kind(&self) -> SinkKind {
        self.router().kind()
    }

    /// Configured chunk granularity for the pull queue.
    #[must_use]
    pub fn buffer_chunk_size(&self) -> usize {
        self.router().chunk_size()
    }

    /// Number of outstanding chunks in the pull queue; 0 when no queue is
    /// active.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.router().chunk_count()
    }

    /// Undelivered bytes currently buffered in the pull queue.
    #[must_use]
    pub fn buffered_bytes(&self) -> u64 {
        self.router().buffered_bytes()
    }

    /// Cumulative overload-drop accounting for the active pull queue.
    #[must_use]
    pub fn drop_stats(&self) -> DropStats {
        self.router().drop_stats()
    }

    /// The configured format preamble.
    #[must_use]
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    fn router(&self) -> MutexGuard<'_, SinkRouter> {
        self.router.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
