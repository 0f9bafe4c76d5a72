//! # Sink routing
//!
//! The single point of control for where delivered records go. Exactly one
//! delivery target is active at a time; transitions happen only through the
//! attachment operations, which atomically swap the target under the
//! subsystem lock (held by [`EventLogContext`](crate::EventLogContext)).
//!
//! Per-mode backpressure policy:
//!
//! - **File**: the synchronous OS write is the backpressure — slow storage
//!   throttles every producer for the duration of the call, since all
//!   producers share the one lock.
//! - **Callback**: no buffering; the router hands a detached callback
//!   handle back to the context, which invokes it after releasing the
//!   lock.
//! - **Pull queue**: the only mode decoupling producer latency from
//!   consumer speed, at the cost of the buffer's bounded-drop policy.
//! - **Disabled**: records are discarded silently.

use std::fs::File;
use std::io::Write;
use std::sync::Arc;

use log::{debug, warn};

use crate::chunked_buffer::{Chunk, ChunkedBuffer};
use crate::config::EventLogConfig;
use crate::diagnostics::RateLimited;
use crate::domain::{DropStats, EventLogError, RecordCallback, SinkKind};

/// The active delivery target. Owns the attached resource.
enum SinkTarget {
    Disabled,
    File(File),
    Callback(RecordCallback),
    PullQueue(ChunkedBuffer),
}

/// Routes each delivered record to the active target and owns the sink
/// state machine. Not internally synchronized; the context serializes all
/// access through its lock.
pub(crate) struct SinkRouter {
    target: SinkTarget,
    /// Chunk granularity used when a pull queue is (re)attached.
    chunk_size: usize,
    max_chunks: usize,
    io_warn: RateLimited,
}

impl SinkRouter {
    pub(crate) fn new(config: &EventLogConfig) -> Self {
        Self {
            target: SinkTarget::Disabled,
            chunk_size: config.chunk_size,
            max_chunks: config.max_chunks,
            io_warn: RateLimited::default(),
        }
    }

    /// Route one record to the active target.
    ///
    /// Returns a detached callback handle when the record must be pushed to
    /// a user callback; the caller invokes it after releasing the lock.
    /// Never fails and never panics: a file write error loses the record
    /// with a rate-limited warning, the sink stays attached.
    pub(crate) fn route(&mut self, record: &[u8]) -> Option<RecordCallback> {
        match &mut self.target {
            SinkTarget::Disabled => None,
            SinkTarget::File(file) => {
                if let Err(err) = file.write_all(record) {
                    if let Some(suppressed) = self.io_warn.record() {
                        let total = self.io_warn.total();
                        warn!(
                            "eventlog: file sink write failed, record lost \
                             ({suppressed} earlier failures suppressed, \
                             {total} total): {err}"
                        );
                    }
                }
                None
            }
            SinkTarget::Callback(callback) => Some(Arc::clone(callback)),
            SinkTarget::PullQueue(buffer) => {
                buffer.write(record);
                None
            }
        }
    }

    /// Attach file delivery (or detach with `None`).
    ///
    /// The previous target is released first; a previously attached file is
    /// returned to the caller when `close_previous` is false so it can be
    /// reattached later, and dropped (closed) when true. With `emit_header`
    /// the configured preamble is written to the new file before it becomes
    /// the target; callers reattaching a sink that already carries a header
    /// pass false to avoid duplicating it.
    ///
    /// On a header-write failure the previous target stays attached and
    /// untouched, the new file is closed, and the error is surfaced to the
    /// configurator only.
    pub(crate) fn set_file(
        &mut self,
        mut file: Option<File>,
        close_previous: bool,
        emit_header: bool,
        header: &[u8],
    ) -> Result<Option<File>, EventLogError> {
        // Header first: the current target must not be detached (possibly
        // losing a kept handle) until the new file is known to be usable.
        if let Some(file) = file.as_mut() {
            if emit_header && !header.is_empty() {
                file.write_all(header).map_err(EventLogError::HeaderEmit)?;
            }
        }
        let previous = self.detach(close_previous);
        if let Some(file) = file {
            self.target = SinkTarget::File(file);
        }
        Ok(previous)
    }

    /// Attach push-callback delivery (or detach with `None`).
    ///
    /// Returns the previously attached file (per `close_previous`, as in
    /// [`set_file`](Self::set_file)) and, when `emit_header` applies, a
    /// detached handle the caller must invoke with the header bytes after
    /// releasing the lock.
    pub(crate) fn set_callback(
        &mut self,
        callback: Option<RecordCallback>,
        close_previous: bool,
        emit_header: bool,
        header: &[u8],
    ) -> (Option<File>, Option<RecordCallback>) {
        let previous = self.detach(close_previous);
        let mut header_push = None;
        if let Some(callback) = callback {
            if emit_header && !header.is_empty() {
                header_push = Some(Arc::clone(&callback));
            }
            self.target = SinkTarget::Callback(callback);
        }
        (previous, header_push)
    }

    /// Attach a fresh pull queue sized per the configured granularity.
    ///
    /// With `emit_header` the preamble becomes the first bytes in the
    /// queue, so the consumer pops it ahead of any record.
    pub(crate) fn set_pull(&mut self, close_previous: bool, emit_header: bool, header: &[u8]) -> Option<File> {
        let previous = self.detach(close_previous);
        let mut buffer = ChunkedBuffer::new(self.chunk_size, self.max_chunks);
        if emit_header && !header.is_empty() {
            buffer.write(header);
        }
        self.target = SinkTarget::PullQueue(buffer);
        previous
    }

    /// Explicit transition to Disabled, releasing the previous target.
    pub(crate) fn disable(&mut self, close_previous: bool) -> Option<File> {
        self.detach(close_previous)
    }

    /// Pop the oldest full chunk from the pull queue.
    ///
    /// Defensive when no pull queue is active: `None` plus a debug
    /// diagnostic, never a fault visible to the caller.
    pub(crate) fn pop_chunk(&mut self) -> Option<Chunk> {
        match &mut self.target {
            SinkTarget::PullQueue(buffer) => buffer.pop_chunk(),
            _ => {
                debug!("eventlog: pop_chunk with no pull queue active");
                None
            }
        }
    }

    /// Update the chunk granularity, migrating the live pull queue (if
    /// any) without losing or reordering bytes.
    pub(crate) fn resize(&mut self, new_chunk_size: usize) {
        if new_chunk_size == 0 {
            warn!("eventlog: ignoring resize to zero chunk size");
            return;
        }
        self.chunk_size = new_chunk_size;
        if let SinkTarget::PullQueue(buffer) = &mut self.target {
            buffer.resize(new_chunk_size);
        }
    }

    pub(crate) fn kind(&self) -> SinkKind {
        match self.target {
            SinkTarget::Disabled => SinkKind::Disabled,
            SinkTarget::File(_) => SinkKind::File,
            SinkTarget::Callback(_) => SinkKind::Callback,
            SinkTarget::PullQueue(_) => SinkKind::PullQueue,
        }
    }

    pub(crate) fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub(crate) fn chunk_count(&self) -> usize {
        match &self.target {
            SinkTarget::PullQueue(buffer) => buffer.chunk_count(),
            _ => {
                debug!("eventlog: chunk_count with no pull queue active");
                0
            }
        }
    }

    pub(crate) fn buffered_bytes(&self) -> u64 {
        match &self.target {
            SinkTarget::PullQueue(buffer) => buffer.buffered_bytes(),
            _ => 0,
        }
    }

    pub(crate) fn drop_stats(&self) -> DropStats {
        match &self.target {
            SinkTarget::PullQueue(buffer) => buffer.drop_stats(),
            _ => DropStats::default(),
        }
    }

    /// Swap the target back to Disabled and release the previous resource.
    ///
    /// A file is the only resource that can outlive its attachment: it is
    /// handed back when `close_previous` is false. A pull queue is torn
    /// down either way (the router holds exactly one target, and a
    /// detached queue could never be polled again); undelivered bytes are
    /// reported before the discard when the caller asked to keep them.
    fn detach(&mut self, close_previous: bool) -> Option<File> {
        match std::mem::replace(&mut self.target, SinkTarget::Disabled) {
            SinkTarget::Disabled | SinkTarget::Callback(_) => None,
            SinkTarget::File(file) => {
                if close_previous {
                    None // dropped here, closing the handle
                } else {
                    Some(file)
                }
            }
            SinkTarget::PullQueue(buffer) => {
                let undelivered = buffer.buffered_bytes();
                if !close_previous && undelivered > 0 {
                    warn!(
                        "eventlog: discarding pull queue with {undelivered} undelivered bytes"
                    );
                }
                None
            }
        }
    }
}
