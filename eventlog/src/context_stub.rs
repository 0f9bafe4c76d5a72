//! # Event log context (tracing compiled out)
//!
//! When the `tracing` feature is disabled the whole delivery core is
//! compiled out, but callers must stay link-compatible: every operation
//! exists with the same signature and a safe no-op behavior — deliveries
//! vanish, introspection reports zero, and ownership passed in is handed
//! straight back so nothing is closed behind the caller's back.

use std::fs::File;

use crate::chunked_buffer::Chunk;
use crate::config::EventLogConfig;
use crate::domain::{DropStats, EventLogError, RecordCallback, SinkKind};

/// No-op stand-in for the delivery core. See the `tracing`-enabled
/// documentation for the real semantics.
pub struct EventLogContext {
    _private: (),
}

impl EventLogContext {
    /// Create a stub context. The configuration is ignored.
    ///
    /// # Errors
    /// Never fails; the `Result` mirrors the enabled signature.
    pub fn new(_config: EventLogConfig) -> Result<Self, EventLogError> {
        Ok(Self { _private: () })
    }

    /// Discards the record.
    pub fn deliver(&self, _record: &[u8]) {}

    /// No-op; the passed file is returned so the caller keeps ownership
    /// and the handle is not closed.
    ///
    /// # Errors
    /// Never fails.
    pub fn set_file_sink(
        &self,
        file: Option<File>,
        _close_previous: bool,
        _emit_header: bool,
    ) -> Result<Option<File>, EventLogError> {
        Ok(file)
    }

    /// No-op; the callback is dropped without ever being invoked.
    pub fn set_callback_sink(
        &self,
        _callback: Option<RecordCallback>,
        _close_previous: bool,
        _emit_header: bool,
    ) -> Option<File> {
        None
    }

    /// No-op.
    pub fn set_pull_sink(&self, _close_previous: bool, _emit_header: bool) -> Option<File> {
        None
    }

    /// No-op.
    pub fn disable(&self, _close_previous: bool) -> Option<File> {
        None
    }

    /// Always `None`.
    #[must_use]
    pub fn pop_chunk(&self) -> Option<Chunk> {
        None
    }

    /// No-op.
    pub fn resize_buffers(&self, _new_chunk_size: usize) {}

    /// Always [`SinkKind::Disabled`].
    #[must_use]
    pub fn sink_kind(&self) -> SinkKind {
        SinkKind::Disabled
    }

    /// Always 0.
    #[must_use]
    pub fn buffer_chunk_size(&self) -> usize {
        0
    }

    /// Always 0.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        0
    }

    /// Always 0.
    #[must_use]
    pub fn buffered_bytes(&self) -> u64 {
        0
    }

    /// Always zero.
    #[must_use]
    pub fn drop_stats(&self) -> DropStats {
        DropStats::default()
    }

    /// Always empty.
    #[must_use]
    pub fn header(&self) -> &[u8] {
        &[]
    }
}
