//! Shared vocabulary types for the delivery core

use std::fmt;
use std::sync::Arc;

/// Push-delivery callback invoked with one complete record's bytes.
///
/// Invoked outside the subsystem lock on a detached handle, so the callback
/// may safely call back into the context (e.g. introspection). It runs on
/// whichever producer thread delivered the record; keep it fast.
pub type RecordCallback = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// The currently active delivery mode.
///
/// Exactly one mode is active at any time; transitions happen only through
/// the context's sink-attachment operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// No delivery target; records are discarded silently.
    Disabled,
    /// Synchronous writes to an attached file.
    File,
    /// Synchronous push delivery to a user callback.
    Callback,
    /// Buffered delivery into the chunked pull queue.
    PullQueue,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SinkKind::Disabled => "disabled",
            SinkKind::File => "file",
            SinkKind::Callback => "callback",
            SinkKind::PullQueue => "pull-queue",
        };
        write!(f, "{name}")
    }
}

/// Cumulative overload-drop accounting for a pull queue.
///
/// Drops are silent to producers by design; these counters are the only
/// record that they happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropStats {
    /// Writes that lost at least one byte to the chunk bound.
    pub records: u64,
    /// Total bytes discarded.
    pub bytes: u64,
}
