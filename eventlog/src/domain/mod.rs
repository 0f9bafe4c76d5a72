//! Domain model for the eventlog core
//!
//! Shared vocabulary types and structured errors used across the buffer,
//! router, and context layers.

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{DropStats, RecordCallback, SinkKind};

pub use errors::EventLogError;
