//! Structured error types for the eventlog core
//!
//! Using thiserror for automatic Display implementation and error chaining.
//!
//! Only configuration operations surface errors (attaching a sink may fail
//! while emitting the format header). Producer-facing delivery never
//! returns an error and never panics: it completes or silently degrades.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventLogError {
    #[error("invalid chunk size {0}: must be non-zero")]
    InvalidChunkSize(usize),

    #[error("invalid chunk bound {0}: must allow at least one chunk")]
    InvalidChunkBound(usize),

    #[error("failed to emit format header to new sink")]
    HeaderEmit(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_chunk_size_display() {
        let err = EventLogError::InvalidChunkSize(0);
        assert_eq!(err.to_string(), "invalid chunk size 0: must be non-zero");
    }

    #[test]
    fn test_header_emit_preserves_source() {
        use std::error::Error as _;
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = EventLogError::HeaderEmit(io);
        assert!(err.to_string().contains("format header"));
        assert!(err.source().is_some_and(|s| s.to_string() == "disk full"));
    }
}
