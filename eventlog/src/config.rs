//! Context configuration

use crate::domain::EventLogError;

/// Default chunk payload size: 2 MiB.
pub const DEFAULT_CHUNK_SIZE: usize = 2 * 1024 * 1024;

/// Default bound on outstanding (not yet popped) chunks.
///
/// Once the pull queue holds this many chunks, further writes are truncated
/// rather than allocating unboundedly: availability and bounded memory are
/// favored over completeness.
pub const DEFAULT_MAX_CHUNKS: usize = 128;

/// Configuration for an [`EventLogContext`](crate::EventLogContext).
#[derive(Debug, Clone)]
pub struct EventLogConfig {
    /// Payload capacity of each chunk in the pull queue.
    pub chunk_size: usize,

    /// Maximum number of outstanding chunks before writes are truncated.
    pub max_chunks: usize,

    /// Format preamble supplied by the encoding layer, written to a newly
    /// attached sink when the attachment requests it. The core never
    /// interprets these bytes. Empty means no header.
    pub header: Vec<u8>,
}

impl EventLogConfig {
    /// Checks the configuration for values that would make the pull queue
    /// inoperable.
    ///
    /// # Errors
    /// Returns an error if `chunk_size` is zero (writes could never make
    /// progress) or `max_chunks` is zero (no chunk could ever exist).
    pub fn validate(&self) -> Result<(), EventLogError> {
        if self.chunk_size == 0 {
            return Err(EventLogError::InvalidChunkSize(self.chunk_size));
        }
        if self.max_chunks == 0 {
            return Err(EventLogError::InvalidChunkBound(self.max_chunks));
        }
        Ok(())
    }
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_chunks: DEFAULT_MAX_CHUNKS,
            header: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EventLogConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = EventLogConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EventLogError::InvalidChunkSize(0))
        ));
    }

    #[test]
    fn test_zero_chunk_bound_rejected() {
        let config = EventLogConfig {
            max_chunks: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EventLogError::InvalidChunkBound(0))
        ));
    }
}
