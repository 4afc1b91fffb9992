//! Error types for bridge operations

use thiserror::Error;

/// Errors that can occur while ingesting producer telemetry
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Segment not found (producer not running)
    #[error("Segment not found: {name}")]
    SegmentNotFound {
        /// Segment name
        name: String,
    },

    /// Permission denied
    #[error("Permission denied accessing segment: {name}")]
    PermissionDenied {
        /// Segment name
        name: String,
    },

    /// IO error while mapping the segment
    #[error("IO error: {source}")]
    Io {
        /// Source IO error
        #[from]
        source: std::io::Error,
    },

    /// Nix system call error
    #[error("System call error: {source}")]
    Sys {
        /// Source nix error
        #[from]
        source: nix::Error,
    },

    /// Frame failed markup parsing (routine under a torn read)
    #[error("Malformed frame: {source}")]
    MalformedFrame {
        /// Source parse error
        #[from]
        source: roxmltree::Error,
    },

    /// Record carries no `id` element, so it can never be matched again
    #[error("Sensor record has no id (tag: {tag})")]
    MissingId {
        /// Record type tag
        tag: String,
    },

    /// Record tag names no tracked sensor kind
    #[error("Unsupported sensor kind: {tag}")]
    UnsupportedKind {
        /// Record type tag
        tag: String,
    },

    /// Value text is not a decimal number
    #[error("Unparseable sensor value: {raw:?}")]
    UnparseableValue {
        /// Raw value text as read from the record
        raw: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;
