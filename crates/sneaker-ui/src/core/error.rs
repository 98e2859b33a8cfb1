//! # Design
//!
//! - Keep error messages constant; carry the storage key and operation as fields.
//! - Preserve serde sources without interpolating them into the message.
//! - These errors stay internal to the utilities: callers see outcomes, not failures.

use thiserror::Error;

/// Result type for key-value storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by [`KeyValueStore`](crate::core::storage::KeyValueStore) backends
/// and the JSON layer above them.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage area could not be reached (private mode, disabled storage).
    #[error("storage unavailable")]
    Unavailable {
        /// Operation that needed the storage area.
        operation: &'static str,
    },
    /// The backend rejected a read or write.
    #[error("storage backend failure")]
    Backend {
        /// Operation that failed.
        operation: &'static str,
        /// Key involved in the failure.
        key: String,
        /// Backend-provided detail (for example a quota message).
        detail: String,
    },
    /// Serializing a value before storing it failed.
    #[error("storage serialize failure")]
    Serialize {
        /// Key the value was destined for.
        key: String,
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Operation name associated with the failure, for log fields.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Unavailable { operation } | Self::Backend { operation, .. } => *operation,
            Self::Serialize { .. } => "serialize",
        }
    }
}

/// Errors raised while loading [`UiConfig`](crate::core::config::UiConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document was not valid JSON for the expected shape.
    #[error("config parse failure")]
    Parse {
        /// Underlying serde error.
        source: serde_json::Error,
    },
    /// The configuration could not be rendered as JSON.
    #[error("config render failure")]
    Render {
        /// Underlying serde error.
        source: serde_json::Error,
    },
}
