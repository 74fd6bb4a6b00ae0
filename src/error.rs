//! Error types for monitor enumeration and window placement.

use thiserror::Error;

/// Result type alias for screenkeep operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while querying displays or tracking a window.
#[derive(Debug, Error)]
pub enum Error {
    /// The hardware metadata source could not be queried at all.
    ///
    /// This is the only failure that aborts an enumeration.
    #[error("monitor metadata unavailable: {0}")]
    MetadataUnavailable(String),

    /// Platform-specific error.
    #[error("platform error: {0}")]
    Platform(String),

    /// The requested feature is not supported on this platform.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// A subscription token that is not (or no longer) registered.
    #[error("unknown subscription token {0}")]
    UnknownSubscription(u64),

    /// Thread-related error.
    #[error("thread error: {0}")]
    ThreadError(String),

    /// Serialization failure.
    #[cfg(feature = "serde")]
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other errors.
    #[error("{0}")]
    Other(String),
}
