//! Error types for the fragment store.
//!
//! Backend-specific failures (`sqlx`, `object_store`) never leave this crate
//! as-is; they are flattened into [`StoreError`] so callers only ever match on
//! the facade's error kinds.

use std::fmt::{self, Display};

/// Which half of a backend pair an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Fragment metadata records
    Metadata,
    /// Fragment payload bytes
    Data,
}

impl Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Metadata => f.write_str("metadata"),
            StoreKind::Data => f.write_str("data"),
        }
    }
}

/// Errors that can occur when working with the fragment store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An underlying store rejected or failed an operation
    #[error("{store} store failed to {operation}: {message}")]
    Backend {
        store: StoreKind,
        operation: &'static str,
        message: String,
    },

    /// A persisted record could not be decoded
    #[error("corrupt {store} record {key}: {message}")]
    Corrupt {
        store: StoreKind,
        key: String,
        message: String,
    },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// S3 bucket not found - must be created before use
    #[error("S3 bucket '{0}' does not exist. Create it before starting the service.")]
    BucketNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn backend(store: StoreKind, operation: &'static str, err: impl Display) -> Self {
        StoreError::Backend {
            store,
            operation,
            message: err.to_string(),
        }
    }

    pub(crate) fn corrupt(store: StoreKind, key: impl Into<String>, err: impl Display) -> Self {
        StoreError::Corrupt {
            store,
            key: key.into(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
