//! Custom error types for the application.
//!
//! This module defines the primary error type, `QuestError`, using the
//! `thiserror` crate for a centralized and consistent taxonomy.
//!
//! ## Error Hierarchy
//!
//! - **`Fetch`**: the transport/auth layer failed while retrieving one of the
//!   three quest resources. Callers degrade the affected section to an empty
//!   view and log; a fetch failure never blocks rendering of the sections
//!   that succeeded.
//! - **`Decode`**: a record's payload does not match the shape its declared
//!   `type` promises. The offending record is dropped from every bucket and
//!   counted; the rest of the batch is unaffected.
//! - **`UnknownDatasetType`**: a record carried a tag outside the closed set.
//!   Treated exactly like a decode failure.
//! - **`Config`** / **`Io`** / **`Serialization`**: plumbing errors from the
//!   configuration, filesystem, and JSON layers.

use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, QuestError>;

#[derive(Error, Debug)]
pub enum QuestError {
    #[error("Fetch failure: {0}")]
    Fetch(String),

    #[error("Decode failure for {kind} record from {user_guid}: {reason}")]
    Decode {
        kind: String,
        user_guid: String,
        reason: String,
    },

    #[error("Unknown dataset type '{0}'")]
    UnknownDatasetType(String),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(String),
}

impl From<reqwest::Error> for QuestError {
    fn from(err: reqwest::Error) -> Self {
        QuestError::Fetch(err.to_string())
    }
}
