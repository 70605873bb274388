//! Error types for Lockstage
//!
//! All modules use `LockstageResult<T>` as their return type. Staging
//! irregularities (missing source, failed copy) are not errors here: they are
//! reported through [`crate::staging::Outcome`]. Errors cover configuration,
//! the cache backend and publishing pipeline outputs.

use crate::staging::FailureReason;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Lockstage operations
pub type LockstageResult<T> = Result<T, LockstageError>;

/// All errors that can occur in Lockstage
#[derive(Error, Debug)]
pub enum LockstageError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    // Staging errors
    #[error("{0}")]
    Staging(FailureReason),

    // Cache backend errors
    #[error("Cache restore failed for {dependency_path}: {reason}")]
    CacheRestore {
        dependency_path: String,
        reason: String,
    },

    // Pipeline output errors
    #[error("Invalid value for output {name}: {reason}")]
    OutputValue { name: String, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl LockstageError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a cache restore error
    pub fn cache_restore(dependency_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CacheRestore {
            dependency_path: dependency_path.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigInvalid { .. } => Some("Run: lockstage config show"),
            Self::InvalidSetting { .. } => {
                Some("Prefixes must be non-empty and must not contain path separators")
            }
            Self::Staging(FailureReason::SourceNotFound { .. }) => {
                Some("The manifest path is resolved against --source-root")
            }
            Self::CacheRestore { .. } => Some("Re-run with --no-restore to stage the manifest only"),
            _ => None,
        }
    }
}
