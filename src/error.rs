//! Error types for atime-backup
//!
//! One enum covers the whole crate. The per-destination variants carry the
//! path that failed so a warning can name it without extra context.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for atime-backup operations
#[derive(Error, Debug)]
pub enum AutosaveError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors not tied to a backup step
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// The file to back up does not exist
    #[error("Source file missing: {}", path.display())]
    SourceMissing { path: PathBuf },

    /// A setting is absent, malformed, or out of range
    #[error("Setting '{key}' unavailable: {reason}")]
    SettingsUnavailable { key: &'static str, reason: String },

    /// The day-bucket directory could not be created
    #[error("Failed to create directory {}: {message}", path.display())]
    DirectoryCreateFailed { path: PathBuf, message: String },

    /// Copying the source to the plain target failed
    #[error("Failed to copy {} to {}: {message}", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },

    /// Renaming the plain target to the time-stamped name failed
    #[error("Failed to rename {} to {}: {message}", from.display(), to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },

    /// Evicting the oldest backup failed
    #[error("Failed to delete {}: {message}", path.display())]
    DeleteFailed { path: PathBuf, message: String },

    /// A backup directory was enumerated before it was created
    #[error("Directory not found: {}", path.display())]
    NotFound { path: PathBuf },
}

impl AutosaveError {
    /// Create a "settings unavailable" error for a key
    pub fn setting(key: &'static str, reason: impl Into<String>) -> Self {
        Self::SettingsUnavailable {
            key,
            reason: reason.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error belongs to a single destination's write
    ///
    /// These are logged and the cycle moves on to the next destination.
    pub fn is_destination_failure(&self) -> bool {
        matches!(
            self,
            Self::DirectoryCreateFailed { .. }
                | Self::CopyFailed { .. }
                | Self::RenameFailed { .. }
                | Self::DeleteFailed { .. }
                | Self::NotFound { .. }
        )
    }
}

impl From<std::io::Error> for AutosaveError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AutosaveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for atime-backup operations
pub type AutosaveResult<T> = Result<T, AutosaveError>;
