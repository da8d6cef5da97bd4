//! Retention for one day-bucket directory
//!
//! Counts the copies in a backup folder and evicts the single oldest one when
//! the folder holds more than the ceiling. One write adds at most one file,
//! so one eviction per call keeps the folder bounded.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::info;

use crate::error::{AutosaveError, AutosaveResult};

/// A regular file found in a backup directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub path: PathBuf,
    pub file_name: String,
    /// Creation time, or modification time where the platform has none
    pub created: SystemTime,
    pub size_bytes: u64,
}

/// Retention policy bound to one backup directory
#[derive(Debug, Clone)]
pub struct RetentionManager {
    directory: PathBuf,
    ceiling: usize,
}

impl RetentionManager {
    /// Bind a ceiling to a day-bucket directory
    pub fn new(directory: impl Into<PathBuf>, ceiling: usize) -> Self {
        Self {
            directory: directory.into(),
            ceiling,
        }
    }

    /// The day-bucket directory being managed
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Maximum number of copies kept
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Regular files in the directory, oldest first
    ///
    /// Equal creation times are ordered by file name so eviction is
    /// deterministic. Subdirectories and symlinks are skipped.
    pub fn list(&self) -> AutosaveResult<Vec<BackupEntry>> {
        let read_dir = fs::read_dir(&self.directory).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                AutosaveError::NotFound {
                    path: self.directory.clone(),
                }
            } else {
                AutosaveError::Io(format!(
                    "Failed to read backup directory {}: {}",
                    self.directory.display(),
                    e
                ))
            }
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| {
                AutosaveError::Io(format!("Failed to read directory entry: {}", e))
            })?;

            let metadata = entry.metadata().map_err(|e| {
                AutosaveError::Io(format!(
                    "Failed to read metadata for {}: {}",
                    entry.path().display(),
                    e
                ))
            })?;
            if !metadata.is_file() {
                continue;
            }

            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .map_err(|e| {
                    AutosaveError::Io(format!(
                        "No timestamp for {}: {}",
                        entry.path().display(),
                        e
                    ))
                })?;

            entries.push(BackupEntry {
                path: entry.path(),
                file_name: entry.file_name().to_string_lossy().into_owned(),
                created,
                size_bytes: metadata.len(),
            });
        }

        sort_oldest_first(&mut entries);
        Ok(entries)
    }

    /// Number of regular files in the directory
    pub fn count(&self) -> AutosaveResult<usize> {
        Ok(self.list()?.len())
    }

    /// The file with the smallest creation time
    pub fn oldest(&self) -> AutosaveResult<Option<PathBuf>> {
        Ok(self.list()?.into_iter().next().map(|entry| entry.path))
    }

    /// Delete the oldest copy if the directory is over the ceiling
    ///
    /// Removes at most one file and returns its path.
    pub fn enforce(&self) -> AutosaveResult<Option<PathBuf>> {
        let Some(oldest) = eviction_candidate(self.list()?, self.ceiling) else {
            return Ok(None);
        };

        fs::remove_file(&oldest.path).map_err(|e| AutosaveError::DeleteFailed {
            path: oldest.path.clone(),
            message: e.to_string(),
        })?;

        info!(path = %oldest.path.display(), ceiling = self.ceiling, "evicted oldest backup");
        Ok(Some(oldest.path))
    }
}

/// Order entries by creation time, then by file name
pub fn sort_oldest_first(entries: &mut [BackupEntry]) {
    entries.sort_by(|a, b| {
        a.created
            .cmp(&b.created)
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
}

/// The entry to evict from an oldest-first listing, if it exceeds `ceiling`
fn eviction_candidate(entries: Vec<BackupEntry>, ceiling: usize) -> Option<BackupEntry> {
    if entries.len() <= ceiling {
        return None;
    }
    entries.into_iter().next()
}
