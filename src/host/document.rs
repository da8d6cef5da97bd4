//! Document and clock collaborators
//!
//! The backup cycle asks the host which file is live and lets it flush that
//! file before copying. The CLI host has no editor, so [`FileDocument`] just
//! wraps a path.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::error::AutosaveResult;

/// Document name the host reports before the project was ever saved
pub const UNSAVED_DOCUMENT: &str = "Root";

/// The host application's view of the edited project
pub trait DocumentHost {
    /// Current document identity; [`UNSAVED_DOCUMENT`] when there is none
    fn current_document_name(&self) -> String;

    /// Live path of the file the engine backs up
    fn resolve_autosave_path(&self) -> PathBuf;

    /// Flush in-memory state to disk; failures are logged, never fatal
    fn save(&mut self) -> AutosaveResult<()>;
}

/// Source of the current local time
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in local time, matching the names artists see in their folders
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Document host backed by a plain file path
#[derive(Debug, Clone, Default)]
pub struct FileDocument {
    path: Option<PathBuf>,
}

impl FileDocument {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl DocumentHost for FileDocument {
    fn current_document_name(&self) -> String {
        match &self.path {
            Some(path) => path.to_string_lossy().into_owned(),
            None => UNSAVED_DOCUMENT.to_string(),
        }
    }

    fn resolve_autosave_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_default()
    }

    fn save(&mut self) -> AutosaveResult<()> {
        // the file on disk is already the latest state
        Ok(())
    }
}
