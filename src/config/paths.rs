//! Path management for atime-backup
//!
//! Resolves where the settings file lives and the per-user fallback root for
//! local backups.
//!
//! ## Path Resolution Order
//!
//! 1. `ATIME_BACKUP_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/atime-backup` or `~/.config/atime-backup`
//! 3. Windows: `%APPDATA%\atime-backup`

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::AutosaveError;

const APP_DIR: &str = "atime-backup";

/// Manages all paths used by atime-backup
#[derive(Debug, Clone)]
pub struct AutosavePaths {
    /// Directory holding the settings file
    base_dir: PathBuf,
    /// Local destination root used when `local_path` is unset
    local_fallback: PathBuf,
}

impl AutosavePaths {
    /// Create a new AutosavePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, AutosaveError> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| AutosaveError::Config("Could not determine home directory".into()))?;

        let base_dir = match std::env::var("ATIME_BACKUP_DIR") {
            Ok(custom) => PathBuf::from(custom),
            Err(_) => resolve_default_path(&base_dirs),
        };

        Ok(Self {
            base_dir,
            local_fallback: base_dirs.home_dir().join(".nuke"),
        })
    }

    /// Create AutosavePaths rooted in a custom directory (useful for testing)
    ///
    /// The local fallback root becomes `<base_dir>/.nuke`.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        let local_fallback = base_dir.join(".nuke");
        Self {
            base_dir,
            local_fallback,
        }
    }

    /// Get the base directory (~/.config/atime-backup/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }

    /// Root for local backups when the user has not configured one (~/.nuke)
    pub fn local_fallback(&self) -> &PathBuf {
        &self.local_fallback
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), AutosaveError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| AutosaveError::Io(format!("Failed to create base directory: {}", e)))
    }

    /// Check if atime-backup has been installed (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path(base_dirs: &BaseDirs) -> PathBuf {
    // Unix (Linux/macOS): XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| base_dirs.home_dir().join(".config"));
    config_base.join(APP_DIR)
}

#[cfg(windows)]
fn resolve_default_path(base_dirs: &BaseDirs) -> PathBuf {
    // %APPDATA%
    base_dirs.config_dir().join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AutosavePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("settings.json"));
        assert_eq!(paths.local_fallback(), &temp_dir.path().join(".nuke"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var("ATIME_BACKUP_DIR", custom_path);

        let paths = AutosavePaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());
        assert!(paths.local_fallback().ends_with(".nuke"));

        env::remove_var("ATIME_BACKUP_DIR");
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AutosavePaths::with_base_dir(temp_dir.path().join("nested"));

        assert!(!paths.is_initialized());
        paths.ensure_directories().unwrap();
        assert!(paths.base_dir().exists());
    }
}
