//! Configuration module for atime-backup
//!
//! This module provides:
//! - Path resolution for the settings file and the local fallback root
//! - The settings snapshot read from the host key/value store

pub mod paths;
pub mod settings;

pub use paths::AutosavePaths;
pub use settings::{SettingKey, SettingValue, Settings};
