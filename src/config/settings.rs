//! User settings for atime-backup
//!
//! The host owns a flat key/value store. A [`Settings`] value is a snapshot of
//! that store taken once at the start of a cycle, so a cycle never sees a
//! setting change halfway through. Writes go straight to the store through
//! the `set_*` functions.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AutosaveError, AutosaveResult};
use crate::storage::ConfigStore;

/// Format of the persisted checkpoint timestamp
pub const CHECKPOINT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DEFAULT_ENABLED: bool = true;
pub const DEFAULT_INTERVAL_MINUTES: i64 = 15;
pub const DEFAULT_RETENTION_CEILING: usize = 10;
pub const DEFAULT_LOCAL_ENABLED: bool = false;

/// Keys recognized in the host configuration store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingKey {
    Enabled,
    IntervalMinutes,
    RetentionCeiling,
    LocalEnabled,
    LocalPath,
    CheckpointTime,
    /// Live path of the file to back up (CLI host only)
    AutosavePath,
}

impl SettingKey {
    pub const ALL: [SettingKey; 7] = [
        SettingKey::Enabled,
        SettingKey::IntervalMinutes,
        SettingKey::RetentionCeiling,
        SettingKey::LocalEnabled,
        SettingKey::LocalPath,
        SettingKey::CheckpointTime,
        SettingKey::AutosavePath,
    ];

    /// Key name as stored
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::Enabled => "enabled",
            SettingKey::IntervalMinutes => "interval_minutes",
            SettingKey::RetentionCeiling => "retention_ceiling",
            SettingKey::LocalEnabled => "local_enabled",
            SettingKey::LocalPath => "local_path",
            SettingKey::CheckpointTime => "checkpoint_time",
            SettingKey::AutosavePath => "autosave_path",
        }
    }

    /// Value written by [`install`] when the key is absent
    fn default_value(self) -> Option<SettingValue> {
        match self {
            SettingKey::Enabled => Some(SettingValue::Bool(DEFAULT_ENABLED)),
            SettingKey::IntervalMinutes => Some(SettingValue::Int(DEFAULT_INTERVAL_MINUTES)),
            SettingKey::RetentionCeiling => {
                Some(SettingValue::Int(DEFAULT_RETENTION_CEILING as i64))
            }
            SettingKey::LocalEnabled => Some(SettingValue::Bool(DEFAULT_LOCAL_ENABLED)),
            SettingKey::LocalPath | SettingKey::CheckpointTime | SettingKey::AutosavePath => None,
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value in the configuration store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Int(i) => write!(f, "{}", i),
            SettingValue::Text(s) => f.write_str(s),
        }
    }
}

/// Snapshot of the backup settings for one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Whether timed backups are enabled at all
    pub enabled: bool,
    /// Minutes between two backup cycles
    pub interval_minutes: i64,
    /// Maximum copies kept in one day-bucket directory
    pub retention_ceiling: usize,
    /// Whether the local destination receives copies
    pub local_enabled: bool,
    /// User-configured local root; `None` means use the fallback
    pub local_path: Option<PathBuf>,
    /// Raw checkpoint string as stored (`%Y-%m-%d %H:%M:%S`)
    pub checkpoint: Option<String>,
    /// Live source path, when the store carries one
    pub autosave_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_ENABLED,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            retention_ceiling: DEFAULT_RETENTION_CEILING,
            local_enabled: DEFAULT_LOCAL_ENABLED,
            local_path: None,
            checkpoint: None,
            autosave_path: None,
        }
    }
}

impl Settings {
    /// Read every setting from the store
    ///
    /// Malformed values are logged and replaced by their default. The
    /// checkpoint is kept raw; the gate decides what to do with it.
    pub fn snapshot(store: &dyn ConfigStore) -> Self {
        let enabled = or_default(read_bool(store, SettingKey::Enabled), DEFAULT_ENABLED);
        let interval_minutes = or_default(
            read_int(store, SettingKey::IntervalMinutes).and_then(|v| match v {
                Some(i) if i < 0 => Err(AutosaveError::setting(
                    SettingKey::IntervalMinutes.as_str(),
                    format!("must not be negative, got {}", i),
                )),
                other => Ok(other),
            }),
            DEFAULT_INTERVAL_MINUTES,
        );
        let retention_ceiling = or_default(
            read_int(store, SettingKey::RetentionCeiling).and_then(|v| match v {
                Some(i) if i < 1 => Err(AutosaveError::setting(
                    SettingKey::RetentionCeiling.as_str(),
                    format!("must be at least 1, got {}", i),
                )),
                other => Ok(other.map(|i| i as usize)),
            }),
            DEFAULT_RETENTION_CEILING,
        );
        let local_enabled = or_default(
            read_bool(store, SettingKey::LocalEnabled),
            DEFAULT_LOCAL_ENABLED,
        );

        Self {
            enabled,
            interval_minutes,
            retention_ceiling,
            local_enabled,
            local_path: read_path(store, SettingKey::LocalPath),
            checkpoint: read_text(store, SettingKey::CheckpointTime).ok().flatten(),
            autosave_path: read_path(store, SettingKey::AutosavePath),
        }
    }

    /// Root directory of the local destination
    pub fn local_root(&self, fallback: &Path) -> PathBuf {
        self.local_path
            .clone()
            .unwrap_or_else(|| fallback.to_path_buf())
    }
}

/// Seed defaults for every absent key and set the checkpoint to `now`
pub fn install(store: &mut dyn ConfigStore, now: NaiveDateTime) -> AutosaveResult<()> {
    for key in SettingKey::ALL {
        if store.get(key).is_some() {
            continue;
        }
        if let Some(value) = key.default_value() {
            store.set(key, value)?;
        }
    }
    set_checkpoint(store, now)
}

pub fn set_checkpoint(store: &mut dyn ConfigStore, now: NaiveDateTime) -> AutosaveResult<()> {
    store.set(
        SettingKey::CheckpointTime,
        SettingValue::Text(now.format(CHECKPOINT_FORMAT).to_string()),
    )
}

pub fn set_enabled(store: &mut dyn ConfigStore, enabled: bool) -> AutosaveResult<()> {
    store.set(SettingKey::Enabled, SettingValue::Bool(enabled))
}

pub fn set_local_enabled(store: &mut dyn ConfigStore, enabled: bool) -> AutosaveResult<()> {
    store.set(SettingKey::LocalEnabled, SettingValue::Bool(enabled))
}

pub fn set_local_path(store: &mut dyn ConfigStore, path: &Path) -> AutosaveResult<()> {
    store.set(
        SettingKey::LocalPath,
        SettingValue::Text(path.to_string_lossy().into_owned()),
    )
}

pub fn set_autosave_path(store: &mut dyn ConfigStore, path: &Path) -> AutosaveResult<()> {
    store.set(
        SettingKey::AutosavePath,
        SettingValue::Text(path.to_string_lossy().into_owned()),
    )
}

pub fn set_interval_minutes(store: &mut dyn ConfigStore, minutes: i64) -> AutosaveResult<()> {
    if minutes < 0 {
        return Err(AutosaveError::setting(
            SettingKey::IntervalMinutes.as_str(),
            "must not be negative",
        ));
    }
    store.set(SettingKey::IntervalMinutes, SettingValue::Int(minutes))
}

pub fn set_retention_ceiling(store: &mut dyn ConfigStore, ceiling: usize) -> AutosaveResult<()> {
    if ceiling == 0 {
        return Err(AutosaveError::setting(
            SettingKey::RetentionCeiling.as_str(),
            "must be at least 1",
        ));
    }
    store.set(SettingKey::RetentionCeiling, SettingValue::Int(ceiling as i64))
}

fn or_default<T: fmt::Debug>(value: AutosaveResult<Option<T>>, default: T) -> T {
    match value {
        Ok(Some(v)) => v,
        Ok(None) => default,
        Err(e) => {
            warn!(error = %e, default = ?default, "using default setting");
            default
        }
    }
}

fn read_bool(store: &dyn ConfigStore, key: SettingKey) -> AutosaveResult<Option<bool>> {
    match store.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| AutosaveError::setting(key.as_str(), format!("expected a boolean, got '{}'", value))),
    }
}

fn read_int(store: &dyn ConfigStore, key: SettingKey) -> AutosaveResult<Option<i64>> {
    match store.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_int()
            .map(Some)
            .ok_or_else(|| AutosaveError::setting(key.as_str(), format!("expected an integer, got '{}'", value))),
    }
}

fn read_text(store: &dyn ConfigStore, key: SettingKey) -> AutosaveResult<Option<String>> {
    match store.get(key) {
        None => Ok(None),
        Some(SettingValue::Text(s)) => Ok(Some(s)),
        Some(value) => Err(AutosaveError::setting(
            key.as_str(),
            format!("expected a string, got '{}'", value),
        )),
    }
}

/// Empty strings count as unset
fn read_path(store: &dyn ConfigStore, key: SettingKey) -> Option<PathBuf> {
    match read_text(store, key) {
        Ok(Some(s)) if !s.trim().is_empty() => Some(PathBuf::from(s)),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "ignoring setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryConfigStore;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::snapshot(&MemoryConfigStore::new());
        assert_eq!(settings, Settings::default());
        assert!(settings.enabled);
        assert_eq!(settings.interval_minutes, 15);
        assert_eq!(settings.retention_ceiling, 10);
        assert!(!settings.local_enabled);
    }

    #[test]
    fn test_install_seeds_defaults_and_checkpoint() {
        let mut store = MemoryConfigStore::new();
        set_interval_minutes(&mut store, 5).unwrap();

        install(&mut store, at(9, 3, 7)).unwrap();

        assert_eq!(store.get(SettingKey::Enabled), Some(SettingValue::Bool(true)));
        // an existing value survives install
        assert_eq!(store.get(SettingKey::IntervalMinutes), Some(SettingValue::Int(5)));
        assert_eq!(
            store.get(SettingKey::CheckpointTime),
            Some(SettingValue::Text("2024-01-05 09:03:07".into()))
        );
        assert_eq!(store.get(SettingKey::LocalPath), None);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let mut store = MemoryConfigStore::new();
        store
            .set(SettingKey::IntervalMinutes, SettingValue::Text("soon".into()))
            .unwrap();
        store
            .set(SettingKey::RetentionCeiling, SettingValue::Int(0))
            .unwrap();
        store
            .set(SettingKey::Enabled, SettingValue::Int(1))
            .unwrap();

        let settings = Settings::snapshot(&store);
        assert_eq!(settings.interval_minutes, DEFAULT_INTERVAL_MINUTES);
        assert_eq!(settings.retention_ceiling, DEFAULT_RETENTION_CEILING);
        assert!(settings.enabled);
    }

    #[test]
    fn test_local_root_fallback() {
        let mut store = MemoryConfigStore::new();
        let fallback = Path::new("/home/artist/.nuke");

        store
            .set(SettingKey::LocalPath, SettingValue::Text(String::new()))
            .unwrap();
        assert_eq!(Settings::snapshot(&store).local_root(fallback), fallback);

        set_local_path(&mut store, Path::new("/mnt/backups")).unwrap();
        assert_eq!(
            Settings::snapshot(&store).local_root(fallback),
            PathBuf::from("/mnt/backups")
        );
    }

    #[test]
    fn test_setters_reject_out_of_range() {
        let mut store = MemoryConfigStore::new();
        assert!(set_retention_ceiling(&mut store, 0).is_err());
        assert!(set_interval_minutes(&mut store, -1).is_err());
        assert!(store.get(SettingKey::RetentionCeiling).is_none());
    }

    #[test]
    fn test_setting_value_serde() {
        let values: Vec<SettingValue> = serde_json::from_str(r#"[true, 15, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                SettingValue::Bool(true),
                SettingValue::Int(15),
                SettingValue::Text("x".into())
            ]
        );
    }
}
