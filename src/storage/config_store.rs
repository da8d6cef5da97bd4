//! Key/value configuration stores
//!
//! [`ConfigStore`] is the seam to the host's preference storage. The CLI
//! host persists it as one flat JSON object; tests use the in-memory store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::settings::{SettingKey, SettingValue};
use crate::error::AutosaveResult;

use super::file_io::{read_json, write_json_atomic};

/// Typed get/set by key, persisted by the host
pub trait ConfigStore {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: SettingKey) -> Option<SettingValue>;

    /// Write a value and persist it
    fn set(&mut self, key: SettingKey, value: SettingValue) -> AutosaveResult<()>;
}

/// Settings file backed store
///
/// Every `set` rewrites the file atomically. Unknown keys in the file are
/// preserved.
#[derive(Debug)]
pub struct JsonConfigStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonConfigStore {
    /// Load the store from `path`; a missing file is an empty store
    pub fn open(path: impl AsRef<Path>) -> AutosaveResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = read_json(&path)?;
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current values to disk
    pub fn save(&self) -> AutosaveResult<()> {
        write_json_atomic(&self.path, &self.values)
    }
}

impl ConfigStore for JsonConfigStore {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        let value = self.values.get(key.as_str())?;
        Some(match value {
            Value::Null => return None,
            Value::Bool(b) => SettingValue::Bool(*b),
            Value::String(s) => SettingValue::Text(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SettingValue::Int(i),
                None => SettingValue::Text(n.to_string()),
            },
            // arrays and objects surface as text so the typed read rejects them
            other => SettingValue::Text(other.to_string()),
        })
    }

    fn set(&mut self, key: SettingKey, value: SettingValue) -> AutosaveResult<()> {
        let json = match value {
            SettingValue::Bool(b) => Value::Bool(b),
            SettingValue::Int(i) => Value::from(i),
            SettingValue::Text(s) => Value::String(s),
        };
        self.values.insert(key.as_str().to_string(), json);
        self.save()
    }
}

/// In-process store with no persistence
#[derive(Debug, Default, Clone)]
pub struct MemoryConfigStore {
    values: BTreeMap<SettingKey, SettingValue>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        self.values.get(&key).cloned()
    }

    fn set(&mut self, key: SettingKey, value: SettingValue) -> AutosaveResult<()> {
        self.values.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonConfigStore::open(temp_dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get(SettingKey::Enabled), None);
    }

    #[test]
    fn test_set_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");

        let mut store = JsonConfigStore::open(&path).unwrap();
        store
            .set(SettingKey::IntervalMinutes, SettingValue::Int(30))
            .unwrap();
        store
            .set(SettingKey::LocalPath, SettingValue::Text("/mnt/bk".into()))
            .unwrap();

        let reopened = JsonConfigStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(SettingKey::IntervalMinutes),
            Some(SettingValue::Int(30))
        );
        assert_eq!(
            reopened.get(SettingKey::LocalPath),
            Some(SettingValue::Text("/mnt/bk".into()))
        );
    }

    #[test]
    fn test_odd_values_surface_as_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"interval_minutes": 2.5, "enabled": null, "other": [1], "local_enabled": false}"#,
        )
        .unwrap();

        let store = JsonConfigStore::open(&path).unwrap();
        assert_eq!(
            store.get(SettingKey::IntervalMinutes),
            Some(SettingValue::Text("2.5".into()))
        );
        assert_eq!(store.get(SettingKey::Enabled), None);
        assert_eq!(
            store.get(SettingKey::LocalEnabled),
            Some(SettingValue::Bool(false))
        );
    }

    #[test]
    fn test_unknown_keys_survive_writes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let mut store = JsonConfigStore::open(&path).unwrap();
        store.set(SettingKey::Enabled, SettingValue::Bool(false)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("theme"));
        assert!(contents.contains("enabled"));
    }
}
