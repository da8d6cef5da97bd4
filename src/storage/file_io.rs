//! Settings file persistence
//!
//! The settings store is one flat JSON object. Reads treat a missing file as
//! an empty store; writes go through a sibling temp file so a crash leaves
//! either the old settings or the new ones on disk.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::AutosaveError;

/// Load the settings file, or `T::default()` before the first `init`
pub fn read_json<T, P>(path: P) -> Result<T, AutosaveError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| {
        AutosaveError::Io(format!("Cannot open settings file {}: {}", path.display(), e))
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        AutosaveError::Config(format!(
            "Settings file {} is not a JSON object: {}",
            path.display(),
            e
        ))
    })
}

/// Replace the settings file with `data`
///
/// Writes `settings.json.tmp`, syncs it, then renames it over the live file.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), AutosaveError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AutosaveError::Io(format!(
                "Cannot create settings directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let staged = path.with_extension("json.tmp");
    let file = File::create(&staged).map_err(|e| {
        AutosaveError::Io(format!("Cannot stage settings at {}: {}", staged.display(), e))
    })?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| AutosaveError::Json(format!("Cannot encode settings: {}", e)))?;
    writer
        .flush()
        .and_then(|_| writer.get_ref().sync_all())
        .map_err(|e| AutosaveError::Io(format!("Cannot flush staged settings: {}", e)))?;

    fs::rename(&staged, path).map_err(|e| {
        let _ = fs::remove_file(&staged);
        AutosaveError::Io(format!(
            "Cannot replace settings file {}: {}",
            path.display(),
            e
        ))
    })
}
