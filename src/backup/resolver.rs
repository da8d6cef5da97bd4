//! Backup path resolution
//!
//! Computes where a backup goes and what it is called. Nothing here touches
//! the filesystem; the cycle creates directories before writing.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::naming::{day_bucket, time_suffix, with_extensions, with_suffix};
use crate::config::Settings;

/// Hidden folder created under every destination root
pub const AUTOSAVE_DIR: &str = ".autosave";

/// Which of the two backup targets a destination is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    /// Next to the source file
    Script,
    /// User-configured local path
    Local,
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestinationKind::Script => f.write_str("script"),
            DestinationKind::Local => f.write_str("local"),
        }
    }
}

/// One backup target, resolved for a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub kind: DestinationKind,
    pub root: PathBuf,
    pub enabled: bool,
    pub retention_ceiling: usize,
}

impl Destination {
    /// The script destination, rooted at the source file's folder; always enabled
    pub fn script(source: &Path, settings: &Settings) -> Self {
        Self {
            kind: DestinationKind::Script,
            root: source_parent(source),
            enabled: true,
            retention_ceiling: settings.retention_ceiling,
        }
    }

    /// The local destination, rooted at `local_path` or `fallback`
    pub fn local(settings: &Settings, fallback: &Path) -> Self {
        Self {
            kind: DestinationKind::Local,
            root: settings.local_root(fallback),
            enabled: settings.local_enabled,
            retention_ceiling: settings.retention_ceiling,
        }
    }

    pub fn backup_directory(&self, now: NaiveDateTime) -> PathBuf {
        backup_directory(&self.root, now)
    }
}

/// `<root>/.autosave/<YYYYMMDD>`
pub fn backup_directory(destination_root: &Path, now: NaiveDateTime) -> PathBuf {
    destination_root.join(AUTOSAVE_DIR).join(day_bucket(now))
}

/// `<base>.nk.autosave`
pub fn plain_target_name(source: &Path) -> String {
    with_extensions(&base_name(source))
}

/// `<base>_HH-MM-SS.nk.autosave`
pub fn timestamped_target_name(source: &Path, now: NaiveDateTime) -> String {
    with_extensions(&with_suffix(&base_name(source), &time_suffix(now)))
}

/// File name up to its first `.`
///
/// `shot.nk.autosave` and `shot.nk` both give `shot`. Both `/` and `\` count
/// as separators so host paths from either platform resolve the same way.
pub fn base_name(source: &Path) -> String {
    let full = source.to_string_lossy();
    let file_name = full.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("");
    file_name.split('.').next().unwrap_or("").to_string()
}

/// Today's script-destination folder for a source file
pub fn resolve_script_backup_directory(source: &Path, now: NaiveDateTime) -> PathBuf {
    backup_directory(&source_parent(source), now)
}

/// Today's local-destination folder
pub fn resolve_local_backup_directory(
    settings: &Settings,
    fallback: &Path,
    now: NaiveDateTime,
) -> PathBuf {
    backup_directory(&settings.local_root(fallback), now)
}

fn source_parent(source: &Path) -> PathBuf {
    source
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_target_names() {
        assert_eq!(plain_target_name(Path::new("project")), "project.nk.autosave");
        assert_eq!(
            timestamped_target_name(Path::new("project"), at(9, 3, 7)),
            "project_09-03-07.nk.autosave"
        );
    }

    #[test]
    fn test_base_name_strips_every_extension() {
        assert_eq!(base_name(Path::new("/proj/shot.nk")), "shot");
        assert_eq!(base_name(Path::new("/proj/shot.nk.autosave")), "shot");
        assert_eq!(base_name(Path::new("C:\\jobs\\shot_010.nk")), "shot_010");
    }

    #[test]
    fn test_backup_directory() {
        assert_eq!(
            backup_directory(Path::new("/proj"), at(9, 3, 7)),
            PathBuf::from("/proj/.autosave/20240105")
        );
        assert_eq!(
            resolve_script_backup_directory(Path::new("/proj/shot.nk"), at(9, 3, 7)),
            PathBuf::from("/proj/.autosave/20240105")
        );
    }

    #[test]
    fn test_destinations() {
        let settings = Settings {
            retention_ceiling: 4,
            ..Settings::default()
        };
        let fallback = Path::new("/home/artist/.nuke");

        let script = Destination::script(Path::new("/proj/shot.nk"), &settings);
        assert_eq!(script.kind, DestinationKind::Script);
        assert_eq!(script.root, PathBuf::from("/proj"));
        assert!(script.enabled);
        assert_eq!(script.retention_ceiling, 4);

        let local = Destination::local(&settings, fallback);
        assert_eq!(local.root, fallback);
        assert!(!local.enabled);
        assert_eq!(
            local.backup_directory(at(0, 0, 0)),
            resolve_local_backup_directory(&settings, fallback, at(0, 0, 0))
        );
    }
}
