//! Backup file and folder naming
//!
//! Pure formatting of a point in time into the day-bucket folder name and the
//! time suffix that keeps same-day copies apart.

use chrono::NaiveDateTime;

/// Extension chain every backup copy carries
pub const BACKUP_EXTENSIONS: &str = ".nk.autosave";

/// Day-bucket folder name, `YYYYMMDD`
pub fn day_bucket(now: NaiveDateTime) -> String {
    now.format("%Y%m%d").to_string()
}

/// Time suffix for a permanent copy, `_HH-MM-SS`
pub fn time_suffix(now: NaiveDateTime) -> String {
    now.format("_%H-%M-%S").to_string()
}

/// Join a base name and a time suffix
pub fn with_suffix(base_name: &str, suffix: &str) -> String {
    format!("{}{}", base_name, suffix)
}

/// Append `.nk.autosave`
pub fn with_extensions(name: &str) -> String {
    format!("{}{}", name, BACKUP_EXTENSIONS)
}
