//! Checkpoint gate
//!
//! Decides whether enough time has passed since the last cycle for a new
//! backup, and moves the checkpoint forward when one fires.

use chrono::NaiveDateTime;

use crate::config::settings::{self, SettingKey, Settings, CHECKPOINT_FORMAT};
use crate::error::{AutosaveError, AutosaveResult};
use crate::storage::ConfigStore;

/// Interval check against the last persisted checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointGate {
    last_checkpoint: NaiveDateTime,
    interval_minutes: i64,
}

impl CheckpointGate {
    /// Gate that opens `interval_minutes` after `last_checkpoint`
    pub fn new(last_checkpoint: NaiveDateTime, interval_minutes: i64) -> Self {
        Self {
            last_checkpoint,
            interval_minutes,
        }
    }

    /// Build the gate from a settings snapshot
    ///
    /// Fails with `SettingsUnavailable` when the checkpoint is unset or does
    /// not parse; there is no sensible default for it.
    pub fn from_settings(settings: &Settings) -> AutosaveResult<Self> {
        let key = SettingKey::CheckpointTime.as_str();
        let raw = settings
            .checkpoint
            .as_deref()
            .ok_or_else(|| AutosaveError::setting(key, "not set"))?;
        let last_checkpoint = parse_checkpoint(raw)?;
        Ok(Self::new(last_checkpoint, settings.interval_minutes))
    }

    pub fn last_checkpoint(&self) -> NaiveDateTime {
        self.last_checkpoint
    }

    pub fn interval_minutes(&self) -> i64 {
        self.interval_minutes
    }

    /// Whole minutes since the checkpoint, rounded down
    pub fn elapsed_minutes(&self, now: NaiveDateTime) -> i64 {
        (now - self.last_checkpoint).num_seconds().div_euclid(60)
    }

    /// A backup is due once the interval has elapsed and the source exists
    pub fn is_due(&self, now: NaiveDateTime, source_exists: bool) -> bool {
        if !source_exists {
            return false;
        }
        self.elapsed_minutes(now) >= self.interval_minutes
    }

    /// Move the checkpoint to `now` and persist it
    pub fn advance(&mut self, now: NaiveDateTime, store: &mut dyn ConfigStore) -> AutosaveResult<()> {
        settings::set_checkpoint(store, now)?;
        self.last_checkpoint = now;
        Ok(())
    }
}

/// Parse a stored `%Y-%m-%d %H:%M:%S` checkpoint
pub fn parse_checkpoint(raw: &str) -> AutosaveResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), CHECKPOINT_FORMAT).map_err(|e| {
        AutosaveError::setting(
            SettingKey::CheckpointTime.as_str(),
            format!("'{}' is not a {} timestamp: {}", raw, CHECKPOINT_FORMAT, e),
        )
    })
}
