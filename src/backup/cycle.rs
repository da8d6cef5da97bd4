//! One backup cycle
//!
//! Runs on every tick: checks the live document, asks the gate, flushes the
//! document, advances the checkpoint and then writes to each enabled
//! destination. Each destination is its own sub-transaction; a failure is
//! recorded in its report and the next destination still runs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use super::gate::CheckpointGate;
use super::resolver::{plain_target_name, timestamped_target_name, Destination, DestinationKind};
use super::retention::RetentionManager;
use crate::config::settings::{self, Settings};
use crate::error::{AutosaveError, AutosaveResult};
use crate::host::{DocumentHost, UNSAVED_DOCUMENT};
use crate::storage::ConfigStore;

/// Last step a destination write reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WriteStage {
    Idle,
    DirectoryEnsured,
    Copied,
    Renamed,
    Pruned,
}

/// Result of writing one destination
#[derive(Debug)]
pub struct DestinationReport {
    pub kind: DestinationKind,
    /// Day-bucket directory written to
    pub directory: PathBuf,
    pub stage: WriteStage,
    /// The new time-stamped copy, present once `Renamed` was reached
    pub backup: Option<PathBuf>,
    /// Copy removed by retention
    pub evicted: Option<PathBuf>,
    pub error: Option<AutosaveError>,
}

impl DestinationReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A cycle that fired
#[derive(Debug)]
pub struct CycleReport {
    pub now: NaiveDateTime,
    pub source: PathBuf,
    pub destinations: Vec<DestinationReport>,
}

impl CycleReport {
    pub fn destination(&self, kind: DestinationKind) -> Option<&DestinationReport> {
        self.destinations.iter().find(|d| d.kind == kind)
    }

    pub fn all_succeeded(&self) -> bool {
        self.destinations.iter().all(DestinationReport::is_success)
    }
}

/// What a tick did
#[derive(Debug)]
pub enum CycleOutcome {
    /// The document has never been saved
    Unsaved,
    /// The autosave file is not on disk
    SourceMissing(PathBuf),
    /// Backups are switched off
    Disabled,
    /// The interval has not elapsed yet
    NotDue {
        elapsed_minutes: i64,
        interval_minutes: i64,
    },
    /// No checkpoint existed; it was set to now and the next interval starts
    CheckpointSeeded,
    /// Backups were written (or attempted) to every enabled destination
    Completed(CycleReport),
}

/// Drives backup cycles against a host
#[derive(Debug, Clone)]
pub struct BackupCycle {
    local_fallback: PathBuf,
    force: bool,
}

impl BackupCycle {
    /// `local_fallback` is the local root used when `local_path` is unset
    pub fn new(local_fallback: impl Into<PathBuf>) -> Self {
        Self {
            local_fallback: local_fallback.into(),
            force: false,
        }
    }

    /// Treat the gate as due on every run
    pub fn forced(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn local_fallback(&self) -> &Path {
        &self.local_fallback
    }

    /// Run one cycle at `now`
    ///
    /// Silent aborts come back as outcomes. An error means the checkpoint
    /// could not be read or persisted; no destination was touched.
    pub fn run(
        &self,
        host: &mut dyn DocumentHost,
        store: &mut dyn ConfigStore,
        now: NaiveDateTime,
    ) -> AutosaveResult<CycleOutcome> {
        if host.current_document_name() == UNSAVED_DOCUMENT {
            debug!("document has not been saved, skipping backup");
            return Ok(CycleOutcome::Unsaved);
        }

        let source = host.resolve_autosave_path();
        if !source.is_file() {
            debug!(source = %source.display(), "autosave file missing, skipping backup");
            return Ok(CycleOutcome::SourceMissing(source));
        }

        let settings = Settings::snapshot(store);
        if !settings.enabled {
            debug!("backups disabled");
            return Ok(CycleOutcome::Disabled);
        }

        if settings.checkpoint.is_none() {
            settings::set_checkpoint(store, now)?;
            info!(checkpoint = %now, "seeded missing checkpoint");
            return Ok(CycleOutcome::CheckpointSeeded);
        }

        let mut gate = CheckpointGate::from_settings(&settings)?;
        if !self.force && !gate.is_due(now, true) {
            return Ok(CycleOutcome::NotDue {
                elapsed_minutes: gate.elapsed_minutes(now),
                interval_minutes: gate.interval_minutes(),
            });
        }

        if let Err(e) = host.save() {
            warn!(error = %e, "host save failed, backing up the file as it is on disk");
        }

        gate.advance(now, store)?;
        info!(source = %source.display(), "starting backup");

        let mut destinations = vec![Destination::script(&source, &settings)];
        let local = Destination::local(&settings, &self.local_fallback);
        if local.enabled {
            destinations.push(local);
        }

        let reports = destinations
            .iter()
            .map(|destination| write_destination(destination, &source, now))
            .collect();

        Ok(CycleOutcome::Completed(CycleReport {
            now,
            source,
            destinations: reports,
        }))
    }
}

/// Write one destination: ensure directory, copy, rename, prune
///
/// Never fails; the error and the stage reached are in the report.
pub fn write_destination(
    destination: &Destination,
    source: &Path,
    now: NaiveDateTime,
) -> DestinationReport {
    let mut report = DestinationReport {
        kind: destination.kind,
        directory: destination.backup_directory(now),
        stage: WriteStage::Idle,
        backup: None,
        evicted: None,
        error: None,
    };

    if let Err(e) = write_steps(destination, source, now, &mut report) {
        warn!(
            destination = %destination.kind,
            stage = ?report.stage,
            error = %e,
            "backup failed"
        );
        report.error = Some(e);
    }

    report
}

fn write_steps(
    destination: &Destination,
    source: &Path,
    now: NaiveDateTime,
    report: &mut DestinationReport,
) -> AutosaveResult<()> {
    let directory = report.directory.clone();

    ensure_directory(&directory)?;
    report.stage = WriteStage::DirectoryEnsured;

    let plain = directory.join(plain_target_name(source));
    remove_stale_plain(source, &plain)?;
    fs::copy(source, &plain).map_err(|e| AutosaveError::CopyFailed {
        from: source.to_path_buf(),
        to: plain.clone(),
        message: e.to_string(),
    })?;
    report.stage = WriteStage::Copied;

    let timestamped = directory.join(timestamped_target_name(source, now));
    fs::rename(&plain, &timestamped).map_err(|e| AutosaveError::RenameFailed {
        from: plain.clone(),
        to: timestamped.clone(),
        message: e.to_string(),
    })?;
    report.stage = WriteStage::Renamed;
    report.backup = Some(timestamped.clone());
    info!(destination = %destination.kind, path = %timestamped.display(), "backup written");

    let retention = RetentionManager::new(&directory, destination.retention_ceiling);
    report.evicted = retention.enforce()?;
    report.stage = WriteStage::Pruned;

    Ok(())
}

/// Remove a plain copy left by an earlier failed rename
///
/// Every copy must be a fresh file; copying onto a leftover keeps the
/// leftover's creation time and retention would see the new backup as oldest.
fn remove_stale_plain(source: &Path, plain: &Path) -> AutosaveResult<()> {
    match fs::remove_file(plain) {
        Ok(()) => {
            debug!(path = %plain.display(), "removed stale plain copy");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AutosaveError::CopyFailed {
            from: source.to_path_buf(),
            to: plain.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

/// Create `directory` and its parents; existing directories are left alone
pub fn ensure_directory(directory: &Path) -> AutosaveResult<()> {
    fs::create_dir_all(directory).map_err(|e| AutosaveError::DirectoryCreateFailed {
        path: directory.to_path_buf(),
        message: e.to_string(),
    })
}
