//! Backup CLI commands
//!
//! Running cycles by hand or on a timer, and inspecting today's folders.

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use clap::ValueEnum;
use tracing::{error, info};

use crate::backup::{
    resolve_local_backup_directory, resolve_script_backup_directory, BackupCycle, CycleOutcome,
    RetentionManager,
};
use crate::config::{AutosavePaths, Settings};
use crate::error::{AutosaveError, AutosaveResult};
use crate::host::{Clock, FileDocument, SystemClock, Ticker};
use crate::storage::JsonConfigStore;

/// Which destination a folder command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DestinationArg {
    Script,
    Local,
}

/// Run a single cycle now
pub fn handle_tick(paths: &AutosavePaths, source: Option<PathBuf>, force: bool) -> AutosaveResult<()> {
    let cycle = BackupCycle::new(paths.local_fallback()).forced(force);
    let outcome = run_once(paths, &cycle, source.as_ref())?;
    print_outcome(&outcome);
    Ok(())
}

/// Run cycles on a timer until interrupted or `max_ticks` is reached
pub fn handle_watch(
    paths: &AutosavePaths,
    source: Option<PathBuf>,
    period_secs: u64,
    max_ticks: Option<u64>,
) -> AutosaveResult<()> {
    let cycle = BackupCycle::new(paths.local_fallback());
    let mut ticker = Ticker::new(Duration::from_secs(period_secs));
    if let Some(max) = max_ticks {
        ticker = ticker.with_max_ticks(max);
    }

    info!(
        settings = %paths.settings_file().display(),
        period_secs,
        "watching for backups"
    );

    let ticks = ticker.run(|| {
        match run_once(paths, &cycle, source.as_ref()) {
            Ok(CycleOutcome::Completed(report)) => {
                for dest in &report.destinations {
                    if let Some(path) = &dest.backup {
                        println!("{}: {}", dest.kind, path.display());
                    }
                }
            }
            Ok(_) => {}
            // a broken settings file skips this tick; the host may fix it
            Err(e) => error!(error = %e, "backup cycle aborted"),
        }
        ControlFlow::Continue(())
    });

    info!(ticks, "watch finished");
    Ok(())
}

/// Print today's backup folder for a destination
pub fn handle_folder(
    paths: &AutosavePaths,
    destination: DestinationArg,
    source: Option<PathBuf>,
) -> AutosaveResult<()> {
    let dir = today_directory(paths, destination, source)?;
    println!("{}", dir.display());
    Ok(())
}

/// List today's backups for a destination, oldest first
pub fn handle_list(
    paths: &AutosavePaths,
    destination: DestinationArg,
    source: Option<PathBuf>,
) -> AutosaveResult<()> {
    let dir = today_directory(paths, destination, source)?;
    let entries = match RetentionManager::new(&dir, usize::MAX).list() {
        Ok(entries) => entries,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => return Err(e),
    };

    if entries.is_empty() {
        println!("No backups today in {}", dir.display());
        return Ok(());
    }

    println!("Backups in {}", dir.display());
    println!();
    let now = SystemTime::now();
    for (i, entry) in entries.iter().enumerate() {
        let age = now.duration_since(entry.created).unwrap_or_default();
        println!(
            "  {}. {} ({} ago, {})",
            i + 1,
            entry.file_name,
            format_duration(age),
            format_size(entry.size_bytes),
        );
    }
    println!();
    println!("Total: {} backup(s)", entries.len());
    Ok(())
}

/// Load the settings file fresh and run one cycle against it
fn run_once(
    paths: &AutosavePaths,
    cycle: &BackupCycle,
    source: Option<&PathBuf>,
) -> AutosaveResult<CycleOutcome> {
    let mut store = JsonConfigStore::open(paths.settings_file())?;
    let settings = Settings::snapshot(&store);
    let mut document = FileDocument::new(source.cloned().or(settings.autosave_path));
    cycle.run(&mut document, &mut store, SystemClock.now())
}

fn today_directory(
    paths: &AutosavePaths,
    destination: DestinationArg,
    source: Option<PathBuf>,
) -> AutosaveResult<PathBuf> {
    let store = JsonConfigStore::open(paths.settings_file())?;
    let settings = Settings::snapshot(&store);
    let now = SystemClock.now();

    match destination {
        DestinationArg::Script => {
            let source = source.or(settings.autosave_path).ok_or_else(|| {
                AutosaveError::Config(
                    "No autosave path configured; pass --source or run 'set source'".into(),
                )
            })?;
            Ok(resolve_script_backup_directory(&source, now))
        }
        DestinationArg::Local => Ok(resolve_local_backup_directory(
            &settings,
            paths.local_fallback(),
            now,
        )),
    }
}

fn print_outcome(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Unsaved => println!("No autosave path configured; nothing to back up."),
        CycleOutcome::SourceMissing(path) => {
            println!("Autosave file not found: {}", path.display())
        }
        CycleOutcome::Disabled => println!("Backups are disabled."),
        CycleOutcome::NotDue {
            elapsed_minutes,
            interval_minutes,
        } => println!(
            "Not due yet: {}m of {}m elapsed.",
            elapsed_minutes, interval_minutes
        ),
        CycleOutcome::CheckpointSeeded => {
            println!("Checkpoint initialized; first backup after one interval.")
        }
        CycleOutcome::Completed(report) => {
            for dest in &report.destinations {
                match (&dest.backup, &dest.error) {
                    (Some(path), None) => println!("{}: {}", dest.kind, path.display()),
                    (Some(path), Some(e)) => {
                        println!("{}: {} (retention failed: {})", dest.kind, path.display(), e)
                    }
                    (None, Some(e)) => println!("{}: failed: {}", dest.kind, e),
                    (None, None) => {}
                }
                if let Some(evicted) = &dest.evicted {
                    println!("  removed {}", evicted.display());
                }
            }
        }
    }
}

/// Format a duration in human-readable form
fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    format!("{}h", minutes / 60)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(42)), "42s");
        assert_eq!(format_duration(Duration::from_secs(15 * 60)), "15m");
        assert_eq!(format_duration(Duration::from_secs(3 * 3600 + 5)), "3h");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
