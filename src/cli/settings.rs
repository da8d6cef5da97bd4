//! Settings CLI commands
//!
//! The toggles a host menu would offer: local destination on/off, its path,
//! and the interval, copy count and source path.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings;
use crate::config::AutosavePaths;
use crate::error::AutosaveResult;
use crate::storage::JsonConfigStore;

/// Local destination subcommands
#[derive(Subcommand)]
pub enum LocalCommands {
    /// Also copy backups to the local path
    Enable,
    /// Stop copying to the local path
    Disable,
    /// Set the local backup root
    SetPath {
        /// Directory that receives `.autosave/<day>` folders
        path: PathBuf,
    },
}

/// Individual setting subcommands
#[derive(Subcommand)]
pub enum SetCommands {
    /// Minutes between backups
    Interval { minutes: i64 },
    /// Copies kept per day folder
    Copies { count: usize },
    /// Path of the autosave file to back up
    Source { path: PathBuf },
}

pub fn handle_local_command(paths: &AutosavePaths, cmd: LocalCommands) -> AutosaveResult<()> {
    let mut store = JsonConfigStore::open(paths.settings_file())?;

    match cmd {
        LocalCommands::Enable => {
            settings::set_local_enabled(&mut store, true)?;
            println!("Local backups enabled.");
        }
        LocalCommands::Disable => {
            settings::set_local_enabled(&mut store, false)?;
            println!("Local backups disabled.");
        }
        LocalCommands::SetPath { path } => {
            settings::set_local_path(&mut store, &path)?;
            println!("Local backup path set to {}", path.display());
        }
    }

    Ok(())
}

pub fn handle_set_command(paths: &AutosavePaths, cmd: SetCommands) -> AutosaveResult<()> {
    let mut store = JsonConfigStore::open(paths.settings_file())?;

    match cmd {
        SetCommands::Interval { minutes } => {
            settings::set_interval_minutes(&mut store, minutes)?;
            println!("Backup interval set to {} minute(s).", minutes);
        }
        SetCommands::Copies { count } => {
            settings::set_retention_ceiling(&mut store, count)?;
            println!("Keeping {} copies per day.", count);
        }
        SetCommands::Source { path } => {
            settings::set_autosave_path(&mut store, &path)?;
            println!("Autosave source set to {}", path.display());
        }
    }

    Ok(())
}

/// Switch timed backups on or off
pub fn handle_toggle(paths: &AutosavePaths, enabled: bool) -> AutosaveResult<()> {
    let mut store = JsonConfigStore::open(paths.settings_file())?;
    settings::set_enabled(&mut store, enabled)?;
    if enabled {
        println!("Backups enabled.");
    } else {
        println!("Backups disabled.");
    }
    Ok(())
}
