//! atime-backup - timed backups of a Nuke autosave script
//!
//! Every tick the engine checks whether the configured interval has passed
//! since the last checkpoint. When it has, the live autosave file is copied
//! into `<root>/.autosave/<YYYYMMDD>/` next to the script and, optionally,
//! under a local path. Each day folder keeps at most a configured number of
//! time-stamped copies.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths and the settings snapshot
//! - `error`: Custom error types
//! - `storage`: The key/value settings store
//! - `host`: Document, clock and tick collaborators
//! - `backup`: Naming, path resolution, retention, gating and the cycle
//! - `cli`: Command handlers for the binary
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use atime_backup::config::AutosavePaths;
//! use atime_backup::storage::JsonConfigStore;
//! use atime_backup::config::settings;
//!
//! let paths = AutosavePaths::new()?;
//! let mut store = JsonConfigStore::open(paths.settings_file())?;
//! settings::install(&mut store, chrono::Local::now().naive_local())?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod storage;

pub use error::{AutosaveError, AutosaveResult};
