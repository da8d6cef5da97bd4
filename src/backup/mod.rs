//! Backup rotation engine
//!
//! Copies the live autosave file into day-bucketed folders on a timer and
//! keeps each folder under a retention ceiling.
//!
//! # Architecture
//!
//! Leaf to root:
//!
//! - `naming`: day-bucket and time-suffix formatting
//! - `resolver`: backup folders, target file names, `Destination`
//! - `retention`: counts a folder and evicts its oldest copy
//! - `gate`: decides whether a cycle is due and advances the checkpoint
//! - `cycle`: runs one full cycle over every enabled destination
//!
//! # Layout
//!
//! ```text
//! <root>/.autosave/20240105/shot_09-03-07.nk.autosave
//! <root>/.autosave/20240105/shot_09-18-07.nk.autosave
//! ```
//!
//! `<root>` is the folder of the source file for the script destination and
//! the configured local path for the local destination.
//!
//! # Example
//!
//! ```rust,ignore
//! use atime_backup::backup::{BackupCycle, CycleOutcome};
//! use atime_backup::host::{Clock, FileDocument, SystemClock};
//! use atime_backup::storage::JsonConfigStore;
//!
//! let mut store = JsonConfigStore::open(paths.settings_file())?;
//! let mut doc = FileDocument::new(Some("/proj/shot.nk.autosave".into()));
//! let cycle = BackupCycle::new(paths.local_fallback());
//!
//! if let CycleOutcome::Completed(report) = cycle.run(&mut doc, &mut store, SystemClock.now())? {
//!     println!("{} destination(s) written", report.destinations.len());
//! }
//! ```

pub mod cycle;
pub mod gate;
pub mod naming;
pub mod resolver;
pub mod retention;

pub use cycle::{
    ensure_directory, write_destination, BackupCycle, CycleOutcome, CycleReport,
    DestinationReport, WriteStage,
};
pub use gate::CheckpointGate;
pub use resolver::{
    backup_directory, plain_target_name, resolve_local_backup_directory,
    resolve_script_backup_directory, timestamped_target_name, Destination, DestinationKind,
};
pub use retention::{BackupEntry, RetentionManager};
