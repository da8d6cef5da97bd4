//! CLI command handlers
//!
//! This module bridges the clap argument parsing with the backup engine and
//! the settings store.

pub mod backup;
pub mod settings;

pub use backup::{handle_folder, handle_list, handle_tick, handle_watch, DestinationArg};
pub use settings::{
    handle_local_command, handle_set_command, handle_toggle, LocalCommands, SetCommands,
};
