//! Storage layer for atime-backup
//!
//! Holds the host configuration store and the atomic JSON helpers it is
//! written with.

pub mod config_store;
pub mod file_io;

pub use config_store::{ConfigStore, JsonConfigStore, MemoryConfigStore};
pub use file_io::{read_json, write_json_atomic};
