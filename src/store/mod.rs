//! Durable storage for the settings record and the timer snapshot.
//!
//! Both files are replaced with write-then-rename so a reader (the running
//! timer reloading settings, or `status`) never observes a torn record.

mod atomic;
mod config;
mod error;
mod snapshot;

pub use atomic::{remove_if_exists, write_atomic};
pub use config::ConfigStore;
pub use error::StoreError;
pub use snapshot::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
