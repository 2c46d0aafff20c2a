//! Timer snapshot persistence.
//!
//! The snapshot is the subset of [`TimerState`] needed to describe where the
//! countdown is. A record that is missing, unparsable, or describes an
//! impossible state is reported as absent; it is never partially adopted.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::atomic::{remove_if_exists, write_atomic};
use super::error::StoreError;
use crate::types::{PersistedSnapshot, TimerState};

/// Storage for the persisted timer snapshot.
pub trait SnapshotStore: Send {
    /// Returns the stored state, or `None` if there is no usable snapshot.
    fn load(&self) -> Option<TimerState>;

    /// Replaces the stored snapshot atomically.
    fn save(&self, state: &TimerState) -> Result<(), StoreError>;

    /// Removes the stored snapshot. Removing a missing snapshot succeeds.
    fn clear(&self) -> Result<(), StoreError>;
}

// ============================================================================
// FileSnapshotStore
// ============================================================================

/// Snapshot stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot, reporting why it could not be used.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, lacks a field,
    /// or encodes an invalid state.
    pub fn try_load(&self) -> Result<TimerState, StoreError> {
        let text = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let snapshot: PersistedSnapshot =
            serde_json::from_str(&text).map_err(|e| StoreError::parse(&self.path, e))?;
        TimerState::try_from(snapshot).map_err(|reason| StoreError::Invalid {
            path: self.path.clone(),
            reason,
        })
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Option<TimerState> {
        match self.try_load() {
            Ok(state) => Some(state),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!("タイマー状態を読み込めません。破棄します: {}", e);
                None
            }
        }
    }

    fn save(&self, state: &TimerState) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&PersistedSnapshot::from(state))
            .map_err(|e| StoreError::parse(&self.path, e))?;
        write_atomic(&self.path, json.as_bytes())?;
        debug!("Snapshot saved: {:?}", state);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        remove_if_exists(&self.path)?;
        debug!("Snapshot cleared");
        Ok(())
    }
}

// ============================================================================
// MemorySnapshotStore
// ============================================================================

#[derive(Debug, Default)]
struct MemoryInner {
    snapshot: Option<PersistedSnapshot>,
    saves: usize,
    clears: usize,
}

/// In-memory snapshot store; clones share the same slot.
///
/// Stores the encoded [`PersistedSnapshot`] so it exercises the same
/// two-boolean phase mapping as the file store.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw stored record.
    #[must_use]
    pub fn raw(&self) -> Option<PersistedSnapshot> {
        self.inner.lock().unwrap().snapshot
    }

    /// Overwrites the raw stored record.
    pub fn set_raw(&self, snapshot: Option<PersistedSnapshot>) {
        self.inner.lock().unwrap().snapshot = snapshot;
    }

    #[must_use]
    pub fn save_count(&self) -> usize {
        self.inner.lock().unwrap().saves
    }

    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.inner.lock().unwrap().clears
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Option<TimerState> {
        self.raw().and_then(|s| TimerState::try_from(s).ok())
    }

    fn save(&self, state: &TimerState) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.snapshot = Some(PersistedSnapshot::from(state));
        inner.saves += 1;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.snapshot = None;
        inner.clears += 1;
        Ok(())
    }
}
