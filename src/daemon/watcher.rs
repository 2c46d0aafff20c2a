//! Settings file observation and reconciliation.
//!
//! The settings editor writes the file independently of the timer. Every
//! change is reloaded and diffed against the configuration the engine is
//! currently using:
//! - placement changed: only relocate the display, defer everything else
//!   to the full reload that follows re-attachment
//! - otherwise: merge all changed fields into the engine and forward
//!   `showTimeAlways` to the display

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::error::WatchError;
use crate::types::{Config, ConfigUpdate, IndicatorPosition};

// ============================================================================
// Reconciliation
// ============================================================================

/// What the runtime should do with a reloaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Nothing the engine uses changed
    Unchanged,
    /// The display must move; all other fields wait for the next full reload
    Relocate {
        position: IndicatorPosition,
        index: i32,
    },
    /// Merge these fields and forward the presentation hint
    Apply {
        update: ConfigUpdate,
        show_time_always: bool,
    },
}

/// Compares the reloaded record with the one currently applied.
pub fn reconcile(applied: &Config, reloaded: &Config) -> Reconciliation {
    let delta = applied.diff(reloaded);

    if delta.is_empty() {
        return Reconciliation::Unchanged;
    }

    if delta.changes_placement() {
        return Reconciliation::Relocate {
            position: reloaded.indicator_position,
            index: reloaded.indicator_index,
        };
    }

    Reconciliation::Apply {
        update: delta,
        show_time_always: reloaded.show_time_always,
    }
}

// ============================================================================
// ConfigWatcher
// ============================================================================

/// Marker sent for each relevant change of the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigChanged;

/// Observes the settings file for external changes.
///
/// The parent directory is watched rather than the file itself, since
/// editors (and our own atomic writer) replace the file by renaming over it.
/// Dropping the watcher stops observation.
pub struct ConfigWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    /// Starts observing `config_path`, sending a [`ConfigChanged`] per change.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no parent or the platform backend
    /// cannot watch it.
    pub fn spawn(
        config_path: &Path,
        changes_tx: mpsc::UnboundedSender<ConfigChanged>,
    ) -> Result<Self, WatchError> {
        let (Some(dir), Some(file_name)) = (config_path.parent(), config_path.file_name()) else {
            return Err(WatchError::NoParent(config_path.to_path_buf()));
        };
        let dir = if dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            dir
        };
        let file_name = file_name.to_os_string();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_relevant(&event, &file_name) => {
                debug!("Settings file event: {:?}", event.kind);
                let _ = changes_tx.send(ConfigChanged);
            }
            Ok(_) => {}
            Err(e) => debug!("Settings watch error: {}", e),
        })?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;

        info!("設定ファイルを監視しています: {}", config_path.display());
        Ok(Self {
            path: config_path.to_path_buf(),
            _watcher: watcher,
        })
    }

    /// Returns the observed settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for ConfigWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Returns true if `event` may have changed the file named `file_name`.
pub(crate) fn is_relevant(event: &Event, file_name: &OsString) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event
        .paths
        .iter()
        .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod reconcile_tests {
        use super::*;

        #[test]
        fn test_identical_is_unchanged() {
            let config = Config::default();
            assert_eq!(reconcile(&config, &config.clone()), Reconciliation::Unchanged);
        }

        #[test]
        fn test_duration_change_is_applied() {
            let applied = Config::default();
            let reloaded = Config {
                work_duration: 600,
                ..Config::default()
            };

            match reconcile(&applied, &reloaded) {
                Reconciliation::Apply {
                    update,
                    show_time_always,
                } => {
                    assert_eq!(update.work_duration, Some(600));
                    assert!(update.break_duration.is_none());
                    assert!(!show_time_always);
                }
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn test_show_time_always_is_forwarded() {
            let applied = Config::default();
            let reloaded = Config {
                show_time_always: true,
                ..Config::default()
            };

            match reconcile(&applied, &reloaded) {
                Reconciliation::Apply {
                    update,
                    show_time_always,
                } => {
                    assert!(show_time_always);
                    assert_eq!(update.show_time_always, Some(true));
                }
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn test_placement_change_defers_everything_else() {
            let applied = Config::default();
            let reloaded = Config {
                indicator_position: IndicatorPosition::Left,
                work_duration: 600,
                ..Config::default()
            };

            assert_eq!(
                reconcile(&applied, &reloaded),
                Reconciliation::Relocate {
                    position: IndicatorPosition::Left,
                    index: 0
                }
            );
        }

        #[test]
        fn test_index_change_alone_relocates() {
            let applied = Config::default();
            let reloaded = Config {
                indicator_index: 5,
                ..Config::default()
            };

            assert_eq!(
                reconcile(&applied, &reloaded),
                Reconciliation::Relocate {
                    position: IndicatorPosition::Right,
                    index: 5
                }
            );
        }
    }

    mod event_filter_tests {
        use super::*;
        use notify::event::{AccessKind, CreateKind, ModifyKind};

        fn name() -> OsString {
            OsString::from("settings.json")
        }

        #[test]
        fn test_modify_of_settings_is_relevant() {
            let event = Event::new(EventKind::Modify(ModifyKind::Any))
                .add_path(PathBuf::from("/cfg/settings.json"));
            assert!(is_relevant(&event, &name()));
        }

        #[test]
        fn test_rename_onto_settings_is_relevant() {
            let event = Event::new(EventKind::Modify(ModifyKind::Any))
                .add_path(PathBuf::from("/cfg/settings.json.tmp"))
                .add_path(PathBuf::from("/cfg/settings.json"));
            assert!(is_relevant(&event, &name()));
        }

        #[test]
        fn test_other_file_is_ignored() {
            let event = Event::new(EventKind::Create(CreateKind::File))
                .add_path(PathBuf::from("/cfg/timer_state.json"));
            assert!(!is_relevant(&event, &name()));
        }

        #[test]
        fn test_access_is_ignored() {
            let event = Event::new(EventKind::Access(AccessKind::Any))
                .add_path(PathBuf::from("/cfg/settings.json"));
            assert!(!is_relevant(&event, &name()));
        }
    }

    mod watcher_tests {
        use super::*;
        use std::time::Duration;

        #[test]
        fn test_path_without_file_name_is_rejected() {
            let (tx, _rx) = mpsc::unbounded_channel();
            let err = ConfigWatcher::spawn(Path::new("/"), tx).unwrap_err();
            assert!(matches!(err, WatchError::NoParent(_)));
        }

        #[tokio::test]
        async fn test_external_write_is_reported() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("settings.json");
            let (tx, mut rx) = mpsc::unbounded_channel();

            let watcher = ConfigWatcher::spawn(&path, tx).unwrap();
            assert_eq!(watcher.path(), path.as_path());

            crate::store::write_atomic(&path, b"{\"workDuration\": 60}").unwrap();

            let received = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
            assert_eq!(received.unwrap(), Some(ConfigChanged));
        }
    }
}
