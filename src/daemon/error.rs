//! Daemon error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up settings-file observation.
///
/// The timer keeps running without live reload if any of these occur.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The settings path has no parent directory to observe.
    #[error("監視対象のディレクトリがありません: {0}")]
    NoParent(PathBuf),

    /// The platform file-notification backend failed.
    #[error("設定ファイルの監視に失敗しました: {0}")]
    Notify(#[from] notify::Error),
}

impl WatchError {
    /// Returns true if retrying later (e.g. once the directory exists) may succeed.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NoParent(_) => false,
            Self::Notify(e) => matches!(e.kind, notify::ErrorKind::PathNotFound | notify::ErrorKind::Io(_)),
        }
    }
}
