//! Persistence error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing the settings or snapshot files.
///
/// Callers inside the timer recover from all of these locally; only the
/// `config` CLI subcommands surface them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("ファイルアクセスに失敗しました ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not contain valid JSON for its record.
    #[error("ファイルの解析に失敗しました ({path}): {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but describes an impossible state.
    #[error("不正な内容です ({path}): {reason}")]
    Invalid { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the underlying file simply does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }

    /// Returns the file the error refers to.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } | Self::Invalid { path, .. } => path,
        }
    }
}
