//! Sound system error types.
//!
//! None of these ever reach the user: the dispatcher logs them and moves on
//! to the next backend in its chain.

use thiserror::Error;

/// Errors that can occur while playing a completion cue.
#[derive(Debug, Error)]
pub enum SoundError {
    /// The configured sound file does not exist.
    #[error("サウンドファイルが見つかりません: {0}")]
    FileNotFound(String),

    /// The backend's external program could not be launched.
    #[error("再生コマンドを起動できません ({program}): {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Audio device is not available (e.g., no sound server running).
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceNotAvailable(String),

    /// Failed to decode the audio file.
    #[error("サウンドファイルのデコードに失敗しました: {0}")]
    DecodeError(String),

    /// Every backend in the chain failed.
    #[error("すべての再生方法が失敗しました ({0}件)")]
    Exhausted(usize),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_))
    }

    /// Returns true if this error is related to the audio file itself.
    ///
    /// Such errors are not worth retrying with another backend.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "設定の soundFile を確認してください",
            Self::SpawnFailed { .. } => "paplay / aplay / ffplay のいずれかをインストールしてください",
            Self::DeviceNotAvailable(_) => "サウンドサーバーが起動しているか確認してください",
            Self::DecodeError(_) => "サウンドファイルが破損している可能性があります",
            Self::Exhausted(_) => "サウンドを無効にするには soundEnabled を false にしてください",
        }
    }
}
