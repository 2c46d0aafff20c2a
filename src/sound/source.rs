//! Sound file locations.

use std::path::{Path, PathBuf};

/// Freedesktop alarm sound shipped by most Linux desktops.
pub const FREEDESKTOP_ALARM_SOUND: &str =
    "/usr/share/sounds/freedesktop/stereo/alarm-clock-elapsed.oga";

/// macOS system sound used when running on a Mac.
pub const MACOS_ALARM_SOUND: &str = "/System/Library/Sounds/Glass.aiff";

/// Returns the platform default completion sound.
#[must_use]
pub fn default_sound_file() -> PathBuf {
    if cfg!(target_os = "macos") {
        PathBuf::from(MACOS_ALARM_SOUND)
    } else {
        PathBuf::from(FREEDESKTOP_ALARM_SOUND)
    }
}

/// Returns true if `path` names an existing regular file.
#[must_use]
pub fn sound_file_exists(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sound_file_is_absolute() {
        assert!(default_sound_file().is_absolute());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_default_sound_file_linux() {
        assert_eq!(default_sound_file(), PathBuf::from(FREEDESKTOP_ALARM_SOUND));
    }

    #[test]
    fn test_sound_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bell.oga");
        assert!(!sound_file_exists(&file));

        std::fs::write(&file, b"OggS").unwrap();
        assert!(sound_file_exists(&file));
        assert!(!sound_file_exists(dir.path()));
    }
}
