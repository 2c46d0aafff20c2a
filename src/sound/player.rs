//! In-process playback using rodio.
//!
//! rodio's `OutputStream` is not `Send`, so each cue gets its own playback
//! thread that owns the stream for as long as the sound lasts. The caller
//! only waits for the stream to open and the file to decode.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink};
use tracing::debug;

use super::error::SoundError;
use super::PlaybackBackend;

/// How long `play` waits for the audio device before giving up.
const INIT_TIMEOUT: Duration = Duration::from_secs(2);

/// A playback backend that decodes and plays the file itself.
#[derive(Debug, Clone, Default)]
pub struct RodioBackend;

impl RodioBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn open_and_play(path: PathBuf, ready: mpsc::Sender<Result<(), SoundError>>) {
        let (_stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                let _ = ready.send(Err(SoundError::DeviceNotAvailable(e.to_string())));
                return;
            }
        };

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                let _ = ready.send(Err(SoundError::FileNotFound(format!(
                    "{}: {}",
                    path.display(),
                    e
                ))));
                return;
            }
        };

        let decoder = match Decoder::new(BufReader::new(file)) {
            Ok(decoder) => decoder,
            Err(e) => {
                let _ = ready.send(Err(SoundError::DecodeError(e.to_string())));
                return;
            }
        };

        let sink = match Sink::try_new(&handle) {
            Ok(sink) => sink,
            Err(e) => {
                let _ = ready.send(Err(SoundError::DeviceNotAvailable(e.to_string())));
                return;
            }
        };

        sink.append(decoder);
        let _ = ready.send(Ok(()));
        sink.sleep_until_end();
        debug!("rodio playback finished: {}", path.display());
    }
}

impl PlaybackBackend for RodioBackend {
    fn name(&self) -> &str {
        "rodio"
    }

    fn play(&self, file: &Path) -> Result<(), SoundError> {
        let (tx, rx) = mpsc::channel();
        let path = file.to_path_buf();

        thread::Builder::new()
            .name("rodio-playback".to_string())
            .spawn(move || Self::open_and_play(path, tx))
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        match rx.recv_timeout(INIT_TIMEOUT) {
            Ok(result) => result,
            Err(_) => Err(SoundError::DeviceNotAvailable(
                "audio output did not open in time".to_string(),
            )),
        }
    }
}
