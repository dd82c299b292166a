use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};
use crate::error::AcquireError;
use hound::WavReader;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::info;

/// A fully decoded WAV file
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AcquireError> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path).map_err(|e| AcquireError::Io(e.to_string()))?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AcquireError::Io(e.to_string()))?;

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }
}

/// Capture backend that replays a WAV file as a stream of frames
///
/// Frames carry the file's native sample rate and channel count; the
/// configured buffer duration controls how many samples land in each frame.
pub struct FileBackend {
    path: PathBuf,
    config: AudioBackendConfig,
    capturing: bool,
}

impl FileBackend {
    pub fn new(path: PathBuf, config: AudioBackendConfig) -> Self {
        Self {
            path,
            config,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for FileBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, AcquireError> {
        let audio = AudioFile::open(&self.path)?;
        let (tx, rx) = mpsc::channel(100);

        let samples_per_frame = (audio.sample_rate as u64 * audio.channels as u64
            * self.config.buffer_duration_ms
            / 1000)
            .max(1) as usize;
        let frame_ms = self.config.buffer_duration_ms;

        self.capturing = true;

        tokio::spawn(async move {
            for (i, chunk) in audio.samples.chunks(samples_per_frame).enumerate() {
                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate: audio.sample_rate,
                    channels: audio.channels,
                    timestamp_ms: i as u64 * frame_ms,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
            // Sender drops here, closing the stream
        });

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), AcquireError> {
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "file"
    }
}
