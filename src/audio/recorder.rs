use super::backend::{AudioBackend, AudioBackendConfig};
use super::clip::AudioClip;
use crate::error::AcquireError;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Accumulates frames from a capture backend into one audio resource
///
/// Owns the backend exclusively for the duration of one recording. `stop`
/// always releases the backend, even when nothing was captured, and hands
/// back a single WAV-encoded [`AudioClip`].
pub struct Recorder {
    backend: Box<dyn AudioBackend>,
    config: AudioBackendConfig,

    /// Whether a recording is currently active
    recording: Arc<AtomicBool>,

    /// Accumulated interleaved PCM samples
    samples: Arc<Mutex<Vec<i16>>>,

    /// Sample rate and channel count observed on captured frames
    observed_spec: Arc<Mutex<Option<(u32, u16)>>>,

    /// Handle for the frame accumulation task
    task: Option<JoinHandle<()>>,

    started_at: Option<Instant>,
}

impl Recorder {
    pub fn new(backend: Box<dyn AudioBackend>, config: AudioBackendConfig) -> Self {
        Self {
            backend,
            config,
            recording: Arc::new(AtomicBool::new(false)),
            samples: Arc::new(Mutex::new(Vec::new())),
            observed_spec: Arc::new(Mutex::new(None)),
            task: None,
            started_at: None,
        }
    }

    /// Start capturing from the backend
    pub async fn start(&mut self) -> Result<(), AcquireError> {
        if self.recording.load(Ordering::SeqCst) {
            warn!("Recording already started");
            return Ok(());
        }

        self.samples.lock().await.clear();
        *self.observed_spec.lock().await = None;

        let mut rx = self.backend.start().await?;

        self.recording.store(true, Ordering::SeqCst);
        self.started_at = Some(Instant::now());

        let samples = Arc::clone(&self.samples);
        let observed_spec = Arc::clone(&self.observed_spec);

        // Drains until the backend closes the frame channel on stop, so
        // buffered frames are never dropped.
        let task = tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                {
                    let mut spec = observed_spec.lock().await;
                    if spec.is_none() {
                        *spec = Some((frame.sample_rate, frame.channels));
                    }
                }

                let mut buf = samples.lock().await;
                buf.extend_from_slice(&frame.samples);
            }
        });

        self.task = Some(task);

        info!("Recording started ({})", self.backend.name());

        Ok(())
    }

    /// Elapsed recording time at one-second granularity
    pub fn elapsed_secs(&self) -> u64 {
        self.started_at
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0)
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    /// Stop capturing and concatenate accumulated frames into one clip
    ///
    /// The backend is released unconditionally, including when no frames
    /// were captured; an empty clip is returned rather than an error.
    pub async fn stop(&mut self) -> Result<AudioClip, AcquireError> {
        self.recording.store(false, Ordering::SeqCst);

        // Release the capture resource first; this closes the frame
        // channel and lets the accumulation task drain and exit.
        let stop_result = self.backend.stop().await;

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Frame accumulation task panicked: {}", e);
            }
        }

        self.started_at = None;
        stop_result?;

        let samples = {
            let mut buf = self.samples.lock().await;
            std::mem::take(&mut *buf)
        };

        let (sample_rate, channels) = (*self.observed_spec.lock().await)
            .unwrap_or((self.config.sample_rate, self.config.channels));

        let filename = format!("voice_live_{}", Utc::now().timestamp_millis());
        let clip = AudioClip::from_samples(filename, &samples, sample_rate, channels)?;

        info!(
            "Recording stopped: {:.1}s captured ({} samples)",
            clip.duration_secs,
            samples.len()
        );

        Ok(clip)
    }
}
