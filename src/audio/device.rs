//! Microphone capture backend built on cpal
//!
//! The cpal stream is not `Send`, so a dedicated capture thread owns it and
//! forwards frames over a tokio channel. Stopping flips a shared flag and
//! joins the thread, which drops the stream and releases the device.

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};
use crate::error::AcquireError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

pub struct DeviceBackend {
    config: AudioBackendConfig,
    capturing: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl DeviceBackend {
    pub fn new(config: AudioBackendConfig) -> Self {
        Self {
            config,
            capturing: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }
}

fn map_device_error(message: String) -> AcquireError {
    let lower = message.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") {
        AcquireError::PermissionDenied
    } else {
        AcquireError::DeviceError(message)
    }
}

fn run_capture(
    frame_tx: mpsc::Sender<AudioFrame>,
    ready_tx: oneshot::Sender<Result<(), AcquireError>>,
    capturing: Arc<AtomicBool>,
) {
    let built = (|| -> Result<cpal::Stream, AcquireError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(AcquireError::DeviceNotFound)?;

        info!("Using input device: {}", device.name().unwrap_or_default());

        let supported = device
            .default_input_config()
            .map_err(|e| map_device_error(e.to_string()))?;

        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels();
        let sample_format = supported.sample_format();
        let stream_config = supported.config();
        let started = Instant::now();

        let err_fn = |err: cpal::StreamError| {
            error!("Audio capture stream error: {}", err);
        };

        let stream = match sample_format {
            cpal::SampleFormat::F32 => device
                .build_input_stream(
                    &stream_config,
                    move |data: &[f32], _| {
                        let samples: Vec<i16> = data
                            .iter()
                            .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                            .collect();
                        let frame = AudioFrame {
                            samples,
                            sample_rate,
                            channels,
                            timestamp_ms: started.elapsed().as_millis() as u64,
                        };
                        // Drop frames rather than block the audio callback
                        let _ = frame_tx.try_send(frame);
                    },
                    err_fn,
                    None,
                )
                .map_err(|e| map_device_error(e.to_string()))?,
            cpal::SampleFormat::I16 => device
                .build_input_stream(
                    &stream_config,
                    move |data: &[i16], _| {
                        let frame = AudioFrame {
                            samples: data.to_vec(),
                            sample_rate,
                            channels,
                            timestamp_ms: started.elapsed().as_millis() as u64,
                        };
                        let _ = frame_tx.try_send(frame);
                    },
                    err_fn,
                    None,
                )
                .map_err(|e| map_device_error(e.to_string()))?,
            other => {
                return Err(AcquireError::DeviceError(format!(
                    "unsupported sample format: {other:?}"
                )))
            }
        };

        stream
            .play()
            .map_err(|e| map_device_error(e.to_string()))?;

        Ok(stream)
    })();

    match built {
        Ok(stream) => {
            let _ = ready_tx.send(Ok(()));
            while capturing.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(50));
            }
            drop(stream);
            info!("Microphone released");
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for DeviceBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, AcquireError> {
        // Buffer roughly ten seconds of frames before the callback starts
        // dropping them
        let capacity = (10_000 / self.config.buffer_duration_ms.max(1)).max(16) as usize;
        let (frame_tx, frame_rx) = mpsc::channel(capacity);
        let (ready_tx, ready_rx) = oneshot::channel();

        self.capturing.store(true, Ordering::SeqCst);
        let capturing = Arc::clone(&self.capturing);

        let handle = std::thread::spawn(move || run_capture(frame_tx, ready_tx, capturing));
        self.thread = Some(handle);

        match ready_rx.await {
            Ok(Ok(())) => Ok(frame_rx),
            Ok(Err(e)) => {
                self.capturing.store(false, Ordering::SeqCst);
                self.thread.take();
                Err(e)
            }
            Err(_) => {
                self.capturing.store(false, Ordering::SeqCst);
                self.thread.take();
                Err(AcquireError::DeviceError(
                    "capture thread exited before startup".to_string(),
                ))
            }
        }
    }

    async fn stop(&mut self) -> Result<(), AcquireError> {
        self.capturing.store(false, Ordering::SeqCst);

        if let Some(handle) = self.thread.take() {
            tokio::task::spawn_blocking(move || handle.join())
                .await
                .ok();
        }

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "device"
    }
}
