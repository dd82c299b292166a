use crate::error::AcquireError;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for audio capture backends
#[derive(Debug, Clone)]
pub struct AudioBackendConfig {
    /// Target sample rate
    pub sample_rate: u32,
    /// Target channel count (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Buffer size in milliseconds (affects latency)
    pub buffer_duration_ms: u64,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            buffer_duration_ms: 100,
        }
    }
}

/// Audio capture backend trait
///
/// Implementations:
/// - Device: cpal microphone capture (requires the `device-capture` feature)
/// - File: reads frames from a WAV file (testing / batch analysis)
///
/// A backend owns its capture resource exclusively between `start` and
/// `stop`; `stop` must release it even when no frames were produced.
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, AcquireError>;

    /// Stop capturing audio and release the underlying resource
    async fn stop(&mut self) -> Result<(), AcquireError>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

impl std::fmt::Debug for dyn AudioBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioBackend")
            .field("name", &self.name())
            .finish()
    }
}

/// Audio capture source
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Microphone input
    Device,
    /// WAV file input (for testing/batch analysis)
    File(PathBuf),
}

/// Audio backend factory
pub struct AudioBackendFactory;

impl AudioBackendFactory {
    /// Create an audio backend for the requested source
    pub fn create(
        source: AudioSource,
        config: AudioBackendConfig,
    ) -> Result<Box<dyn AudioBackend>, AcquireError> {
        match source {
            AudioSource::Device => {
                #[cfg(feature = "device-capture")]
                {
                    let backend = super::device::DeviceBackend::new(config);
                    Ok(Box::new(backend))
                }

                #[cfg(not(feature = "device-capture"))]
                {
                    let _ = config;
                    Err(AcquireError::DeviceError(
                        "built without the device-capture feature".to_string(),
                    ))
                }
            }

            AudioSource::File(path) => {
                let backend = super::file::FileBackend::new(path, config);
                Ok(Box::new(backend))
            }
        }
    }
}
