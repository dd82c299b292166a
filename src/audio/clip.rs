use crate::error::AcquireError;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Where a clip came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipSource {
    Upload,
    Record,
}

/// A single in-memory audio resource, ready for submission
///
/// Exactly one clip is produced per completed acquisition, whether it came
/// from the recorder or a file upload.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Display name of the source audio
    pub filename: String,
    /// Declared media type (e.g. "audio/wav")
    pub media_type: String,
    /// Container/codec display label (e.g. ".WAV")
    pub format: String,
    /// Best-effort duration in seconds (the analysis response is
    /// authoritative once a submission completes)
    pub duration_secs: f64,
    /// Acquisition source
    pub source: ClipSource,
    /// Encoded audio bytes
    pub bytes: Vec<u8>,
}

impl AudioClip {
    /// Encode captured PCM samples as an in-memory WAV clip
    ///
    /// An empty sample buffer is valid and produces an empty (header-only)
    /// clip rather than an error.
    pub fn from_samples(
        filename: impl Into<String>,
        samples: &[i16],
        sample_rate: u32,
        channels: u16,
    ) -> Result<Self, AcquireError> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| AcquireError::Encode(e.to_string()))?;
            for &sample in samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| AcquireError::Encode(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| AcquireError::Encode(e.to_string()))?;
        }

        let duration_secs = samples.len() as f64 / (sample_rate as f64 * channels as f64);

        Ok(Self {
            filename: filename.into(),
            media_type: "audio/wav".to_string(),
            format: ".WAV".to_string(),
            duration_secs,
            source: ClipSource::Record,
            bytes: cursor.into_inner(),
        })
    }

    /// True when the clip carries no audio payload
    ///
    /// A WAV header with zero samples counts as empty.
    pub fn is_empty(&self) -> bool {
        if self.bytes.is_empty() {
            return true;
        }
        self.format == ".WAV" && self.duration_secs == 0.0
    }
}

/// Display label from a filename extension (e.g. "voice.wav" -> ".WAV")
pub fn format_label(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!(".{}", ext.to_uppercase()),
        _ => String::new(),
    }
}
