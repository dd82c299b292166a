use crate::api::AnalysisResponse;
use crate::audio::{AudioClip, ClipSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed voice-authenticity verdict with its metadata
///
/// Created only on successful completion of a submission, immutable once
/// created; re-analysis produces a new record rather than mutating the old
/// one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Unique within the history store, assigned at creation time
    pub id: String,
    /// Display name of the source audio
    pub filename: String,
    pub source: ClipSource,
    /// Decoded duration in seconds, non-negative
    pub duration_secs: f64,
    /// Container/codec display label (e.g. ".WAV")
    pub format: String,
    pub is_real: bool,
    /// Percentage in [0, 100]
    pub confidence: f64,
    /// Creation time, immutable once set
    pub timestamp: DateTime<Utc>,
    /// Opaque explanation payload passed through from the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanations: Option<serde_json::Value>,
}

impl AnalysisRecord {
    /// Build a record from a submitted clip and its analysis response
    ///
    /// The record id is assigned locally so uniqueness holds regardless of
    /// what the service returns; the response duration is authoritative.
    pub fn from_response(clip: &AudioClip, response: &AnalysisResponse) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            filename: clip.filename.clone(),
            source: clip.source,
            duration_secs: response.duration.max(0.0),
            format: clip.format.clone(),
            is_real: response.is_real,
            confidence: normalize_confidence(response.confidence),
            timestamp: Utc::now(),
            explanations: response.explanations.clone(),
        }
    }
}

/// Normalize a wire confidence into a percentage in [0, 100]
///
/// The service reports a fraction in [0, 1]; values already given as
/// percentages are kept. Everything is clamped into range.
pub fn normalize_confidence(value: f64) -> f64 {
    let pct = if value <= 1.0 { value * 100.0 } else { value };
    pct.clamp(0.0, 100.0)
}
