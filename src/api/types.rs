use serde::{Deserialize, Serialize};

/// Parsed body of a successful analysis response
///
/// `explanations` is an opaque, schema-less attachment; its shape is not
/// defined by the service contract and it is passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub id: String,
    pub is_real: bool,
    /// Confidence as reported by the service (fraction in [0, 1])
    pub confidence: f64,
    #[serde(default)]
    pub prob_fake: f64,
    /// Decoded audio duration in seconds
    pub duration: f64,
    pub sample_rate: u32,
    /// Server-side processing latency in milliseconds
    pub processing_ms: u64,
    /// ISO-8601 timestamp assigned by the service
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanations: Option<serde_json::Value>,
}
