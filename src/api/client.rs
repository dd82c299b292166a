use super::types::AnalysisResponse;
use crate::audio::AudioClip;
use crate::config::ApiConfig;
use crate::error::SubmitError;
use reqwest::multipart;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Client for the analysis service
///
/// Performs exactly one network submission per call: multipart POST of the
/// audio resource to `{base_url}/api/analyze`, field name `file`. No retry.
#[derive(Clone)]
pub struct AnalyzeClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalyzeClient {
    pub fn new(config: &ApiConfig) -> Result<Self, SubmitError> {
        let mut builder = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit one audio resource and parse the verdict
    pub async fn analyze(&self, clip: &AudioClip) -> Result<AnalysisResponse, SubmitError> {
        if clip.is_empty() {
            return Err(SubmitError::EmptyAudio);
        }

        let url = format!("{}/api/analyze", self.base_url);
        debug!("Submitting {} ({} bytes) to {}", clip.filename, clip.bytes.len(), url);

        let part = multipart::Part::bytes(clip.bytes.clone())
            .file_name(clip.filename.clone())
            .mime_str(&clip.media_type)
            .map_err(|_| SubmitError::InvalidMediaType(clip.media_type.clone()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                body
            };
            return Err(SubmitError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: AnalysisResponse = response
            .json()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        info!(
            "Analysis {}: is_real={}, confidence={:.4}, {}ms",
            parsed.id, parsed.is_real, parsed.confidence, parsed.processing_ms
        );

        Ok(parsed)
    }

    /// Submit with cooperative cancellation
    ///
    /// Aborting an in-flight submission drops the request future; the
    /// caller sees [`SubmitError::Cancelled`].
    pub async fn analyze_with_cancel(
        &self,
        clip: &AudioClip,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResponse, SubmitError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(SubmitError::Cancelled),
            result = self.analyze(clip) => result,
        }
    }
}
