//! Error types for acquisition, submission, sessions, and auth
//!
//! Each stage of the flow has its own enum so callers can match on the
//! failure kind instead of parsing message strings.

use thiserror::Error;

/// Failures while acquiring audio, from either capture or upload.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("Microphone access denied. Please allow microphone access and try again.")]
    PermissionDenied,

    #[error("No microphone found. Please connect a microphone and try again.")]
    DeviceNotFound,

    #[error("Could not access microphone: {0}")]
    DeviceError(String),

    #[error("{filename}: unsupported media type {media_type}, expected an audio file")]
    InvalidMediaType { filename: String, media_type: String },

    #[error("failed to read audio file: {0}")]
    Io(String),

    #[error("failed to encode audio: {0}")]
    Encode(String),
}

impl AcquireError {
    /// Whether retrying the same acquisition could plausibly succeed.
    /// Permission and media-type failures need user action first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AcquireError::DeviceError(_) | AcquireError::Io(_) | AcquireError::Encode(_)
        )
    }
}

/// Failures while submitting audio for analysis.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("no audio data to analyze")]
    EmptyAudio,

    /// The clip's declared media type is not a parseable MIME string.
    /// An input problem, caught before any request is sent.
    #[error("invalid media type: {0}")]
    InvalidMediaType(String),

    /// Non-2xx response. The message is the response body when the
    /// service sent one, otherwise the canonical status text.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("analysis cancelled")]
    Cancelled,
}

/// Failures at the session level.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not signed in")]
    AuthRequired,

    #[error("an analysis is already in progress")]
    AlreadyAnalyzing,

    #[error("no record with id {0}")]
    UnknownRecord(String),

    #[error("audio for record {0} is no longer available")]
    SourceUnavailable(String),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// Credential validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Email is required")]
    EmailRequired,

    #[error("Please enter a valid email")]
    EmailInvalid,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Name is required")]
    NameRequired,
}
