pub mod api;
pub mod audio;
pub mod auth;
pub mod config;
pub mod error;
pub mod session;

pub use api::{AnalyzeClient, AnalysisResponse};
pub use audio::{
    AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioClip, AudioFile, AudioFrame,
    AudioSource, ClipSource, Recorder,
};
pub use auth::{Authenticator, Credentials, MockAuthenticator, User};
pub use config::Config;
pub use error::{AcquireError, AuthError, SessionError, SubmitError};
pub use session::{AnalysisRecord, AnalysisSession, HistoryStore, SessionConfig, SessionState};
