use super::config::SessionConfig;
use super::history::HistoryStore;
use super::record::AnalysisRecord;
use crate::api::AnalyzeClient;
use crate::audio::AudioClip;
use crate::auth::User;
use crate::error::SessionError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Analysis session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Analyzing,
    Complete,
}

/// Per-user analysis session
///
/// Tracks at most one in-flight submission and one current record, and
/// reconciles completed analyses with the append-only history store.
/// A failed submission always returns the session to `Idle`; it never
/// sticks in `Analyzing`.
///
/// All methods take `&self`; callers that drive submissions from multiple
/// tasks share the session behind an `Arc`. The completion transition is
/// applied when the response arrives regardless of which task is still
/// watching.
pub struct AnalysisSession {
    client: AnalyzeClient,
    history: HistoryStore,

    user: Mutex<Option<User>>,
    state: Mutex<SessionState>,
    current: Mutex<Option<AnalysisRecord>>,

    /// Guard enforcing at most one in-flight submission
    analyzing: AtomicBool,

    /// Cancellation handle for the in-flight submission, if any
    cancel: Mutex<Option<CancellationToken>>,

    /// Source audio retained per record id so re-analysis can resubmit
    sources: Mutex<HashMap<String, AudioClip>>,
}

impl AnalysisSession {
    pub fn new(client: AnalyzeClient, config: SessionConfig) -> Self {
        Self {
            client,
            history: HistoryStore::new(config.max_history),
            user: Mutex::new(None),
            state: Mutex::new(SessionState::Idle),
            current: Mutex::new(None),
            analyzing: AtomicBool::new(false),
            cancel: Mutex::new(None),
            sources: Mutex::new(HashMap::new()),
        }
    }

    pub async fn login(&self, user: User) {
        info!("User signed in: {}", user.email);
        *self.user.lock().await = Some(user);
    }

    /// Sign out and tear down ephemeral session state
    ///
    /// The history log survives; only the current analysis and state are
    /// reset. An in-flight submission is cancelled.
    pub async fn logout(&self) {
        if let Some(user) = self.user.lock().await.take() {
            info!("User signed out: {}", user.email);
        }
        self.cancel_inflight().await;
        self.reset().await;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user.lock().await.is_some()
    }

    pub async fn user(&self) -> Option<User> {
        self.user.lock().await.clone()
    }

    pub async fn state(&self) -> SessionState {
        *self.state.lock().await
    }

    pub async fn current(&self) -> Option<AnalysisRecord> {
        self.current.lock().await.clone()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Submit one audio resource for analysis
    ///
    /// Requires an authenticated user and no submission in flight. On
    /// success the new record becomes the current analysis and is
    /// prepended to the history. On failure the session returns to `Idle`
    /// and the error is surfaced to the caller.
    pub async fn analyze(&self, clip: AudioClip) -> Result<AnalysisRecord, SessionError> {
        if !self.is_authenticated().await {
            return Err(SessionError::AuthRequired);
        }

        if self
            .analyzing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Rejecting submission: analysis already in progress");
            return Err(SessionError::AlreadyAnalyzing);
        }

        *self.state.lock().await = SessionState::Analyzing;

        let token = CancellationToken::new();
        *self.cancel.lock().await = Some(token.clone());

        let result = self.client.analyze_with_cancel(&clip, &token).await;

        *self.cancel.lock().await = None;
        self.analyzing.store(false, Ordering::SeqCst);

        match result {
            Ok(response) => {
                let record = AnalysisRecord::from_response(&clip, &response);

                {
                    let mut sources = self.sources.lock().await;
                    sources.insert(record.id.clone(), clip);
                    let evicted = self.history.append(record.clone()).await;
                    // Evicted records can never be re-analyzed, so their
                    // retained audio goes with them.
                    for id in &evicted {
                        sources.remove(id);
                    }
                }
                *self.current.lock().await = Some(record.clone());
                *self.state.lock().await = SessionState::Complete;

                info!(
                    "Analysis complete: {} ({}, confidence {:.1}%)",
                    record.id,
                    if record.is_real { "real" } else { "fake" },
                    record.confidence
                );

                Ok(record)
            }
            Err(e) => {
                warn!("Analysis failed, returning to idle: {}", e);
                *self.state.lock().await = SessionState::Idle;
                Err(e.into())
            }
        }
    }

    /// Re-submit the audio behind an existing record
    ///
    /// Produces a new record with a new id, timestamp and confidence; the
    /// original record is left in the history unchanged.
    pub async fn reanalyze(&self, id: &str) -> Result<AnalysisRecord, SessionError> {
        if !self.is_authenticated().await {
            return Err(SessionError::AuthRequired);
        }

        if self.history.get(id).await.is_none() {
            return Err(SessionError::UnknownRecord(id.to_string()));
        }

        let clip = self
            .sources
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::SourceUnavailable(id.to_string()))?;

        self.analyze(clip).await
    }

    /// Surface an existing record as the current analysis
    ///
    /// No side effects on the history store. While a submission is in
    /// flight the lifecycle state is left alone so the submission's own
    /// completion or failure transition is not clobbered.
    pub async fn view(&self, id: &str) -> Result<AnalysisRecord, SessionError> {
        let record = self
            .history
            .get(id)
            .await
            .ok_or_else(|| SessionError::UnknownRecord(id.to_string()))?;

        *self.current.lock().await = Some(record.clone());
        if !self.analyzing.load(Ordering::SeqCst) {
            *self.state.lock().await = SessionState::Complete;
        }

        Ok(record)
    }

    /// Delete a record and its retained source audio
    ///
    /// A missing id is a no-op. Returns whether a record was removed.
    pub async fn delete(&self, id: &str) -> bool {
        self.sources.lock().await.remove(id);
        self.history.remove(id).await
    }

    /// Explicit reset: back to `Idle` with no current analysis
    pub async fn reset(&self) {
        *self.current.lock().await = None;
        *self.state.lock().await = SessionState::Idle;
    }

    /// Abort the in-flight submission, if any
    ///
    /// The submitting caller observes [`crate::error::SubmitError::Cancelled`]
    /// and the session returns to `Idle` through the normal failure path.
    pub async fn cancel_inflight(&self) {
        if let Some(token) = self.cancel.lock().await.as_ref() {
            token.cancel();
        }
    }

    #[cfg(test)]
    pub(crate) async fn retained_source_count(&self) -> usize {
        self.sources.lock().await.len()
    }
}
