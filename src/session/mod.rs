//! Analysis session management
//!
//! This module provides the session state machine and its collaborators:
//! - `AnalysisSession`: idle → analyzing → complete lifecycle, auth gating,
//!   single in-flight submission, explicit failure path back to idle
//! - `HistoryStore`: newest-first append-only log of completed analyses
//! - `AnalysisRecord`: one completed verdict with its metadata

mod config;
mod history;
mod record;
mod session;

pub use config::SessionConfig;
pub use history::HistoryStore;
pub use record::{normalize_confidence, AnalysisRecord};
pub use session::{AnalysisSession, SessionState};
