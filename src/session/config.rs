use serde::{Deserialize, Serialize};

/// Configuration for an analysis session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// History retention cap; the oldest records are evicted past this
    pub max_history: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_history: 100 }
    }
}
