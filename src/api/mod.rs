pub mod client;
pub mod types;

pub use client::AnalyzeClient;
pub use types::AnalysisResponse;
