use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub audio: AudioSettings,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the analysis service
    pub base_url: String,
    /// Request timeout in seconds (0 = no timeout)
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioSettings {
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Retention cap: oldest records are evicted past this count
    pub max_records: usize,
}

impl Config {
    /// Load configuration from defaults, an optional TOML file, and
    /// VOXCHECK__-prefixed environment variables (e.g.
    /// VOXCHECK__API__BASE_URL overrides `api.base_url`).
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("api.base_url", "http://127.0.0.1:8130")?
            .set_default("api.timeout_secs", 30i64)?
            .set_default("audio.sample_rate", 16000i64)?
            .set_default("audio.channels", 1i64)?
            .set_default("history.max_records", 100i64)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("VOXCHECK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
