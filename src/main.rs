use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use voxcheck::audio::{upload, AudioBackendConfig, AudioBackendFactory, AudioSource, Recorder};
use voxcheck::auth::{Authenticator, Credentials, MockAuthenticator};
use voxcheck::session::{AnalysisRecord, AnalysisSession, SessionConfig};
use voxcheck::{AnalyzeClient, Config};

#[derive(Parser)]
#[command(name = "voxcheck", about = "Voice-authenticity analysis client")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<String>,

    /// Email for the mocked sign-in
    #[arg(long, default_value = "user@example.com")]
    email: String,

    /// Password for the mocked sign-in
    #[arg(long, default_value = "secret-1")]
    password: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload an audio file for analysis
    Analyze {
        /// Audio file to submit
        file: PathBuf,
    },
    /// Record from the default microphone, then analyze
    Record {
        /// Recording length in seconds
        #[arg(long, default_value_t = 5)]
        seconds: u64,
    },
}

fn print_record(record: &AnalysisRecord) {
    let verdict = if record.is_real { "REAL" } else { "FAKE" };
    println!(
        "{}  {}  {:.1}%  {:.1}s  {}",
        record.filename, verdict, record.confidence, record.duration_secs, record.timestamp
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(cli.config.as_deref())?;

    info!("voxcheck v{}", env!("CARGO_PKG_VERSION"));
    info!("Analysis endpoint: {}", cfg.api.base_url);

    let client = AnalyzeClient::new(&cfg.api)?;
    let session = AnalysisSession::new(
        client,
        SessionConfig {
            max_history: cfg.history.max_records,
        },
    );

    let authenticator = MockAuthenticator::default();
    let user = authenticator
        .login(&Credentials {
            name: None,
            email: cli.email.clone(),
            password: cli.password.clone(),
        })
        .await?;
    session.login(user).await;

    let clip = match cli.command {
        Command::Analyze { file } => upload::load(&file)?,
        Command::Record { seconds } => {
            let backend_config = AudioBackendConfig {
                sample_rate: cfg.audio.sample_rate,
                channels: cfg.audio.channels,
                ..Default::default()
            };
            let backend = AudioBackendFactory::create(AudioSource::Device, backend_config.clone())?;
            let mut recorder = Recorder::new(backend, backend_config);

            recorder.start().await?;
            while recorder.elapsed_secs() < seconds {
                tokio::time::sleep(Duration::from_secs(1)).await;
                info!("Recording... {}s", recorder.elapsed_secs());
            }
            recorder.stop().await?
        }
    };

    let record = session.analyze(clip).await?;
    print_record(&record);

    let history = session.history().snapshot().await;
    info!("History holds {} record(s)", history.len());

    Ok(())
}
