use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use voicelog_host::{ChannelId, MemoryHost, Plugin, SentMessage, SettingValue};
use voicelog_sdk::{
    init_logging, EventOutcome, HostServices, LoggingMode, Settings, TracingDiagnostics, VoiceLog,
};

pub mod fixture;

use fixture::Fixture;

/// Voice Log Replay
///
/// Loads a host fixture and settings, replays the fixture's voice-state
/// batches through the voice log and prints every message the host would
/// have posted.
#[derive(Parser, Debug)]
#[command(name = "voicelog-replay")]
#[command(about = "Replay voice-state batches through the voice log")]
#[command(version)]
pub struct Args {
    /// Fixture with the host directory, session and batches
    #[arg(short, long, default_value = "voicelog-replay/fixtures/sample.json")]
    pub fixture: PathBuf,

    /// Settings JSON (defaults to the user config file when present)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Logging mode (silent, development, debug); overrides --log-level
    #[arg(long, value_name = "MODE")]
    pub log_mode: Option<String>,

    /// Make every send to this channel fail (repeatable)
    #[arg(long = "fail-channel", value_name = "CHANNEL_ID")]
    pub fail_channels: Vec<String>,

    /// Print sent messages as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the settings schema and exit
    #[arg(long)]
    pub list_schema: bool,
}

impl Args {
    /// Validate command line arguments
    pub fn validate(&self) -> Result<()> {
        match self.log_level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}'. Valid levels: error, warn, info, debug, trace",
                    self.log_level
                ));
            }
        }

        if let Some(mode) = &self.log_mode {
            if LoggingMode::from_name(mode).is_none() {
                return Err(anyhow::anyhow!(
                    "Invalid log mode '{}'. Valid modes: silent, development, debug",
                    mode
                ));
            }
        }

        if let Some(blank) = self.fail_channels.iter().find(|id| id.trim().is_empty()) {
            return Err(anyhow::anyhow!("Invalid --fail-channel '{}'", blank));
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments and environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub fixture: PathBuf,
    pub settings: Option<PathBuf>,
    pub log_level: String,
    pub log_mode: Option<LoggingMode>,
    pub fail_channels: Vec<ChannelId>,
    pub json: bool,
    pub list_schema: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            fixture: args.fixture,
            settings: args.settings,
            log_level: args.log_level.to_lowercase(),
            log_mode: args.log_mode.as_deref().and_then(LoggingMode::from_name),
            fail_channels: args.fail_channels.into_iter().map(ChannelId::new).collect(),
            json: args.json,
            list_schema: args.list_schema,
        }
    }
}

impl Config {
    /// Create configuration from command line arguments and environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    fn from_args(mut args: Args) -> Result<Self> {
        if let Ok(fixture) = std::env::var("VOICELOG_FIXTURE") {
            args.fixture = PathBuf::from(fixture);
        }

        if args.settings.is_none() {
            if let Ok(settings) = std::env::var("VOICELOG_SETTINGS") {
                args.settings = Some(PathBuf::from(settings));
            }
        }

        if args.log_mode.is_none() {
            if let Ok(mode) = std::env::var("VOICELOG_LOG_MODE") {
                args.log_mode = Some(mode);
            }
        }

        args.validate()?;

        Ok(Config::from(args))
    }

    /// Load the settings file, falling back to the user config, then defaults
    pub fn load_settings(&self) -> Result<Settings> {
        if let Some(path) = &self.settings {
            return Settings::from_path(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()));
        }

        match Settings::default_path() {
            Ok(path) if path.exists() => {
                info!("Using settings from {}", path.display());
                Settings::from_path(&path)
                    .with_context(|| format!("Failed to load settings from {}", path.display()))
            }
            _ => {
                info!("No settings file, using defaults");
                Ok(Settings::default())
            }
        }
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        info!("Configuration:");
        info!("  Fixture: {}", self.fixture.display());
        match &self.settings {
            Some(path) => info!("  Settings: {}", path.display()),
            None => info!("  Settings: user config or defaults"),
        }
        info!("  Failing channels: {:?}", self.fail_channels);
        match self.log_mode {
            Some(mode) => info!("  Log mode: {:?}", mode),
            None => info!("  Log level: {}", self.log_level),
        }
    }
}

/// Initialize tracing from the configured mode or log level
///
/// `VOICELOG_LOG_LEVEL` / `RUST_LOG` still take precedence when set.
fn init_tracing(config: &Config) -> Result<()> {
    if let Some(mode) = config.log_mode {
        init_logging(mode)?;
        if mode != LoggingMode::Silent && !voicelog_sdk::logging::is_initialized() {
            return Err(anyhow::anyhow!("Logging mode {:?} installed no subscriber", mode));
        }
        return Ok(());
    }

    let log_level = config.log_level.as_str();
    let filter = voicelog_sdk::logging::create_env_filter(log_level)
        .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

fn print_schema() {
    for descriptor in Settings::schema() {
        let default = match &descriptor.default {
            SettingValue::Boolean(value) => value.to_string(),
            SettingValue::String(value) => format!("{:?}", value),
        };
        let read_only = if descriptor.read_only { " (read-only)" } else { "" };
        println!("{}{} = {}", descriptor.key, read_only, default);
        println!("    {}", descriptor.description);
    }
}

fn print_message(sent: &SentMessage) {
    let author = sent
        .message
        .author
        .as_ref()
        .map(|a| a.username.as_str())
        .unwrap_or("?");
    println!("#{} <{}> {}", sent.channel_id, author, sent.message.content);
}

/// Replay every batch of the fixture, returning the accepted messages
async fn replay(config: &Config, fixture: Fixture, settings: Settings) -> Result<Vec<SentMessage>> {
    let host = Arc::new(MemoryHost::from_snapshot(fixture.host));
    for channel_id in &config.fail_channels {
        host.fail_sends_to(channel_id.clone());
    }

    let services = HostServices::from_host(Arc::clone(&host), Arc::new(TracingDiagnostics::new()));
    let mut plugin = VoiceLog::new(settings, services);

    plugin.start().await.context("Failed to start voice log")?;

    let mut processed = 0;
    let mut failed = 0;
    for (index, batch) in fixture.batches.iter().enumerate() {
        let outcomes = plugin.process(batch).await;
        info!("Batch {}: {:?}", index + 1, outcomes);

        for outcome in outcomes {
            if let EventOutcome::Processed { failed: f, .. } = outcome {
                processed += 1;
                failed += f;
            }
        }
    }

    plugin.stop().await.context("Failed to stop voice log")?;

    if failed > 0 {
        warn!("{} message(s) failed to send", failed);
    }
    info!("Processed {} event(s)", processed);

    Ok(host.take_sent())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to parse configuration")?;

    init_tracing(&config).context("Failed to initialize logging")?;

    if config.list_schema {
        print_schema();
        return Ok(());
    }

    config.print_summary();

    let fixture = Fixture::load(&config.fixture)?;
    let settings = config.load_settings()?;
    info!(
        "Replaying {} batch(es), {} event(s)",
        fixture.batches.len(),
        fixture.event_count()
    );

    match replay(&config, fixture, settings).await {
        Ok(sent) => {
            if config.json {
                println!("{}", serde_json::to_string_pretty(&sent)?);
            } else {
                sent.iter().for_each(print_message);
            }
        }
        Err(e) => {
            error!("Replay failed: {:#}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
