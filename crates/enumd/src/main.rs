// # enumd - ENUM Reconciliation Daemon
//
// Thin integration layer: all ENUM logic lives in enum-core.
//
// The enumd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Loading the ENUM configuration file and the subscriber export
// 3. Running one reconciliation sweep against PowerDNS
// 4. Cancelling the sweep on SIGTERM / SIGINT
// 5. Printing the sweep report as JSON on stdout
//
// ## Configuration
//
// - `ENUM_CONFIG`: Path to the JSON ENUM configuration (required)
// - `ENUM_SUBSCRIBERS`: Path to the JSON subscriber export (required)
// - `ENUM_ENABLED`: Override `enabled` from the configuration file (optional)
// - `ENUM_STRICT_MODE`: Override `strict_mode` from the configuration file (optional)
// - `ENUM_MODE`: `live` (default) or `dry-run`
// - `ENUM_LOG_LEVEL`: trace, debug, info (default), warn, error
//
// ## Example
//
// ```bash
// export ENUM_CONFIG=/etc/enum/enum.json
// export ENUM_SUBSCRIBERS=/var/lib/enum/subscribers.json
// export ENUM_MODE=dry-run
//
// enumd > report.json
// ```

use anyhow::{Context, Result};
use enum_core::{EnumConfig, EnumEngine, FileSubscriberSource, ReconcileReport, SyncStatus};
use enum_provider_powerdns::PowerDnsTransport;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::sync::oneshot;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumExitCode {
    /// Sweep finished (possibly with per-subscriber failures)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
    /// Sweep ran but ended with status `error`
    SweepFailed = 3,
}

impl From<EnumExitCode> for ExitCode {
    fn from(code: EnumExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl EnumExitCode {
    /// Exit code for a finished sweep
    fn for_status(status: SyncStatus) -> Self {
        if status == SyncStatus::Error {
            EnumExitCode::SweepFailed
        } else {
            EnumExitCode::CleanShutdown
        }
    }
}

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq)]
struct Config {
    config_path: PathBuf,
    subscribers_path: PathBuf,
    enabled: Option<bool>,
    strict_mode: Option<bool>,
    dry_run: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a variable
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config_path = lookup("ENUM_CONFIG").context("ENUM_CONFIG is required")?;
        let subscribers_path = lookup("ENUM_SUBSCRIBERS").context("ENUM_SUBSCRIBERS is required")?;

        let mode = lookup("ENUM_MODE").unwrap_or_default().to_lowercase();
        let dry_run = match mode.as_str() {
            "" | "live" => false,
            "dry-run" => true,
            other => anyhow::bail!(
                "ENUM_MODE '{}' is not valid. Valid modes: live, dry-run",
                other
            ),
        };

        Ok(Self {
            config_path: PathBuf::from(config_path),
            subscribers_path: PathBuf::from(subscribers_path),
            enabled: parse_flag("ENUM_ENABLED", lookup("ENUM_ENABLED"))?,
            strict_mode: parse_flag("ENUM_STRICT_MODE", lookup("ENUM_STRICT_MODE"))?,
            dry_run,
            log_level: lookup("ENUM_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.config_path.as_os_str().is_empty() {
            anyhow::bail!("ENUM_CONFIG cannot be empty");
        }

        if self.subscribers_path.as_os_str().is_empty() {
            anyhow::bail!("ENUM_SUBSCRIBERS cannot be empty");
        }

        // Validate log level
        if self.level().is_none() {
            anyhow::bail!(
                "ENUM_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        Ok(())
    }

    fn level(&self) -> Option<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }

    /// Read the ENUM configuration file and apply the environment overrides
    fn load_enum_config(&self) -> Result<EnumConfig> {
        let text = std::fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read {}", self.config_path.display()))?;
        let mut enum_config = EnumConfig::from_json(&text)
            .with_context(|| format!("Failed to parse {}", self.config_path.display()))?;

        if let Some(enabled) = self.enabled {
            enum_config.enabled = enabled;
        }
        if let Some(strict_mode) = self.strict_mode {
            enum_config.strict_mode = strict_mode;
        }

        Ok(enum_config)
    }
}

/// Parse an optional boolean variable
fn parse_flag(name: &str, value: Option<String>) -> Result<Option<bool>> {
    let Some(value) = value else {
        return Ok(None);
    };

    match value.trim().to_lowercase().as_str() {
        "" => Ok(None),
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => anyhow::bail!("{} '{}' is not a boolean", name, value),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return EnumExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return EnumExitCode::ConfigError.into();
    }

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level().unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return EnumExitCode::ConfigError.into();
    }

    info!("Starting enumd");

    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return EnumExitCode::ConfigError.into();
        }
    };

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return EnumExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run_daemon(&config, &engine).await {
            Ok(report) => EnumExitCode::for_status(report.status),
            Err(e) => {
                error!("Daemon error: {:#}", e);
                EnumExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Build the engine from the configuration file and the PowerDNS transport
fn build_engine(config: &Config) -> Result<EnumEngine> {
    let enum_config = config.load_enum_config()?;

    let transport = if config.dry_run {
        warn!("PowerDNS transport running in DRY-RUN mode - no changes will be made");
        PowerDnsTransport::new_dry_run()?
    } else {
        PowerDnsTransport::new_live()?
    };

    info!(
        "Configuration loaded: {} endpoint(s), strict mode {}",
        enum_config.endpoints.len(),
        if enum_config.strict_mode { "on" } else { "off" }
    );

    let engine = EnumEngine::new(Box::new(transport), enum_config)?;
    if !engine.is_enabled() {
        warn!("ENUM management is disabled - the sweep will not contact any endpoint");
    }

    Ok(engine)
}

/// Run one reconciliation sweep, cancelled by SIGTERM / SIGINT
async fn run_daemon(config: &Config, engine: &EnumEngine) -> Result<ReconcileReport> {
    let source = FileSubscriberSource::new(&config.subscribers_path).await?;
    info!(
        "Loaded {} subscriber(s) from {}",
        source.len().await,
        source.path().display()
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let signal_task = tokio::spawn(async move {
        match wait_for_shutdown().await {
            Ok(signal) => {
                info!("Received shutdown signal: {}, stopping after current page", signal);
                let _ = shutdown_tx.send(());
            }
            Err(e) => error!("Shutdown handler error: {}", e),
        }
    });

    let report = engine
        .reconcile_all_with_shutdown(&source, Some(shutdown_rx))
        .await;
    signal_task.abort();

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    Ok(report)
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
