//! riskscore - Command Line Operations for Real-Time Risk Scoring
//!
//! This is the operational entry point for the risk scoring engine.
//!
//! # Commands
//!
//! - `riskscore assess --request <json>` - Score one assessment request
//! - `riskscore check` - Validate and print the effective configuration
//! - `riskscore demo` - Run the canonical scenarios in memory
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate loads configuration, sets up
//! logging and wires the engine crates together.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

use config::{build_config, CliArgs, LogFormat, ServiceConfig};
pub use error::{CliError, Result};

/// Real-time multi-factor risk scoring CLI
#[derive(Parser)]
#[command(name = "riskscore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE", env = "RISKSCORE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Assessment deadline in milliseconds
    #[arg(long, global = true)]
    deadline_ms: Option<u64>,

    /// URL of a remote fraud scorer
    #[arg(long, global = true)]
    fraud_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one assessment request
    Assess {
        /// Path to a JSON request file, or the request JSON itself
        #[arg(short, long)]
        request: String,

        /// Answer the fraud check with this native score instead of calling out
        #[arg(long)]
        fraud_score: Option<f64>,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Check configuration and print the effective settings
    Check,

    /// Run the canonical assessment scenarios against in-memory collaborators
    Demo,
}

impl Cli {
    fn config_args(&self) -> CliArgs {
        let fraud_score = match &self.command {
            Commands::Assess { fraud_score, .. } => *fraud_score,
            _ => None,
        };
        CliArgs {
            config_file: self.config.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            deadline_ms: self.deadline_ms,
            fraud_endpoint: self.fraud_endpoint.clone(),
            fraud_score,
        }
    }
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(config: &ServiceConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.as_filter_str()));
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli.config_args())?;

    init_tracing(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        log_level = %config.log_level,
        deadline_ms = config.engine.deadline_ms,
        event_topic = %config.engine.event_topic,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Assess {
            request, format, ..
        } => commands::assess::run(&config, &request, &format).await?,
        Commands::Check => commands::check::run(&config)?,
        Commands::Demo => commands::demo::run(&config.engine).await?,
    }

    Ok(())
}
