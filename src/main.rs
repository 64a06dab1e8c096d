//! service-adapter binary.
//!
//! Serves the echo service through the adapter:
//!
//! ```text
//! config (TOML + CLI overrides)
//!     → logging initialised
//!     → HttpServer bound
//!     → run until SIGINT/SIGTERM
//!     → graceful shutdown
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use service_adapter::config::{load_config, validate_config, AdapterConfig, LogFormat};
use service_adapter::http::echo::echo_service;
use service_adapter::lifecycle::wait_for_signal;
use service_adapter::observability::init_logging;
use service_adapter::HttpServer;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "service-adapter", version, about = "HTTP service adapter running the echo service")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration.
    #[arg(short, long)]
    port: Option<u16>,

    /// Log output format, overriding the configuration.
    #[arg(long, value_enum)]
    log_format: Option<LogFormatArg>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AdapterConfig::default(),
    };
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    if let Some(format) = cli.log_format {
        config.observability.log_format = format.into();
    }
    validate_config(&config).map_err(|errors| {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    })?;

    init_logging(&config.observability)?;

    let server = HttpServer::new(config);
    let listener = &server.config().listener;
    tracing::info!(
        bind_address = %listener.bind_address,
        port = listener.port,
        max_connections = listener.max_connections,
        "Configuration loaded"
    );

    let server = server.start(echo_service()).await?;
    tracing::info!(address = %server.local_addr(), "Listening for connections");

    wait_for_signal().await;
    server.shutdown().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
