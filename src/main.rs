//! headers-by-request proxy.
//!
//! ```text
//!   Client ──▶ request id ──▶ trace ──▶ timeout ──▶ decision lookup ──▶ forward ──▶ Upstream
//!                                                        │
//!                                                        ▼
//!                                               Decision service
//!                                        (headers to set, rewrite rules)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use headers_by_request::config::{load_with_overrides, ConfigError, ConfigOverrides, ProxyConfig};
use headers_by_request::lifecycle::{signals, Shutdown};
use headers_by_request::observability::{logging, metrics};
use headers_by_request::HttpServer;

#[derive(Parser)]
#[command(name = "headers-by-request")]
#[command(about = "Reverse proxy that sets headers and rewrites paths per a remote decision service", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(long)]
    bind: Option<String>,

    /// Override upstream.address.
    #[arg(long)]
    upstream: Option<String>,

    /// Override middleware.url_header_request.
    #[arg(long)]
    decision_url: Option<String>,

    /// Emit a timing event for every request.
    #[arg(long)]
    enable_timing: bool,
}

impl Cli {
    fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let overrides = ConfigOverrides {
            bind_address: self.bind,
            upstream_address: self.upstream,
            decision_url: self.decision_url,
            enable_timing: self.enable_timing,
        };
        load_with_overrides(self.config.as_deref(), overrides)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability);
    tracing::info!("headers-by-request v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        decision_url = %config.middleware.url_header_request,
        enable_timing = config.middleware.enable_timing,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
