//! Dispatch router server.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────┐
//!                   │                 DISPATCH ROUTER                  │
//!                   │                                                  │
//!  Client Request   │  ┌──────────┐    ┌────────────┐    ┌──────────┐  │
//!  ─────────────────┼─▶│   http   │───▶│  dispatch  │───▶│ routing  │  │
//!                   │  │  server  │    │  (service) │    │  table   │  │
//!                   │  └──────────┘    └─────┬──────┘    └──────────┘  │
//!                   │                        │                         │
//!  Client Response  │                        ▼                         │
//!  ◀────────────────┼──────────────── handler(request, params)         │
//!                   │                  or 404 / 405 / 500              │
//!                   │                                                  │
//!                   │  ┌────────────────────────────────────────────┐  │
//!                   │  │  config (+watcher)  observability  lifecycle│  │
//!                   │  └────────────────────────────────────────────┘  │
//!                   └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use dispatch_router::config::{load_config, watcher::ConfigWatcher, RouterConfig};
use dispatch_router::http::HttpServer;
use dispatch_router::lifecycle::Shutdown;
use dispatch_router::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "dispatch-router")]
#[command(about = "Serve config-defined routes through the dispatch table", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("dispatch-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        routes = config.routes.len(),
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

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path, config.routes.clone());
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    let server = HttpServer::from_config(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
