//! API forwarder.
//!
//! Serves a frontend host application and relays every request whose URL
//! contains `/api/` to the backend named by `API_SERVER_URL`.
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────┐
//!     ──────────────────────┼─▶ forward middleware ── /api/ ──▶ reqwest ─┼──▶ Backend
//!                           │         │                                │
//!                           │         ▼ (no marker)                    │
//!                           │   host router (/health, static, 404)     │
//!     Client Response       │                                          │
//!     ◀─────────────────────┼── relayed response or 502 ◀──────────────┼──── Backend
//!                           └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_forwarder::config::{load_config, ConfigOverrides};
use api_forwarder::http::HttpServer;
use api_forwarder::lifecycle::{signals, Shutdown};
use api_forwarder::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "api-forwarder")]
#[command(about = "Relay /api/ requests to a backend and serve everything else", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:4321.
    #[arg(short, long)]
    bind: Option<String>,

    /// Backend base URL; overrides API_SERVER_URL.
    #[arg(long)]
    backend_url: Option<String>,

    /// Directory of frontend assets served for non-API requests.
    #[arg(long)]
    static_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        bind_address: cli.bind,
        backend_url: cli.backend_url,
        static_dir: cli.static_dir,
    };
    let config = load_config(cli.config.as_deref(), &overrides)?;

    logging::init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.upstream.base_url,
        marker = %config.upstream.marker,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
