//! ffmcp binary: serves the FFmpeg tools over stdio or HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ffmcp_media::{check_ffmpeg, check_ffprobe};
use ffmcp_server::{create_router, metrics, serve_stdio, AppState, ServerConfig};

#[derive(Parser)]
#[command(name = "ffmcp")]
#[command(author, version, about = "FFmpeg tools over the Model Context Protocol")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve a single client over stdin/stdout
    Local,

    /// Serve MCP over HTTP
    Host {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Shared secret clients must send in X-API-Key
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing()?;

    for check in [check_ffmpeg(), check_ffprobe()] {
        if let Err(e) = check {
            warn!("{}; tools will report it on use", e);
        }
    }

    let config = ServerConfig::from_env();

    match cli.command {
        Command::Local => {
            let state = AppState::new(config).context("Failed to create application state")?;
            serve_stdio(Arc::clone(&state.mcp)).await?;
        }
        Command::Host {
            host,
            port,
            api_key,
        } => {
            let mut config = config;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if api_key.is_some() {
                config = config.with_api_key(api_key);
            }
            serve_http(config).await?;
        }
    }

    Ok(())
}

/// Logs always go to stderr; in local mode stdout carries the protocol.
fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("ffmcp=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    Ok(())
}

async fn serve_http(config: ServerConfig) -> anyhow::Result<()> {
    info!(
        "Server config: host={}, port={}, auth={}",
        config.host,
        config.port,
        config.auth_enabled()
    );
    if !config.auth_enabled() {
        warn!("No API key configured; the HTTP endpoint is open to anyone who can reach it");
    }

    let metrics_handle = if config.metrics_enabled {
        info!("Prometheus metrics enabled at /metrics");
        Some(metrics::init_metrics().context("Failed to install Prometheus recorder")?)
    } else {
        None
    };

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    let state = AppState::new(config).context("Failed to create application state")?;
    let app = create_router(state, metrics_handle);

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
