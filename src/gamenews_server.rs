// src/gamenews_server.rs
//
// HTTP server for the news proxy and the three board games.
//
// CLI Options:
// - --config: Path to the server configuration file (default conf/server.conf)
// - --host / --port: Override the bind address from the configuration

use std::sync::Arc;

use clap::Parser;
use gamenews::config::{ServerConfig, DEFAULT_CONFIG_PATH};
use gamenews::logging::{log_error_stderr, log_info, set_max_level};
use gamenews::server::{start_server, AppState};

#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
#[command(about = "News & Games Server - REST API for news and casual board games")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Configuration file to load
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Address to bind, overrides the configuration file
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides the configuration file
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = ServerConfig::load_from_or_default(&args.config);
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    set_max_level(config.log_level);

    if config.news_api_key.is_none() {
        log_info("No news API key configured; news requests will likely be rejected upstream");
    }

    let app_state = match AppState::from_config(config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            log_error_stderr(&format!("Failed to create HTTP client: {e}"));
            std::process::exit(1);
        }
    };

    let (server_handle, shutdown_signal, _addr) = match start_server(app_state).await {
        Ok(started) => started,
        Err(_) => std::process::exit(1),
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        log_error_stderr(&format!("Failed to listen for shutdown signal: {e}"));
    }

    log_info("Shutdown requested. Stopping API server...");
    shutdown_signal.notify_one();

    if let Err(e) = server_handle.await {
        log_error_stderr(&format!("Error waiting for server shutdown: {e:?}"));
    }

    log_info("API server stopped successfully.");
}
