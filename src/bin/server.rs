//! jsontab Server Binary
//!
//! Seeds tables from the data directory, then serves the TCP protocol.

use std::sync::Arc;
use clap::Parser;
use jsontab::network::Server;
use jsontab::{bootstrap, Config, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// jsontab Server
#[derive(Parser, Debug)]
#[command(name = "jsontab-server")]
#[command(about = "JSON document store over a line-oriented TCP protocol")]
#[command(version)]
struct Args {
    /// Data directory (table files and seed files)
    #[arg(short, long, default_value = "./dbJsons")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:3030")]
    listen: String,

    /// Line that terminates a request
    #[arg(short, long, default_value = "END")]
    terminator: String,

    /// Extra seed files (relative to the data directory)
    seed_files: Vec<String>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jsontab=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("jsontab Server v{}", jsontab::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .terminator(&args.terminator)
        .seed_files(args.seed_files)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // Open store
    let store = match Store::open(&config.data_dir) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    let report = bootstrap::run(&store, &config);
    if let Ok(summary) = serde_json::to_string(&report) {
        tracing::debug!("Bootstrap report: {}", summary);
    }

    // Start server
    let server = match Server::bind(config, store) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
