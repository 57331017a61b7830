//! compdir Server Binary
//!
//! Opens the data file and starts the TCP server.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use compdir::network::Server;
use compdir::{Config, Store, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// compdir Server
#[derive(Parser, Debug)]
#[command(name = "compdir-server")]
#[command(about = "Company directory server over a fixed-width data file")]
#[command(version)]
struct Args {
    /// Data file
    #[arg(short, long, default_value = "./companies.csv")]
    data_file: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Connection worker threads
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Maximum connections waiting for a worker
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Start from an empty data file
    #[arg(long)]
    fresh: bool,

    /// When to fsync the data file
    #[arg(long, value_enum, default_value = "every-write")]
    sync: SyncArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SyncArg {
    EveryWrite,
    OnClose,
}

impl From<SyncArg> for SyncStrategy {
    fn from(arg: SyncArg) -> Self {
        match arg {
            SyncArg::EveryWrite => SyncStrategy::EveryWrite,
            SyncArg::OnClose => SyncStrategy::OnClose,
        }
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,compdir=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("compdir Server v{}", compdir::VERSION);
    tracing::info!("Data file: {}", args.data_file);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .data_file(&args.data_file)
        .truncate_on_open(args.fresh)
        .sync_strategy(args.sync.into())
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .max_connections(args.max_connections)
        .build();

    let store = match Store::open_with_config(&config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::new(config, Arc::clone(&store)) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, initiating shutdown...");
        shutdown.shutdown();
    }) {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::process::exit(1);
    }

    let mut exit_code = 0;
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        exit_code = 1;
    }

    // Every worker has been joined, so nothing is in flight
    if let Err(e) = store.close() {
        tracing::error!("Failed to close store: {}", e);
        exit_code = 1;
    }

    std::process::exit(exit_code);
}
