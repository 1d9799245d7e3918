//! HTTP long-poll broadcast server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kairan-server
//! cargo run --bin kairan-server -- --host 0.0.0.0 --port 3000 --database :memory:
//! ```

use std::sync::Arc;

use clap::Parser;
use kairan_server::{
    broadcast::Coordinator,
    config::ServerConfig,
    domain::DurableLog,
    infrastructure::log::{InMemoryLog, SqliteLog},
    ui::{AppState, Server},
};
use kairan_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    // Initialize dependencies in order:
    // 1. Durable Log
    // 2. Coordinator
    // 3. UseCases (AppState)
    // 4. Server

    // 1. Durable Log
    let clock = Arc::new(SystemClock);
    let log: Arc<dyn DurableLog> = match config.database_path() {
        Some(path) => Arc::new(SqliteLog::open(&path, clock)?),
        None => {
            tracing::info!("Using in-memory durable log, history is lost on exit");
            Arc::new(InMemoryLog::with_clock(clock))
        }
    };

    // 2. Coordinator
    let coordinator = Coordinator::spawn(log.clone(), config.coordinator_config());

    // 3. UseCases
    let state = Arc::new(AppState::new(
        coordinator.clone(),
        log,
        config.poll_timeout(),
    ));

    // 4. Run the server
    Server::new(state, coordinator)
        .run(config.host, config.port)
        .await
}
