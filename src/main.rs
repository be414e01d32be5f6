//! # DSU Server
//!
//! Relay game-controller state to PC clients over the DSU (cemuhook)
//! UDP protocol.
//!
//! The binary wires the protocol engine to a UDP socket: it loads
//! configuration, generates the per-process server identifier, binds the
//! well-known port, and drives the dispatch loop until Ctrl+C.

use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn};

mod config;
mod dsu;
mod error;
mod input;
mod server;

use config::Config;
use input::DisconnectedInput;
use server::{DsuEngine, DsuServer};

/// Configuration file consulted when present
const CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for the DSU server
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (falling back to defaults if no file exists)
///    - Generate the per-process server identifier
///    - Bind the UDP socket on the configured port
///
/// 2. **Main Loop**
///    - Receive datagrams, dispatch them through the protocol engine,
///      and send responses back to each requester
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Signal the dispatch loop to stop
///    - Release the socket and exit cleanly
///
/// # Errors
///
/// Returns error if:
/// - The configured port cannot be bound
/// - The socket fails while serving
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("DSU server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match Config::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(error::DsuServerError::Io(_)) => {
            warn!("No configuration at {}, using defaults", CONFIG_PATH);
            Config::default()
        }
        Err(err) => return Err(err.into()),
    };

    // Generated once per process, stamped into every outgoing header
    let server_id: u32 = rand::random();

    let engine = DsuEngine::new(
        server_id,
        config.slot.descriptor_template()?,
        Box::new(DisconnectedInput),
    );

    let mut server = DsuServer::bind(config.bind_addr()?, engine).await?;
    info!("Press Ctrl+C to exit");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down...");
            let _ = shutdown_tx.send(true);
        }
    });

    server.run(shutdown_rx).await?;
    Ok(())
}
