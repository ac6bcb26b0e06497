//! Hiroba chat relay server.
//!
//! Clients connect over WebSocket, send messages into rooms and fetch room history.
//! Every accepted message is fanned out to all live connections.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000
//! HIROBA_DELIVERY_TIMEOUT_MS=2000 cargo run --bin hiroba-server
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use hiroba_server::{
    config::{
        DEFAULT_CONNECTION_TTL_SECS, DEFAULT_DELIVERY_TIMEOUT_MS, DEFAULT_OUTBOUND_BUFFER,
        DEFAULT_SWEEP_INTERVAL_SECS, ServerConfig,
    },
    infrastructure::repository::{InMemoryConnectionRepository, InMemoryMessageRepository},
    ui::Server,
};
use hiroba_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Real-time chat relay with WebSocket fan-out", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HIROBA_PORT", default_value = "8080")]
    port: u16,

    /// Lifetime of a connection record in seconds
    #[arg(long, env = "HIROBA_CONNECTION_TTL_SECS", default_value_t = DEFAULT_CONNECTION_TTL_SECS)]
    connection_ttl_secs: u64,

    /// Timeout of a single delivery in milliseconds
    #[arg(long, env = "HIROBA_DELIVERY_TIMEOUT_MS", default_value_t = DEFAULT_DELIVERY_TIMEOUT_MS)]
    delivery_timeout_ms: u64,

    /// Depth of each connection's outbound queue
    #[arg(long, env = "HIROBA_OUTBOUND_BUFFER", default_value_t = DEFAULT_OUTBOUND_BUFFER)]
    outbound_buffer: usize,

    /// Interval of the expired connection sweeper in seconds
    #[arg(long, env = "HIROBA_SWEEP_INTERVAL_SECS", default_value_t = DEFAULT_SWEEP_INTERVAL_SECS)]
    sweep_interval_secs: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            connection_ttl: Duration::from_secs(args.connection_ttl_secs),
            delivery_timeout: Duration::from_millis(args.delivery_timeout_ms),
            outbound_buffer: args.outbound_buffer,
            sweep_interval: Duration::from_secs(args.sweep_interval_secs),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(&[env!("CARGO_BIN_NAME"), "tower-http"], "debug");

    let config = ServerConfig::from(Args::parse());
    tracing::debug!("Starting with {:?}", config);

    // Initialize dependencies in order:
    // 1. Clock
    // 2. Stores (in-memory)
    // 3. Server (wires directory, broadcaster, use cases and handlers)
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let connections = Arc::new(InMemoryConnectionRepository::new(clock.clone()));
    let messages = Arc::new(InMemoryMessageRepository::new(clock.clone()));

    let server = Server::new(config, connections, messages, clock);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
