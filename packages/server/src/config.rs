//! Runtime configuration for the relay server.

use std::time::Duration;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
/// 24 hours
pub const DEFAULT_CONNECTION_TTL_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_DELIVERY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Server configuration
///
/// Built by the binary from command line arguments / `HIROBA_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Lifetime of a connection record before it is treated as expired
    pub connection_ttl: Duration,
    /// Upper bound for a single delivery attempt; expiry counts as a failed delivery
    pub delivery_timeout: Duration,
    /// Depth of each connection's outbound queue
    pub outbound_buffer: usize,
    /// Period of the expired-record sweeper
    pub sweep_interval: Duration,
}

impl ServerConfig {
    /// Address to bind, e.g. `127.0.0.1:8080`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connection_ttl: Duration::from_secs(DEFAULT_CONNECTION_TTL_SECS),
            delivery_timeout: Duration::from_millis(DEFAULT_DELIVERY_TIMEOUT_MS),
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}
