//! Server configuration.

use std::time::Duration;

/// Runtime settings of the relay server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port number to bind to
    pub port: u16,
    /// Allowed cross-origin value; `*` allows any origin
    pub allowed_origin: String,
    /// Period of the stale presence sweep
    pub sweep_interval: Duration,
    /// Idle time after which a presence record is stale
    pub presence_timeout: Duration,
    /// Period of the message expiry pass
    pub expire_interval: Duration,
    /// Age after which a message is expired
    pub message_retention: Duration,
}

impl ServerConfig {
    pub const ANY_ORIGIN: &'static str = "*";

    /// Upper bound of the sweep and expire periods (one year)
    pub const MAX_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

    /// `true` when any origin is accepted
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origin == Self::ANY_ORIGIN
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            allowed_origin: Self::ANY_ORIGIN.to_string(),
            sweep_interval: Duration::from_secs(60),
            presence_timeout: Duration::from_secs(120),
            expire_interval: Duration::from_secs(60 * 60),
            message_retention: Duration::from_secs(24 * 60 * 60),
        }
    }
}
