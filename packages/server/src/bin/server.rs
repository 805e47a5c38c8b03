//! Safety chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin haven-server
//! cargo run --bin haven-server -- --host 127.0.0.1 --port 3001 --allowed-origin http://localhost:3000
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use haven_server::{
    config::ServerConfig,
    hub::HubUseCases,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        notifier::LogEmergencyNotifier,
        repository::{InMemoryMessageRepository, InMemoryPresenceRepository},
    },
    ui::Server,
    usecase::GetRelayStatusUseCase,
};
use haven_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "haven-server")]
#[command(about = "Real-time presence and message relay for safety chat", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3001")]
    port: u16,

    /// Allowed cross-origin value (`*` allows any origin)
    #[arg(long, env = "CLIENT_URL", default_value = "*")]
    allowed_origin: String,

    /// Seconds between stale presence sweeps
    #[arg(
        long,
        default_value = "60",
        value_parser = clap::value_parser!(u64).range(1..=ServerConfig::MAX_INTERVAL_SECS)
    )]
    sweep_interval_secs: u64,

    /// Seconds without a heartbeat after which a user is removed
    #[arg(long, default_value = "120")]
    presence_timeout_secs: u64,

    /// Seconds between message expiry passes
    #[arg(
        long,
        default_value = "3600",
        value_parser = clap::value_parser!(u64).range(1..=ServerConfig::MAX_INTERVAL_SECS)
    )]
    expire_interval_secs: u64,

    /// Seconds a message is retained
    #[arg(long, default_value = "86400")]
    message_retention_secs: u64,

    /// Default log level, overridden by `RUST_LOG`
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            allowed_origin: args.allowed_origin,
            sweep_interval: Duration::from_secs(args.sweep_interval_secs),
            presence_timeout: Duration::from_secs(args.presence_timeout_secs),
            expire_interval: Duration::from_secs(args.expire_interval_secs),
            message_retention: Duration::from_secs(args.message_retention_secs),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(args);

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. MessagePusher
    // 3. EmergencyNotifier and Clock
    // 4. UseCases
    // 5. Server

    // 1. Create Repositories (in-memory, process lifetime)
    let presence = Arc::new(InMemoryPresenceRepository::default());
    let messages = Arc::new(InMemoryMessageRepository::default());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create EmergencyNotifier and Clock
    let notifier = Arc::new(LogEmergencyNotifier::new());
    let clock = Arc::new(SystemClock);

    // 4. Create UseCases
    let hub_usecases = HubUseCases::new(
        presence.clone(),
        messages.clone(),
        message_pusher,
        notifier,
        clock,
        &config,
    );
    let get_relay_status_usecase = Arc::new(GetRelayStatusUseCase::new(presence, messages));

    // 5. Create and run the server
    let server = Server::new(hub_usecases, get_relay_status_usecase, config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
