//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::ServerConfig,
    hub::{HubUseCases, RelayHub},
    usecase::GetRelayStatusUseCase,
};

use super::{
    handler::{get_status, health_check, root, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Safety chat relay server
///
/// Owns the hub use cases until `serve` spawns the hub task.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(hub_usecases, get_relay_status_usecase, config);
/// server.run().await?;
/// ```
pub struct Server {
    /// Hub が駆動するユースケース群
    hub_usecases: HubUseCases,
    /// GetRelayStatusUseCase（状態取得のユースケース）
    get_relay_status_usecase: Arc<GetRelayStatusUseCase>,
    config: ServerConfig,
}

impl Server {
    pub fn new(
        hub_usecases: HubUseCases,
        get_relay_status_usecase: Arc<GetRelayStatusUseCase>,
        config: ServerConfig,
    ) -> Self {
        Self {
            hub_usecases,
            get_relay_status_usecase,
            config,
        }
    }

    /// Bind the configured address and serve until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Safety chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// The hub task is spawned here and stopped, together with its timers, as
    /// soon as `shutdown` resolves.
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cors = cors_layer(&self.config)?;

        let (hub, hub_handle) = RelayHub::new(self.hub_usecases, &self.config);
        let hub_token = CancellationToken::new();
        let hub_task = tokio::spawn(hub.run(hub_token.clone()));

        let app_state = Arc::new(AppState {
            hub: hub_handle,
            get_relay_status_usecase: self.get_relay_status_usecase,
            config: self.config,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/", get(root))
            .route("/api/health", get(health_check))
            .route("/api/status", get(get_status))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        let shutdown_token = hub_token.clone();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                shutdown_token.cancel();
            })
            .await;

        hub_token.cancel();
        if let Err(e) = hub_task.await {
            tracing::warn!("Hub task ended abnormally: {}", e);
        }
        result?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// CORS policy for the configured origin
fn cors_layer(
    config: &ServerConfig,
) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let cors = CorsLayer::new().allow_methods([Method::GET, Method::POST]);
    if config.allows_any_origin() {
        return Ok(cors.allow_origin(Any));
    }
    Ok(cors.allow_origin(HeaderValue::from_str(&config.allowed_origin)?))
}
