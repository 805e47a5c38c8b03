//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header::ORIGIN},
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    hub::HubHandle,
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let origin = headers.get(ORIGIN).and_then(|value| value.to_str().ok());
    if !state.accepts_origin(origin) {
        tracing::warn!(
            "Rejecting WebSocket upgrade from origin '{}'",
            origin.unwrap_or_default()
        );
        return Err(StatusCode::FORBIDDEN);
    }

    let hub = state.hub.clone();
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, hub)))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Channel receiver for frames produced by the hub
/// * `sender` - WebSocket sink to send frames to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, hub: HubHandle) {
    let connection_id = ConnectionId::generate();
    let (sender, mut receiver) = socket.split();

    // Register the outbound channel before any client event reaches the hub
    let (tx, rx) = mpsc::unbounded_channel();
    if let Err(e) = hub.connect(connection_id.clone(), tx) {
        tracing::warn!("Dropping connection '{}': {}", connection_id, e);
        return;
    }

    let recv_hub = hub.clone();
    let recv_connection_id = connection_id.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", recv_connection_id, text);

                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(
                                "Ignoring malformed frame from '{}': {}",
                                recv_connection_id,
                                e
                            );
                            continue;
                        }
                    };

                    if let Err(e) = recv_hub.client_event(recv_connection_id.clone(), event) {
                        tracing::warn!("Failed to forward event: {}", e);
                        break;
                    }
                }
                Message::Close(_) => {
                    tracing::debug!("Client '{}' requested close", recv_connection_id);
                    break;
                }
                // Ping/pong is answered by the transport; binary frames are ignored
                _ => {}
            }
        }
    });

    // Spawn a task to deliver hub frames to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = hub.disconnect(connection_id.clone()) {
        tracing::debug!("Disconnect of '{}' not delivered: {}", connection_id, e);
    }
}
