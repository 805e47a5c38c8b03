//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `RelayEvent` を JSON にエンコードして送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、送信のみを担当します。
//! 送信は fire-and-forget で、切断済みの相手への送信失敗は握りつぶします。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, RelayEvent},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のコネクションの送信チャンネル
    connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new(connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { connections }
    }

    fn encode(event: &RelayEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(event))
            .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel) {
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        self.connections.lock().await.insert(connection_id, sender);
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) {
        self.connections.lock().await.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let connections = self.connections.lock().await;

        let sender = connections
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ConnectionNotFound(connection_id.to_string()))?;
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed '{}' to connection '{}'", event.name(), connection_id);
        Ok(())
    }

    async fn broadcast(&self, event: &RelayEvent) -> Result<usize, MessagePushError> {
        let frame = Self::encode(event)?;
        let connections = self.connections.lock().await;

        let mut delivered = 0;
        for (connection_id, sender) in connections.iter() {
            // 一部の送信失敗は許容し、残りの接続への送信を続ける
            match sender.send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    "Failed to push '{}' to connection '{}': {}",
                    event.name(),
                    connection_id,
                    e
                ),
            }
        }
        tracing::debug!(
            "Broadcasted '{}' to {}/{} connections",
            event.name(),
            delivered,
            connections.len()
        );

        Ok(delivered)
    }
}
