//! MessagePusher trait 定義
//!
//! 接続中のクライアントへイベントを送信するためのインターフェース。
//! WebSocket などの具体的な送信手段は Infrastructure 層が実装します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, event::RelayEvent, value_object::ConnectionId};

/// Outbound channel of one connection; carries encoded frames.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Start delivering events to a connection
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Stop delivering events to a connection
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// Send one event to one connection
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError>;

    /// Send one event to every connection, registered or not.
    ///
    /// Per-connection failures are skipped; returns how many connections the
    /// event was handed to.
    async fn broadcast(&self, event: &RelayEvent) -> Result<usize, MessagePushError>;
}
