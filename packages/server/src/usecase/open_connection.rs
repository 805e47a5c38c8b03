//! UseCase: 接続開始処理

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PresenceRepository, PusherChannel};

/// Accepts a new transport connection in the `Unregistered` state.
pub struct OpenConnectionUseCase {
    presence: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl OpenConnectionUseCase {
    pub fn new(
        presence: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence,
            message_pusher,
        }
    }

    /// Track the connection and start delivering broadcasts to it.
    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.presence.connect(connection_id.clone()).await;
        self.message_pusher
            .register_connection(connection_id, sender)
            .await;
    }
}
