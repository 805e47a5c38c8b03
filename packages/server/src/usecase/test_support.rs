//! Shared fixtures for use case tests.

use std::sync::Arc;

use haven_shared::time::ManualClock;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, MessagePusher, MessageRepository, PresenceRepository},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryMessageRepository, InMemoryPresenceRepository},
    },
};

pub(crate) struct TestRelay {
    pub presence: Arc<InMemoryPresenceRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub clock: Arc<ManualClock>,
}

impl TestRelay {
    pub fn new(start_millis: i64) -> Self {
        Self {
            presence: Arc::new(InMemoryPresenceRepository::default()),
            messages: Arc::new(InMemoryMessageRepository::default()),
            pusher: Arc::new(WebSocketMessagePusher::default()),
            clock: Arc::new(ManualClock::new(start_millis)),
        }
    }

    /// Open a connection and return the receiving end of its outbound channel.
    pub async fn open(&self, id: &str) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection_id = ConnectionId::new(id.to_string()).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        self.presence.connect(connection_id.clone()).await;
        self.pusher
            .register_connection(connection_id.clone(), tx)
            .await;
        (connection_id, rx)
    }

    pub async fn message_count(&self) -> usize {
        self.messages.count().await
    }
}

/// Everything currently queued on a connection, decoded as JSON.
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).unwrap());
    }
    frames
}

/// Names of the queued events, in order.
pub(crate) fn event_names(frames: &[serde_json::Value]) -> Vec<String> {
    frames
        .iter()
        .map(|f| f["event"].as_str().unwrap_or_default().to_string())
        .collect()
}
