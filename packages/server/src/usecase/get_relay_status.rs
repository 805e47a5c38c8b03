//! UseCase: リレー状態の取得

use std::sync::Arc;

use crate::domain::{MessageRepository, PresenceRepository};

/// Point-in-time counters of the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayStatus {
    pub connections: usize,
    pub active_users: usize,
    pub messages: usize,
}

pub struct GetRelayStatusUseCase {
    presence: Arc<dyn PresenceRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl GetRelayStatusUseCase {
    pub fn new(presence: Arc<dyn PresenceRepository>, messages: Arc<dyn MessageRepository>) -> Self {
        Self { presence, messages }
    }

    pub async fn execute(&self) -> RelayStatus {
        RelayStatus {
            connections: self.presence.count_connections().await,
            active_users: self.presence.count_users().await,
            messages: self.messages.count().await,
        }
    }
}
