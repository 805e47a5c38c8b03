//! InMemory Presence Repository 実装
//!
//! ドメイン層が定義する PresenceRepository trait の具体的な実装。
//! `ConnectionRegistry` ドメインモデルをそのままストレージとして保持します。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, ConnectionRegistry, PresenceRecord, PresenceRepository, Registration,
    Timestamp, UserId,
};

/// インメモリ Presence Repository 実装
pub struct InMemoryPresenceRepository {
    registry: Arc<Mutex<ConnectionRegistry>>,
}

impl InMemoryPresenceRepository {
    /// 新しい InMemoryPresenceRepository を作成
    pub fn new(registry: Arc<Mutex<ConnectionRegistry>>) -> Self {
        Self { registry }
    }
}

impl Default for InMemoryPresenceRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(ConnectionRegistry::new())))
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    async fn connect(&self, connection_id: ConnectionId) {
        self.registry.lock().await.connect(connection_id);
    }

    async fn register(
        &self,
        connection_id: ConnectionId,
        registration: Registration,
        now: Timestamp,
    ) -> Option<PresenceRecord> {
        self.registry
            .lock()
            .await
            .register(connection_id, registration, now)
    }

    async fn touch(&self, user_id: &UserId, now: Timestamp) -> bool {
        self.registry.lock().await.touch(user_id, now)
    }

    async fn user_of(&self, connection_id: &ConnectionId) -> Option<UserId> {
        self.registry.lock().await.user_of(connection_id).cloned()
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<PresenceRecord> {
        self.registry.lock().await.remove(connection_id)
    }

    async fn sweep_stale(&self, max_idle_ms: i64, now: Timestamp) -> usize {
        self.registry.lock().await.sweep_stale(max_idle_ms, now)
    }

    async fn snapshot(&self) -> Vec<PresenceRecord> {
        self.registry.lock().await.snapshot()
    }

    async fn count_connections(&self) -> usize {
        self.registry.lock().await.connection_count()
    }

    async fn count_users(&self) -> usize {
        self.registry.lock().await.user_count()
    }
}
