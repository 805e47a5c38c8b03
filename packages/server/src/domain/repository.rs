//! Repository trait 定義
//!
//! ユースケースが必要とする状態アクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{Message, PresenceRecord, Registration},
    value_object::{ConnectionId, Timestamp, UserId},
};

/// Presence repository: storage behind the Connection Registry.
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// Record a new, unregistered connection
    async fn connect(&self, connection_id: ConnectionId);

    /// Insert or overwrite the user's presence record; returns the replaced one
    async fn register(
        &self,
        connection_id: ConnectionId,
        registration: Registration,
        now: Timestamp,
    ) -> Option<PresenceRecord>;

    /// Refresh a user's last-active time; `false` when the record is gone
    async fn touch(&self, user_id: &UserId, now: Timestamp) -> bool;

    /// User id the connection is registered as
    async fn user_of(&self, connection_id: &ConnectionId) -> Option<UserId>;

    /// Forget a connection and delete the record it still owns
    async fn remove(&self, connection_id: &ConnectionId) -> Option<PresenceRecord>;

    /// Delete records idle for longer than `max_idle_ms`; returns the count
    async fn sweep_stale(&self, max_idle_ms: i64, now: Timestamp) -> usize;

    /// Current presence records
    async fn snapshot(&self) -> Vec<PresenceRecord>;

    async fn count_connections(&self) -> usize;

    async fn count_users(&self) -> usize;
}

/// Message repository: storage behind the Message Store.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn append(&self, message: Message);

    /// Delete messages older than `max_age_ms`; returns the count
    async fn prune_older_than(&self, max_age_ms: i64, now: Timestamp) -> usize;

    /// Messages in arrival order
    async fn all(&self) -> Vec<Message>;

    async fn count(&self) -> usize;
}
