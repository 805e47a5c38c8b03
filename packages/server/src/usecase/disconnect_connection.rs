//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectConnectionUseCase::execute() メソッド
//! - 所有するプレゼンスレコードの削除と、残りの接続への activeUsers 通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済み接続の切断
//! - 未登録接続の切断（通知なし）
//! - 新しい登録に置き換えられた接続の切断（新しいレコードは残る）

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PresenceRecord, PresenceRepository, RelayEvent};

/// * --disconnect--> Closed
pub struct DisconnectConnectionUseCase {
    presence: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectConnectionUseCase {
    pub fn new(
        presence: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// Returns the presence record that was deleted, if any. The updated
    /// presence list is broadcast only when a record was actually deleted.
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<PresenceRecord> {
        self.message_pusher
            .unregister_connection(connection_id)
            .await;

        let Some(removed) = self.presence.remove(connection_id).await else {
            tracing::info!("Unknown user disconnected ('{}')", connection_id);
            return None;
        };

        tracing::info!(
            "User disconnected: {} ({})",
            removed.name,
            removed.user_id
        );

        let active_users = self.presence.snapshot().await;
        if let Err(e) = self
            .message_pusher
            .broadcast(&RelayEvent::ActiveUsers(active_users))
            .await
        {
            tracing::warn!("Failed to broadcast active users: {}", e);
        }

        Some(removed)
    }
}
