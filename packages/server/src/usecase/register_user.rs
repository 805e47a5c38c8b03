//! UseCase: ユーザー登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterUserUseCase::execute() メソッド
//! - 登録者への initialize 送信と全接続への activeUsers ブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ユーザーの登録
//! - 上書き：同じ user id での再登録（後勝ち）
//! - 異常系：initialize を送れない接続からの登録

use std::sync::Arc;

use haven_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, MessageRepository, PresenceRecord, PresenceRepository,
    Registration, RelayEvent, Timestamp,
};

use super::error::RegisterError;

/// Unregistered --register--> Registered
pub struct RegisterUserUseCase {
    presence: Arc<dyn PresenceRepository>,
    messages: Arc<dyn MessageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl RegisterUserUseCase {
    pub fn new(
        presence: Arc<dyn PresenceRepository>,
        messages: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            presence,
            messages,
            message_pusher,
            clock,
        }
    }

    /// 登録を実行
    ///
    /// Stores the presence record (overwriting any record for the same user
    /// id), replies to the registrant with the full snapshot and broadcasts
    /// the updated presence list to every connection.
    ///
    /// # Returns
    ///
    /// * `Ok(Option<PresenceRecord>)` - the record this registration replaced
    /// * `Err(RegisterError)` - the snapshot could not be delivered; the
    ///   registration and broadcast still took effect
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        registration: Registration,
    ) -> Result<Option<PresenceRecord>, RegisterError> {
        let now = Timestamp::new(self.clock.now_millis());
        let user_id = registration.user_id.clone();
        let name = registration.name.clone();

        let replaced = self
            .presence
            .register(connection_id.clone(), registration, now)
            .await;
        if let Some(old) = &replaced {
            if old.connection_id != connection_id {
                tracing::info!(
                    "User '{}' re-registered from connection '{}', evicting session on '{}'",
                    user_id,
                    connection_id,
                    old.connection_id
                );
            }
        }

        let active_users = self.presence.snapshot().await;
        let initialize = RelayEvent::Initialize {
            messages: self.messages.all().await,
            active_users: active_users.clone(),
        };
        let initialize_result = self
            .message_pusher
            .push_to(&connection_id, &initialize)
            .await;

        if let Err(e) = self
            .message_pusher
            .broadcast(&RelayEvent::ActiveUsers(active_users))
            .await
        {
            tracing::warn!("Failed to broadcast active users: {}", e);
        }

        tracing::info!("User registered: {} ({})", name, user_id);

        initialize_result
            .map(|()| replaced)
            .map_err(RegisterError::InitializeFailed)
    }
}
