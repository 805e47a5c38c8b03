//! UseCase: 非アクティブユーザーの掃除

use std::{sync::Arc, time::Duration};

use haven_shared::time::Clock;

use crate::domain::{MessagePusher, PresenceRepository, RelayEvent, Timestamp};

use super::duration_millis;

/// Background presence sweep.
pub struct SweepInactiveUsersUseCase {
    presence: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    /// Records without a heartbeat for longer than this are removed
    presence_timeout: Duration,
}

impl SweepInactiveUsersUseCase {
    pub fn new(
        presence: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        presence_timeout: Duration,
    ) -> Self {
        Self {
            presence,
            message_pusher,
            clock,
            presence_timeout,
        }
    }

    /// Remove stale presence records and broadcast the presence list when
    /// anything was removed. Returns the number removed.
    pub async fn execute(&self) -> usize {
        let now = Timestamp::new(self.clock.now_millis());
        let removed = self
            .presence
            .sweep_stale(duration_millis(self.presence_timeout), now)
            .await;

        if removed == 0 {
            return 0;
        }

        tracing::info!("Removed {} inactive users", removed);
        let active_users = self.presence.snapshot().await;
        if let Err(e) = self
            .message_pusher
            .broadcast(&RelayEvent::ActiveUsers(active_users))
            .await
        {
            tracing::warn!("Failed to broadcast active users: {}", e);
        }
        removed
    }
}
