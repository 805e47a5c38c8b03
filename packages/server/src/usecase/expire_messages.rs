//! UseCase: 期限切れメッセージの削除

use std::{sync::Arc, time::Duration};

use haven_shared::time::Clock;

use crate::domain::{MessageRepository, Timestamp};

use super::duration_millis;

/// Background message expiry.
///
/// Pruning is silent: no event is broadcast, clients drop expired messages
/// from their own views.
pub struct ExpireMessagesUseCase {
    messages: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
    retention: Duration,
}

impl ExpireMessagesUseCase {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        clock: Arc<dyn Clock>,
        retention: Duration,
    ) -> Self {
        Self {
            messages,
            clock,
            retention,
        }
    }

    /// Remove messages older than the retention window. Returns the count.
    pub async fn execute(&self) -> usize {
        let now = Timestamp::new(self.clock.now_millis());
        let removed = self
            .messages
            .prune_older_than(duration_millis(self.retention), now)
            .await;

        if removed > 0 {
            tracing::info!("Cleaned up {} expired messages", removed);
        }
        removed
    }
}
