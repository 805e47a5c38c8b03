//! UseCase: プレゼンス更新（heartbeat）処理

use std::sync::Arc;

use haven_shared::time::Clock;

use crate::domain::{ConnectionId, PresenceRepository, Timestamp};

/// Registered --heartbeat--> Registered
pub struct UpdatePresenceUseCase {
    presence: Arc<dyn PresenceRepository>,
    clock: Arc<dyn Clock>,
}

impl UpdatePresenceUseCase {
    pub fn new(presence: Arc<dyn PresenceRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { presence, clock }
    }

    /// Refresh `last_active` of the user the connection is registered as.
    ///
    /// Returns `false` (not an error) for unregistered or orphaned
    /// connections and for users that were already swept.
    pub async fn execute(&self, connection_id: &ConnectionId) -> bool {
        let Some(user_id) = self.presence.user_of(connection_id).await else {
            tracing::debug!(
                "Heartbeat from unregistered connection '{}' ignored",
                connection_id
            );
            return false;
        };

        let now = Timestamp::new(self.clock.now_millis());
        let touched = self.presence.touch(&user_id, now).await;
        if !touched {
            tracing::debug!("Heartbeat for '{}' ignored: no presence record", user_id);
        }
        touched
    }
}
