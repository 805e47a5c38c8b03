//! UseCase layer: one use case per relay transition.
//!
//! Use cases depend only on the domain ports and an injected clock; the hub
//! invokes them one at a time.

mod disconnect_connection;
mod error;
mod expire_messages;
mod get_relay_status;
mod open_connection;
mod register_user;
mod send_message;
mod sweep_inactive_users;
mod update_presence;

#[cfg(test)]
pub(crate) mod test_support;

pub use disconnect_connection::DisconnectConnectionUseCase;
pub use error::{RegisterError, SendMessageError};
pub use expire_messages::ExpireMessagesUseCase;
pub use get_relay_status::{GetRelayStatusUseCase, RelayStatus};
pub use open_connection::OpenConnectionUseCase;
pub use register_user::RegisterUserUseCase;
pub use send_message::SendMessageUseCase;
pub use sweep_inactive_users::SweepInactiveUsersUseCase;
pub use update_presence::UpdatePresenceUseCase;

use std::time::Duration;

/// Duration as whole milliseconds, saturating at `i64::MAX`.
pub(crate) fn duration_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
