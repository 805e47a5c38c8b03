//! Presence/Broadcast Hub.
//!
//! A single actor task owns every registry and store mutation. Connection
//! handlers feed it typed commands over one channel and both periodic timers
//! live inside its loop, so all transitions are applied one at a time in
//! arrival order.

mod command;
mod relay_hub;

pub use command::{HubCommand, HubError, HubHandle};
pub use relay_hub::{HubUseCases, RelayHub};
