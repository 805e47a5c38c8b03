//! Domain layer: relay data model, pure state models and the ports the
//! use cases depend on.
//!
//! Infrastructure implements the ports (`PresenceRepository`,
//! `MessageRepository`, `MessagePusher`, `EmergencyNotifier`); the domain
//! itself has no I/O.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_store;
pub mod notifier;
pub mod pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use entity::{Message, PresenceRecord, Registration};
pub use error::{MessagePushError, NotifyError, ValueObjectError};
pub use event::RelayEvent;
pub use message_store::MessageStore;
pub use notifier::EmergencyNotifier;
pub use pusher::{MessagePusher, PusherChannel};
pub use registry::ConnectionRegistry;
pub use repository::{MessageRepository, PresenceRepository};
pub use value_object::{ConnectionId, Location, MessageKind, Timestamp, UserId};
