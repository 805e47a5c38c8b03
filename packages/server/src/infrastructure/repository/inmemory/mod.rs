//! In-memory repositories. State lives for the lifetime of the process and is
//! discarded at shutdown.

mod message;
mod presence;

pub use message::InMemoryMessageRepository;
pub use presence::InMemoryPresenceRepository;
