//! Events the relay pushes to connections.

use super::entity::{Message, PresenceRecord};

/// Server → client event, independent of the wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    /// Full snapshot sent to a connection right after it registers
    Initialize {
        messages: Vec<Message>,
        active_users: Vec<PresenceRecord>,
    },
    /// Current presence list
    ActiveUsers(Vec<PresenceRecord>),
    NewMessage(Message),
    Emergency(Message),
}

impl RelayEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialize { .. } => "initialize",
            Self::ActiveUsers(_) => "activeUsers",
            Self::NewMessage(_) => "newMessage",
            Self::Emergency(_) => "emergency",
        }
    }
}
