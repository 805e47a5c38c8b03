//! Entities of the relay domain.

use super::value_object::{ConnectionId, Location, MessageKind, Timestamp, UserId};

/// Identity a client claims when it registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub user_id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Registration {
    pub fn new(user_id: UserId, name: String) -> Self {
        Self {
            user_id,
            name,
            email: None,
            phone: None,
        }
    }
}

/// The relay's record that a user is online through some connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRecord {
    pub user_id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Connection that owns this record
    pub connection_id: ConnectionId,
    pub last_active: Timestamp,
}

impl PresenceRecord {
    pub fn new(registration: Registration, connection_id: ConnectionId, now: Timestamp) -> Self {
        Self {
            user_id: registration.user_id,
            name: registration.name,
            email: registration.email,
            phone: registration.phone,
            connection_id,
            last_active: now,
        }
    }

    /// Whether the record has had no heartbeat for more than `max_idle_ms`.
    pub fn is_stale(&self, now: Timestamp, max_idle_ms: i64) -> bool {
        self.last_active < now.minus_millis(max_idle_ms)
    }
}

/// A relayed chat, alert or emergency message. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub name: String,
    pub text: String,
    /// Sender identifier as reported by the client; may be empty
    pub sender_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Client-supplied send time
    pub timestamp: Timestamp,
    pub kind: MessageKind,
    pub location: Option<Location>,
}

impl Message {
    /// Whether the message is older than `max_age_ms` relative to `now`.
    pub fn is_expired(&self, now: Timestamp, max_age_ms: i64) -> bool {
        self.timestamp < now.minus_millis(max_age_ms)
    }

    /// First 30 characters of the body, with an ellipsis when truncated.
    pub fn preview(&self) -> String {
        const PREVIEW_CHARS: usize = 30;
        let mut chars = self.text.chars();
        let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}
