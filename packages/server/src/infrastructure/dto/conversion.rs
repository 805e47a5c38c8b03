//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    Location, Message, MessageKind, PresenceRecord, Registration, RelayEvent,
    Timestamp, UserId, ValueObjectError,
};
use crate::infrastructure::dto::{http::StatusDto, websocket as dto};
use crate::usecase::RelayStatus;

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::RegisterPayload> for Registration {
    type Error = ValueObjectError;

    fn try_from(payload: dto::RegisterPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(payload.user_id.unwrap_or_default())?,
            name: payload.name.unwrap_or_default(),
            email: payload.email,
            phone: payload.phone,
        })
    }
}

impl From<dto::LocationDto> for Location {
    fn from(dto: dto::LocationDto) -> Self {
        Self {
            latitude: dto.latitude,
            longitude: dto.longitude,
            accuracy: dto.accuracy,
        }
    }
}

impl From<dto::SendMessagePayload> for Message {
    fn from(payload: dto::SendMessagePayload) -> Self {
        Self {
            name: payload.name.unwrap_or_default(),
            text: payload.text,
            sender_id: payload.user_id.unwrap_or_default(),
            email: payload.email,
            phone: payload.phone,
            timestamp: Timestamp::new(payload.timestamp),
            kind: payload.kind.map(MessageKind::from).unwrap_or_default(),
            location: payload.location.map(Location::from),
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Location> for dto::LocationDto {
    fn from(location: &Location) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            accuracy: location.accuracy,
        }
    }
}

impl From<&Message> for dto::MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            name: message.name.clone(),
            text: message.text.clone(),
            user_id: message.sender_id.clone(),
            email: message.email.clone(),
            phone: message.phone.clone(),
            timestamp: message.timestamp.value(),
            kind: String::from(message.kind.clone()),
            location: message.location.as_ref().map(dto::LocationDto::from),
        }
    }
}

impl From<&PresenceRecord> for dto::PresenceDto {
    fn from(record: &PresenceRecord) -> Self {
        Self {
            user_id: record.user_id.as_str().to_string(),
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            connection_id: record.connection_id.as_str().to_string(),
            last_active: record.last_active.value(),
        }
    }
}

impl From<&RelayEvent> for dto::ServerEvent {
    fn from(event: &RelayEvent) -> Self {
        match event {
            RelayEvent::Initialize {
                messages,
                active_users,
            } => Self::Initialize(dto::InitializePayload {
                messages: messages.iter().map(dto::MessageDto::from).collect(),
                active_users: active_users.iter().map(dto::PresenceDto::from).collect(),
            }),
            RelayEvent::ActiveUsers(records) => {
                Self::ActiveUsers(records.iter().map(dto::PresenceDto::from).collect())
            }
            RelayEvent::NewMessage(message) => Self::NewMessage(message.into()),
            RelayEvent::Emergency(message) => Self::Emergency(message.into()),
        }
    }
}

impl From<RelayStatus> for StatusDto {
    fn from(status: RelayStatus) -> Self {
        Self {
            connections: status.connections,
            active_users: status.active_users,
            messages: status.messages,
        }
    }
}
