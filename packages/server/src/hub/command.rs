//! Commands accepted by the hub and the handle used to send them.

use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, PusherChannel},
    infrastructure::dto::websocket::{ClientEvent, RegisterPayload, SendMessagePayload},
};

/// One transition request, tagged with the connection it came from
#[derive(Debug)]
pub enum HubCommand {
    Connect {
        connection_id: ConnectionId,
        sender: PusherChannel,
    },
    Register {
        connection_id: ConnectionId,
        payload: RegisterPayload,
    },
    SendMessage {
        connection_id: ConnectionId,
        payload: SendMessagePayload,
    },
    UpdatePresence {
        connection_id: ConnectionId,
    },
    Disconnect {
        connection_id: ConnectionId,
    },
}

impl HubCommand {
    /// Wrap a decoded client event
    pub fn from_client_event(connection_id: ConnectionId, event: ClientEvent) -> Self {
        match event {
            ClientEvent::Register(payload) => Self::Register {
                connection_id,
                payload,
            },
            ClientEvent::SendMessage(payload) => Self::SendMessage {
                connection_id,
                payload,
            },
            ClientEvent::UpdatePresence => Self::UpdatePresence { connection_id },
        }
    }

    pub fn connection_id(&self) -> &ConnectionId {
        match self {
            Self::Connect { connection_id, .. }
            | Self::Register { connection_id, .. }
            | Self::SendMessage { connection_id, .. }
            | Self::UpdatePresence { connection_id }
            | Self::Disconnect { connection_id } => connection_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("hub is not running")]
    Stopped,
}

/// Cloneable sender side of the hub's command channel
#[derive(Debug, Clone)]
pub struct HubHandle {
    commands: mpsc::UnboundedSender<HubCommand>,
}

impl HubHandle {
    pub(super) fn new(commands: mpsc::UnboundedSender<HubCommand>) -> Self {
        Self { commands }
    }

    pub fn send(&self, command: HubCommand) -> Result<(), HubError> {
        self.commands.send(command).map_err(|_| HubError::Stopped)
    }

    pub fn connect(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), HubError> {
        self.send(HubCommand::Connect {
            connection_id,
            sender,
        })
    }

    pub fn client_event(
        &self,
        connection_id: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), HubError> {
        self.send(HubCommand::from_client_event(connection_id, event))
    }

    pub fn disconnect(&self, connection_id: ConnectionId) -> Result<(), HubError> {
        self.send(HubCommand::Disconnect { connection_id })
    }
}
