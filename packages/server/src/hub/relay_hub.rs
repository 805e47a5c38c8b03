//! The hub actor.

use std::{sync::Arc, time::Duration};

use haven_shared::time::Clock;
use tokio::{
    sync::mpsc,
    time::{self, Instant, Interval, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::ServerConfig,
    domain::{
        EmergencyNotifier, Message, MessagePusher, MessageRepository, PresenceRepository,
        Registration,
    },
    usecase::{
        DisconnectConnectionUseCase, ExpireMessagesUseCase, OpenConnectionUseCase,
        RegisterUserUseCase, SendMessageUseCase, SweepInactiveUsersUseCase,
        UpdatePresenceUseCase,
    },
};

use super::command::{HubCommand, HubHandle};

/// Use cases the hub drives
pub struct HubUseCases {
    pub open_connection: Arc<OpenConnectionUseCase>,
    pub register_user: Arc<RegisterUserUseCase>,
    pub send_message: Arc<SendMessageUseCase>,
    pub update_presence: Arc<UpdatePresenceUseCase>,
    pub disconnect_connection: Arc<DisconnectConnectionUseCase>,
    pub sweep_inactive_users: Arc<SweepInactiveUsersUseCase>,
    pub expire_messages: Arc<ExpireMessagesUseCase>,
}

impl HubUseCases {
    /// Build every hub use case over the same repositories and pusher.
    pub fn new(
        presence: Arc<dyn PresenceRepository>,
        messages: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        notifier: Arc<dyn EmergencyNotifier>,
        clock: Arc<dyn Clock>,
        config: &ServerConfig,
    ) -> Self {
        Self {
            open_connection: Arc::new(OpenConnectionUseCase::new(
                presence.clone(),
                message_pusher.clone(),
            )),
            register_user: Arc::new(RegisterUserUseCase::new(
                presence.clone(),
                messages.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            send_message: Arc::new(SendMessageUseCase::new(
                messages.clone(),
                message_pusher.clone(),
                notifier,
            )),
            update_presence: Arc::new(UpdatePresenceUseCase::new(presence.clone(), clock.clone())),
            disconnect_connection: Arc::new(DisconnectConnectionUseCase::new(
                presence.clone(),
                message_pusher.clone(),
            )),
            sweep_inactive_users: Arc::new(SweepInactiveUsersUseCase::new(
                presence,
                message_pusher,
                clock.clone(),
                config.presence_timeout,
            )),
            expire_messages: Arc::new(ExpireMessagesUseCase::new(
                messages,
                clock,
                config.message_retention,
            )),
        }
    }
}

/// Presence/Broadcast Hub
///
/// Created together with its [`HubHandle`]; `run` consumes the hub and
/// processes commands until cancelled or every handle is dropped.
pub struct RelayHub {
    usecases: HubUseCases,
    commands: mpsc::UnboundedReceiver<HubCommand>,
    sweep_interval: Duration,
    expire_interval: Duration,
}

impl RelayHub {
    pub fn new(usecases: HubUseCases, config: &ServerConfig) -> (Self, HubHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let hub = Self {
            usecases,
            commands: rx,
            sweep_interval: config.sweep_interval,
            expire_interval: config.expire_interval,
        };
        (hub, HubHandle::new(tx))
    }

    /// Run the hub loop.
    ///
    /// Both timers stop together with the loop when `shutdown` is cancelled.
    pub async fn run(mut self, shutdown: CancellationToken) {
        let mut sweep = periodic(self.sweep_interval);
        let mut expire = periodic(self.expire_interval);

        tracing::info!(
            "Hub started (sweep every {:?}, expire every {:?})",
            self.sweep_interval,
            self.expire_interval
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Hub shutting down");
                    break;
                }
                command = self.commands.recv() => match command {
                    Some(command) => {
                        tracing::debug!("Hub command from '{}'", command.connection_id());
                        self.dispatch(command).await;
                    }
                    None => {
                        tracing::info!("All hub handles dropped, stopping hub");
                        break;
                    }
                },
                _ = sweep.tick() => {
                    self.usecases.sweep_inactive_users.execute().await;
                }
                _ = expire.tick() => {
                    self.usecases.expire_messages.execute().await;
                }
            }
        }
    }

    async fn dispatch(&self, command: HubCommand) {
        match command {
            HubCommand::Connect {
                connection_id,
                sender,
            } => {
                tracing::info!("Client connected: {}", connection_id);
                self.usecases
                    .open_connection
                    .execute(connection_id, sender)
                    .await;
            }
            HubCommand::Register {
                connection_id,
                payload,
            } => match Registration::try_from(payload) {
                Ok(registration) => {
                    if let Err(e) = self
                        .usecases
                        .register_user
                        .execute(connection_id.clone(), registration)
                        .await
                    {
                        tracing::warn!("Register on '{}': {}", connection_id, e);
                    }
                }
                Err(e) => {
                    tracing::warn!("Ignoring register from '{}': {}", connection_id, e);
                }
            },
            HubCommand::SendMessage {
                connection_id,
                payload,
            } => {
                let message = Message::from(payload);
                if let Err(e) = self
                    .usecases
                    .send_message
                    .execute(&connection_id, message)
                    .await
                {
                    tracing::warn!("Send message from '{}': {}", connection_id, e);
                }
            }
            HubCommand::UpdatePresence { connection_id } => {
                self.usecases.update_presence.execute(&connection_id).await;
            }
            HubCommand::Disconnect { connection_id } => {
                tracing::info!("Client disconnected: {}", connection_id);
                self.usecases
                    .disconnect_connection
                    .execute(&connection_id)
                    .await;
            }
        }
    }
}

/// Interval whose first tick fires one full period from now.
///
/// The period is clamped to `1ms..=ServerConfig::MAX_INTERVAL_SECS` so the
/// deadline arithmetic never overflows.
fn periodic(period: Duration) -> Interval {
    let period = period.clamp(
        Duration::from_millis(1),
        Duration::from_secs(ServerConfig::MAX_INTERVAL_SECS),
    );
    let now = Instant::now();
    let start = now.checked_add(period).unwrap_or(now);
    let mut interval = time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
