//! Emergency notifier that writes alerts to the log.
//!
//! Stands in for SMS / e-mail / admin-channel integrations, which plug in by
//! implementing `EmergencyNotifier` the same way.

use async_trait::async_trait;
use haven_shared::time::timestamp_to_rfc3339;

use crate::domain::{EmergencyNotifier, Message, NotifyError};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogEmergencyNotifier;

impl LogEmergencyNotifier {
    pub fn new() -> Self {
        Self
    }

    /// Lines of the alert, in the order they are logged.
    pub fn render(message: &Message) -> Vec<String> {
        let location = match &message.location {
            Some(location) => format!("Location: {}", location.map_url()),
            None => "Location: Not available".to_string(),
        };

        vec![
            format!(
                "From: {} ({}, {})",
                message.name,
                message.email.as_deref().unwrap_or("No email"),
                message.phone.as_deref().unwrap_or("No phone"),
            ),
            format!("Message: {}", message.text),
            format!("Sent at: {}", timestamp_to_rfc3339(message.timestamp.value())),
            location,
        ]
    }
}

#[async_trait]
impl EmergencyNotifier for LogEmergencyNotifier {
    async fn notify(&self, message: &Message) -> Result<(), NotifyError> {
        tracing::warn!("EMERGENCY ALERT");
        for line in Self::render(message) {
            tracing::warn!("{}", line);
        }
        Ok(())
    }
}
