//! Emergency notification port.

use async_trait::async_trait;

use super::{entity::Message, error::NotifyError};

/// Out-of-band channel (SMS, e-mail, admin console, ...) told about every
/// emergency message, including its location when present.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmergencyNotifier: Send + Sync {
    async fn notify(&self, message: &Message) -> Result<(), NotifyError>;
}
