//! Domain error types.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("user id must not be empty")]
    EmptyUserId,
    #[error("connection id must not be empty")]
    EmptyConnectionId,
}

/// Errors raised while pushing events to connections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),
    #[error("failed to push event: {0}")]
    PushFailed(String),
    #[error("failed to encode event: {0}")]
    EncodeFailed(String),
}

/// Errors raised by an emergency notification channel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("emergency notification failed: {0}")]
    DeliveryFailed(String),
}
