//! UseCase error types.

use thiserror::Error;

use crate::domain::MessagePushError;

/// 登録処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// The registration was stored but the snapshot could not reach the registrant
    #[error("failed to send initial snapshot: {0}")]
    InitializeFailed(MessagePushError),
}

/// メッセージ送信処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("failed to broadcast message: {0}")]
    BroadcastFailed(MessagePushError),
}
