//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Relay status counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDto {
    /// Live transport connections, registered or not
    pub connections: usize,
    /// Presence records
    pub active_users: usize,
    /// Retained messages
    pub messages: usize,
}
