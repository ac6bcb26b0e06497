//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Message returned by the history endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDetailDto {
    pub message_id: String,
    pub room_id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    /// RFC 3339 (UTC)
    pub created_at: String,
}

/// Number of live connections as seen by the Connection Directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionCountDto {
    pub connections: usize,
}
