//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    domain::ChatMessage,
    infrastructure::dto::http::{ConnectionCountDto, MessageDetailDto},
    ui::state::AppState,
};

/// Query parameters for the history endpoints
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<f64>,
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the most recent messages of a room (oldest first)
pub async fn messages_by_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MessageDetailDto>>, StatusCode> {
    match state
        .get_messages_usecase
        .history_by_room(Some(room_id), query.limit)
        .await
    {
        Ok(messages) => Ok(Json(to_details(messages))),
        Err(e) => {
            tracing::error!("Failed to get room history: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get the most recent messages posted by a user across rooms (oldest first)
pub async fn messages_by_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MessageDetailDto>>, StatusCode> {
    match state
        .get_messages_usecase
        .history_by_user(user_id, query.limit)
        .await
    {
        Ok(messages) => Ok(Json(to_details(messages))),
        Err(e) => {
            tracing::error!("Failed to get user history: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Number of live connections (debug view over the Connection Directory)
pub async fn connection_count(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConnectionCountDto>, StatusCode> {
    match state.directory.snapshot().await {
        Ok(records) => Ok(Json(ConnectionCountDto {
            connections: records.len(),
        })),
        Err(e) => {
            tracing::error!("Failed to list connections: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// Domain Model から DTO への変換
fn to_details(messages: Vec<ChatMessage>) -> Vec<MessageDetailDto> {
    messages.into_iter().map(Into::into).collect()
}
