//! HTTP API endpoint handlers.
//!
//! Parameters are read from the query string; every route accepts GET and POST.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kairan_shared::dto::{HistoryEntryDto, PollResponseDto};
use serde::Deserialize;

use crate::ui::{
    error::{ApiError, MISSING_CLIENT_ID, MISSING_CLIENT_ID_OR_MESSAGE},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct ClientQuery {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SendQuery {
    pub id: Option<String>,
    pub message: Option<String>,
}

/// 空文字列は未指定として扱う
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// `/join?id=...`
pub async fn join_room(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClientQuery>,
) -> Result<StatusCode, ApiError> {
    let raw_id = present(query.id).ok_or_else(|| ApiError::bad_request(MISSING_CLIENT_ID))?;

    state.join_room_usecase.execute(raw_id).await?;
    Ok(StatusCode::OK)
}

/// `/leave?id=...`
pub async fn leave_room(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClientQuery>,
) -> Result<StatusCode, ApiError> {
    let raw_id = present(query.id).ok_or_else(|| ApiError::bad_request(MISSING_CLIENT_ID))?;

    state.leave_room_usecase.execute(raw_id).await?;
    Ok(StatusCode::OK)
}

/// `/send?id=...&message=...`
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SendQuery>,
) -> Result<StatusCode, ApiError> {
    let (Some(raw_id), Some(raw_message)) = (present(query.id), present(query.message)) else {
        return Err(ApiError::bad_request(MISSING_CLIENT_ID_OR_MESSAGE));
    };

    state
        .send_message_usecase
        .execute(raw_id, raw_message)
        .await?;
    Ok(StatusCode::OK)
}

/// `/messages?id=...`
///
/// Holds the request open until a message arrives (200) or the poll window
/// elapses (204).
pub async fn poll_message(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClientQuery>,
) -> Result<Response, ApiError> {
    let raw_id = present(query.id).ok_or_else(|| ApiError::bad_request(MISSING_CLIENT_ID))?;

    match state.poll_message_usecase.execute(raw_id).await? {
        Some(message) => Ok(Json(PollResponseDto { message }).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// `/history`
pub async fn fetch_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HistoryEntryDto>>, ApiError> {
    let entries = state.fetch_history_usecase.execute().await?;

    // Domain Model から DTO への変換
    let dtos = entries
        .into_iter()
        .map(|entry| HistoryEntryDto {
            sender: entry.sender,
            message: entry.message,
            created_at: entry.created_at,
        })
        .collect();

    Ok(Json(dtos))
}
