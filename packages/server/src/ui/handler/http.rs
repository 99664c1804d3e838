//! HTTP API endpoint handlers.
//!
//! Everything except the health check requires a bearer token.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    domain::{DeleteMessageError, MessageId, RoomId},
    infrastructure::dto::http::{
        DeletedMessageDto, MessagePageDto, MessagesQuery, RoomDetailDto, RoomSummaryDto,
    },
    ui::{handler::auth::AuthUser, state::AppState},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Active rooms with their member counts
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;
    Json(rooms.into_iter().map(RoomSummaryDto::from).collect())
}

/// Members and history size of one room
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = parse_room_id(room_id)?;
    let detail = state
        .get_room_usecase
        .execute(&room_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to describe '{}': {}", room_id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(RoomDetailDto::from(detail)))
}

/// One page of a room's history, oldest first within the page
pub async fn get_room_messages(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(room_id): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<MessagePageDto>, StatusCode> {
    let room_id = parse_room_id(room_id)?;
    let page = state
        .get_room_messages_usecase
        .execute(&room_id, query.page, query.limit)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read history of '{}': {}", room_id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(MessagePageDto::from(page)))
}

/// Delete one of the caller's own messages
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(message_id): Path<i64>,
) -> Result<Json<DeletedMessageDto>, StatusCode> {
    let deleted = state
        .delete_message_usecase
        .execute(MessageId::new(message_id), &identity)
        .await
        .map_err(|e| match e {
            DeleteMessageError::NotFound(_) => StatusCode::NOT_FOUND,
            DeleteMessageError::NotAuthor(_) => StatusCode::FORBIDDEN,
            DeleteMessageError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        })?;
    Ok(Json(DeletedMessageDto::from(deleted)))
}

fn parse_room_id(raw: String) -> Result<RoomId, StatusCode> {
    RoomId::new(raw).map_err(|e| {
        tracing::warn!("Rejecting room request: {}", e);
        StatusCode::BAD_REQUEST
    })
}
