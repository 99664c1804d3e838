//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::MemberDto;

/// Entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub room_id: String,
    pub member_count: usize,
}

/// Entry of `GET /api/rooms/{room_id}/messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: i64,
    pub room_id: String,
    pub user_id: i64,
    pub username: String,
    pub message: String,
    /// RFC 3339, UTC
    pub sent_at: String,
    pub timestamp: i64,
}

/// Paging metadata of a history response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationDto {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_messages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Body of `GET /api/rooms/{room_id}/messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePageDto {
    pub messages: Vec<MessageDto>,
    pub pagination: PaginationDto,
}

/// Query string of `GET /api/rooms/{room_id}/messages`
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Body of `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub room_id: String,
    pub member_count: usize,
    pub members: Vec<MemberDto>,
    pub message_count: usize,
    /// RFC 3339, UTC
    pub last_message_at: Option<String>,
}

/// Body of `DELETE /api/messages/{message_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedMessageDto {
    pub id: i64,
    pub room_id: String,
}
