//! Conversion logic between DTOs and domain entities.

use inkpot_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ChatMessage, ErrorCode, MemberInfo, MessagePage, RoomDetail, RoomSummary, ServerEvent,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain → WebSocket DTO
// ========================================

impl From<ErrorCode> for dto::ErrorCodeDto {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::NotInRoom => Self::NotInRoom,
            ErrorCode::Unauthenticated => Self::Unauthenticated,
            ErrorCode::PersistenceFailed => Self::PersistenceFailed,
            ErrorCode::InvalidMessage => Self::InvalidMessage,
            ErrorCode::InvalidRoom => Self::InvalidRoom,
            ErrorCode::AuthFailed => Self::AuthFailed,
        }
    }
}

impl From<&MemberInfo> for dto::MemberDto {
    fn from(member: &MemberInfo) -> Self {
        Self {
            connection_id: member.connection_id.to_string(),
            user_id: member.identity.as_ref().map(|i| i.user_id.value()),
            username: member
                .identity
                .as_ref()
                .map(|i| i.username.as_str().to_string()),
        }
    }
}

impl From<&ServerEvent> for dto::ServerMessage {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::Connected {
                connection_id,
                identity,
            } => Self::Connected {
                connection_id: connection_id.to_string(),
                user_id: identity.as_ref().map(|i| i.user_id.value()),
                username: identity.as_ref().map(|i| i.username.as_str().to_string()),
            },
            ServerEvent::Authenticated(identity) => Self::Authenticated {
                user_id: identity.user_id.value(),
                username: identity.username.as_str().to_string(),
            },
            ServerEvent::RoomJoined { room_id, members } => Self::RoomJoined {
                room_id: room_id.as_str().to_string(),
                members: members.iter().map(dto::MemberDto::from).collect(),
            },
            ServerEvent::RoomLeft { room_id } => Self::RoomLeft {
                room_id: room_id.as_str().to_string(),
            },
            ServerEvent::MemberJoined {
                room_id,
                member,
                timestamp,
            } => {
                let member = dto::MemberDto::from(member);
                Self::UserJoined {
                    room_id: room_id.as_str().to_string(),
                    connection_id: member.connection_id,
                    user_id: member.user_id,
                    username: member.username,
                    timestamp: timestamp.value(),
                }
            }
            ServerEvent::MemberLeft {
                room_id,
                member,
                timestamp,
            } => {
                let member = dto::MemberDto::from(member);
                Self::UserLeft {
                    room_id: room_id.as_str().to_string(),
                    connection_id: member.connection_id,
                    user_id: member.user_id,
                    username: member.username,
                    timestamp: timestamp.value(),
                }
            }
            ServerEvent::MessageReceived(message) => Self::ReceiveMessage {
                id: message.id.value(),
                room_id: message.room_id.as_str().to_string(),
                user_id: message.user_id.value(),
                username: message.username.as_str().to_string(),
                message: message.body.as_str().to_string(),
                timestamp: message.timestamp.value(),
            },
            ServerEvent::MessageSent {
                id,
                room_id,
                timestamp,
            } => Self::MessageSent {
                id: id.value(),
                room_id: room_id.as_str().to_string(),
                timestamp: timestamp.value(),
            },
            ServerEvent::TypingChanged {
                room_id,
                identity,
                is_typing,
            } => {
                let room_id = room_id.as_str().to_string();
                let user_id = identity.user_id.value();
                let username = identity.username.as_str().to_string();
                if *is_typing {
                    Self::UserTyping {
                        room_id,
                        user_id,
                        username,
                    }
                } else {
                    Self::UserStopTyping {
                        room_id,
                        user_id,
                        username,
                    }
                }
            }
            ServerEvent::Error { code, message } => Self::Error {
                code: (*code).into(),
                message: message.clone(),
            },
        }
    }
}

/// Encode an event as a JSON text frame
pub fn encode_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::ServerMessage::from(event))
}

// ========================================
// Domain → HTTP DTO
// ========================================

impl From<ChatMessage> for http::MessageDto {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id.value(),
            room_id: message.room_id.into_string(),
            user_id: message.user_id.value(),
            username: message.username.into_string(),
            message: message.body.into_string(),
            sent_at: timestamp_to_rfc3339(message.timestamp.value()),
            timestamp: message.timestamp.value(),
        }
    }
}

impl From<RoomSummary> for http::RoomSummaryDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            room_id: summary.room_id.into_string(),
            member_count: summary.member_count,
        }
    }
}

impl From<MessagePage> for http::MessagePageDto {
    fn from(page: MessagePage) -> Self {
        let pagination = http::PaginationDto {
            current_page: page.page,
            total_pages: page.total_pages(),
            total_messages: page.total,
            has_next: page.has_next(),
            has_prev: page.has_prev(),
        };
        Self {
            messages: page.messages.into_iter().map(http::MessageDto::from).collect(),
            pagination,
        }
    }
}

impl From<RoomDetail> for http::RoomDetailDto {
    fn from(detail: RoomDetail) -> Self {
        Self {
            room_id: detail.room_id.into_string(),
            member_count: detail.members.len(),
            members: detail.members.iter().map(dto::MemberDto::from).collect(),
            message_count: detail.message_count,
            last_message_at: detail
                .last_message_at
                .map(|t| timestamp_to_rfc3339(t.value())),
        }
    }
}

impl From<ChatMessage> for http::DeletedMessageDto {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id.value(),
            room_id: message.room_id.into_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ConnectionId, Identity, MessageBody, MessageId, RoomId, Timestamp, UserId, Username,
    };

    fn alice() -> Identity {
        Identity::new(UserId::new(1), Username::new("alice".to_string()).unwrap())
    }

    fn general() -> RoomId {
        RoomId::new("general".to_string()).unwrap()
    }

    #[test]
    fn test_message_received_to_dto() {
        // Test: a broadcast chat message carries the store-assigned id
        // given:
        let event = ServerEvent::MessageReceived(ChatMessage {
            id: MessageId::new(1),
            room_id: general(),
            user_id: UserId::new(1),
            username: Username::new("alice".to_string()).unwrap(),
            body: MessageBody::new("hello".to_string()).unwrap(),
            timestamp: Timestamp::new(1000),
        });

        // when:
        let dto_msg = dto::ServerMessage::from(&event);

        // then:
        assert_eq!(
            dto_msg,
            dto::ServerMessage::ReceiveMessage {
                id: 1,
                room_id: "general".to_string(),
                user_id: 1,
                username: "alice".to_string(),
                message: "hello".to_string(),
                timestamp: 1000,
            }
        );
    }

    #[test]
    fn test_typing_changed_maps_to_two_events() {
        // Test: the typing flag selects user-typing or user-stop-typing
        // given:
        let start = ServerEvent::TypingChanged {
            room_id: general(),
            identity: alice(),
            is_typing: true,
        };
        let stop = ServerEvent::TypingChanged {
            room_id: general(),
            identity: alice(),
            is_typing: false,
        };

        // when / then:
        assert!(matches!(
            dto::ServerMessage::from(&start),
            dto::ServerMessage::UserTyping { user_id: 1, .. }
        ));
        assert!(matches!(
            dto::ServerMessage::from(&stop),
            dto::ServerMessage::UserStopTyping { user_id: 1, .. }
        ));
    }

    #[test]
    fn test_anonymous_member_joined_to_dto() {
        // Test: an anonymous member has no user id or username on the wire
        // given:
        let connection_id = ConnectionId::generate();
        let event = ServerEvent::MemberJoined {
            room_id: general(),
            member: MemberInfo {
                connection_id,
                identity: None,
            },
            timestamp: Timestamp::new(5),
        };

        // when:
        let json = encode_event(&event).unwrap();

        // then:
        assert!(json.contains("\"type\":\"user-joined\""));
        assert!(json.contains(&connection_id.to_string()));
        assert!(json.contains("\"user_id\":null"));
    }

    #[test]
    fn test_chat_message_to_http_dto() {
        // Test: the HTTP history entry adds a readable timestamp
        // given:
        let message = ChatMessage {
            id: MessageId::new(9),
            room_id: general(),
            user_id: UserId::new(2),
            username: Username::new("bob".to_string()).unwrap(),
            body: MessageBody::new("hi".to_string()).unwrap(),
            timestamp: Timestamp::new(1672531200000),
        };

        // when:
        let dto_msg: http::MessageDto = message.into();

        // then:
        assert_eq!(dto_msg.id, 9);
        assert_eq!(dto_msg.username, "bob");
        assert!(dto_msg.sent_at.starts_with("2023-01-01T00:00:00"));
    }

    #[test]
    fn test_message_page_to_http_dto() {
        // Test: the page metadata is derived from page, limit and total
        // given:
        let page = MessagePage {
            messages: Vec::new(),
            page: 2,
            limit: 10,
            total: 25,
        };

        // when:
        let dto_page: http::MessagePageDto = page.into();

        // then:
        assert_eq!(
            dto_page.pagination,
            http::PaginationDto {
                current_page: 2,
                total_pages: 3,
                total_messages: 25,
                has_next: true,
                has_prev: true,
            }
        );
    }
}
