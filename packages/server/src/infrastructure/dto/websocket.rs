//! WebSocket wire protocol.
//!
//! Every frame is a JSON object tagged by `type` (kebab-case event names);
//! field names are snake_case.

use serde::{Deserialize, Serialize};

/// Client → Server message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Present a credential after connecting
    Authenticate { token: String },
    JoinRoom { room_id: String },
    LeaveRoom,
    SendMessage { room_id: String, message: String },
    Typing { room_id: String },
    StopTyping { room_id: String },
}

/// A room member as seen by other clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDto {
    pub connection_id: String,
    pub user_id: Option<i64>,
    pub username: Option<String>,
}

/// Server → Client message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    Connected {
        connection_id: String,
        user_id: Option<i64>,
        username: Option<String>,
    },
    Authenticated {
        user_id: i64,
        username: String,
    },
    RoomJoined {
        room_id: String,
        members: Vec<MemberDto>,
    },
    RoomLeft {
        room_id: String,
    },
    UserJoined {
        room_id: String,
        connection_id: String,
        user_id: Option<i64>,
        username: Option<String>,
        timestamp: i64,
    },
    UserLeft {
        room_id: String,
        connection_id: String,
        user_id: Option<i64>,
        username: Option<String>,
        timestamp: i64,
    },
    ReceiveMessage {
        id: i64,
        room_id: String,
        user_id: i64,
        username: String,
        message: String,
        timestamp: i64,
    },
    MessageSent {
        id: i64,
        room_id: String,
        timestamp: i64,
    },
    UserTyping {
        room_id: String,
        user_id: i64,
        username: String,
    },
    UserStopTyping {
        room_id: String,
        user_id: i64,
        username: String,
    },
    Error {
        code: ErrorCodeDto,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCodeDto {
    NotInRoom,
    Unauthenticated,
    PersistenceFailed,
    InvalidMessage,
    InvalidRoom,
    AuthFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize_send_message() {
        // Test: the send-message frame maps onto its variant
        // given:
        let json = r#"{"type":"send-message","room_id":"general","message":"hello"}"#;

        // when:
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        // then:
        assert_eq!(
            msg,
            ClientMessage::SendMessage {
                room_id: "general".to_string(),
                message: "hello".to_string(),
            }
        );
    }

    #[test]
    fn test_client_message_deserialize_unit_variant() {
        // Test: variants without fields only need the tag
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"leave-room"}"#).unwrap();
        assert_eq!(msg, ClientMessage::LeaveRoom);
    }

    #[test]
    fn test_client_message_rejects_unknown_type() {
        // Test: unknown event names are a parse error
        let result = serde_json::from_str::<ClientMessage>(r#"{"type":"dance"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_server_message_serialize_tag_and_fields() {
        // Test: server frames carry a kebab-case tag and snake_case fields
        // given:
        let msg = ServerMessage::UserStopTyping {
            room_id: "general".to_string(),
            user_id: 3,
            username: "carol".to_string(),
        };

        // when:
        let json = serde_json::to_string(&msg).unwrap();

        // then:
        assert!(json.contains("\"type\":\"user-stop-typing\""));
        assert!(json.contains("\"room_id\":\"general\""));
        assert!(json.contains("\"user_id\":3"));
    }

    #[test]
    fn test_error_code_serialize() {
        // Test: error codes are snake_case strings
        let msg = ServerMessage::Error {
            code: ErrorCodeDto::NotInRoom,
            message: "join a room first".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"code\":\"not_in_room\""));
    }
}
