//! Events the server pushes to connected clients.
//!
//! These are domain-level; `infrastructure::dto` owns their wire encoding.

use super::entity::{ChatMessage, Identity, MemberInfo};
use super::value_object::{ConnectionId, MessageId, RoomId, Timestamp};

/// Reason a client request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInRoom,
    Unauthenticated,
    PersistenceFailed,
    InvalidMessage,
    InvalidRoom,
    AuthFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Sent once, right after the connection is registered
    Connected {
        connection_id: ConnectionId,
        identity: Option<Identity>,
    },
    /// Identity attached after connecting
    Authenticated(Identity),
    /// Sent to the joiner, with the room's members at join time
    RoomJoined {
        room_id: RoomId,
        members: Vec<MemberInfo>,
    },
    /// Sent to a connection that left its room
    RoomLeft { room_id: RoomId },
    MemberJoined {
        room_id: RoomId,
        member: MemberInfo,
        timestamp: Timestamp,
    },
    MemberLeft {
        room_id: RoomId,
        member: MemberInfo,
        timestamp: Timestamp,
    },
    MessageReceived(ChatMessage),
    /// Acknowledgement to the sender, carrying the store-assigned id
    MessageSent {
        id: MessageId,
        room_id: RoomId,
        timestamp: Timestamp,
    },
    TypingChanged {
        room_id: RoomId,
        identity: Identity,
        is_typing: bool,
    },
    Error { code: ErrorCode, message: String },
}

impl ServerEvent {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }
}
