//! Domain entities.

use super::value_object::{
    ConnectionId, MessageBody, MessageId, RoomId, Timestamp, UserId, Username,
};

/// Authenticated identity attached to a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub username: Username,
}

impl Identity {
    pub fn new(user_id: UserId, username: Username) -> Self {
        Self { user_id, username }
    }
}

/// One live duplex channel to a client.
///
/// Holds at most one room at a time; the membership table keeps `room` and
/// the room's member set in sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub identity: Option<Identity>,
    pub room: Option<RoomId>,
    pub connected_at: Timestamp,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            identity: None,
            room: None,
            connected_at,
        }
    }

    /// Whether this connection currently sits in `room_id`
    pub fn is_in(&self, room_id: &RoomId) -> bool {
        self.room.as_ref() == Some(room_id)
    }

    /// Public view of this connection, as shown to other room members
    pub fn member_info(&self) -> MemberInfo {
        MemberInfo {
            connection_id: self.id,
            identity: self.identity.clone(),
        }
    }
}

/// What other room members learn about a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub connection_id: ConnectionId,
    pub identity: Option<Identity>,
}

/// Record returned by the message store for a stored message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: MessageId,
    pub timestamp: Timestamp,
}

/// A chat message in its broadcast form. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub username: Username,
    pub body: MessageBody,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn from_stored(
        stored: StoredMessage,
        room_id: RoomId,
        sender: &Identity,
        body: MessageBody,
    ) -> Self {
        Self {
            id: stored.id,
            room_id,
            user_id: sender.user_id,
            username: sender.username.clone(),
            body,
            timestamp: stored.timestamp,
        }
    }
}

/// Active room and its current member count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub member_count: usize,
}

/// One page of a room's history. Page 1 holds the newest messages; within a
/// page messages are oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    pub messages: Vec<ChatMessage>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
}

impl MessagePage {
    pub fn total_pages(&self) -> usize {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }

    pub fn has_next(&self) -> bool {
        self.page * self.limit < self.total
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Current state of one room: who is in it and how much history it has
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDetail {
    pub room_id: RoomId,
    pub members: Vec<MemberInfo>,
    pub message_count: usize,
    pub last_message_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: usize, limit: usize, total: usize) -> MessagePage {
        MessagePage {
            messages: Vec::new(),
            page,
            limit,
            total,
        }
    }

    #[test]
    fn test_page_navigation() {
        // Test: 5 messages in pages of 2 give 3 pages
        let first = page(1, 2, 5);
        let last = page(3, 2, 5);

        assert_eq!(first.total_pages(), 3);
        assert!(first.has_next());
        assert!(!first.has_prev());
        assert!(!last.has_next());
        assert!(last.has_prev());
    }

    #[test]
    fn test_empty_history_has_no_pages() {
        let empty = page(1, 50, 0);
        assert_eq!(empty.total_pages(), 0);
        assert!(!empty.has_next());
        assert_eq!(page(1, 0, 3).total_pages(), 0);
    }
}
