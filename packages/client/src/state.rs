//! Client-side chat state.
//!
//! Mirrors what the terminal shows: the current room, its messages and who
//! is typing. Typing indicators carry their own display deadline, refreshed
//! by every `user-typing` event and dropped by `expire_typing`.

use std::collections::VecDeque;

use inkpot_server::infrastructure::dto::websocket::{ErrorCodeDto, ServerMessage};

/// How long a typing indicator stays visible after the last signal
pub const TYPING_INDICATOR_TTL_MS: i64 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMessage {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub body: String,
    pub timestamp: i64,
    pub own: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingUser {
    pub user_id: i64,
    pub username: String,
    /// Unix millis after which the indicator is hidden
    pub deadline: i64,
}

#[derive(Debug, Default)]
pub struct ChatState {
    connected: bool,
    identity: Option<ClientIdentity>,
    current_room: Option<String>,
    messages: Vec<DisplayMessage>,
    typing_users: Vec<TypingUser>,
    /// Own message bodies sent but not yet acknowledged, in send order
    pending: VecDeque<String>,
    /// Room to join again after a reconnect
    rejoin_room: Option<String>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State that joins `room` as soon as the first connection is up
    pub fn with_initial_room(room: Option<String>) -> Self {
        Self {
            rejoin_room: room,
            ..Self::default()
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn identity(&self) -> Option<&ClientIdentity> {
        self.identity.as_ref()
    }

    pub fn current_room(&self) -> Option<&str> {
        self.current_room.as_deref()
    }

    pub fn messages(&self) -> &[DisplayMessage] {
        &self.messages
    }

    pub fn typing_users(&self) -> &[TypingUser] {
        &self.typing_users
    }

    pub fn join_room(&mut self, room_id: String) {
        self.current_room = Some(room_id);
        self.messages.clear();
        self.typing_users.clear();
    }

    pub fn leave_room(&mut self) {
        self.current_room = None;
        self.messages.clear();
        self.typing_users.clear();
        self.pending.clear();
    }

    /// Connection lost: forget the room but remember it for the next session
    pub fn disconnect(&mut self) {
        self.connected = false;
        if let Some(room) = self.current_room.take() {
            self.rejoin_room = Some(room);
        }
        self.leave_room();
    }

    pub fn take_rejoin_room(&mut self) -> Option<String> {
        self.rejoin_room.take()
    }

    /// Remember a body until the server acknowledges it
    pub fn queue_own_message(&mut self, body: String) {
        self.pending.push_back(body);
    }

    /// Append the oldest pending own message once its ack arrives
    pub fn record_own_message(&mut self, id: i64, timestamp: i64) -> Option<&DisplayMessage> {
        let body = self.pending.pop_front()?;
        let (user_id, username) = match &self.identity {
            Some(identity) => (identity.user_id, identity.username.clone()),
            None => (0, String::new()),
        };
        self.messages.push(DisplayMessage {
            id,
            user_id,
            username,
            body,
            timestamp,
            own: true,
        });
        self.messages.last()
    }

    /// Fold one server event into the state
    pub fn apply(&mut self, message: &ServerMessage, now: i64) {
        match message {
            ServerMessage::Connected {
                user_id, username, ..
            } => {
                self.connected = true;
                self.identity = match (user_id, username) {
                    (Some(user_id), Some(username)) => Some(ClientIdentity {
                        user_id: *user_id,
                        username: username.clone(),
                    }),
                    _ => None,
                };
            }
            ServerMessage::Authenticated { user_id, username } => {
                self.identity = Some(ClientIdentity {
                    user_id: *user_id,
                    username: username.clone(),
                });
            }
            // Re-joining the current room keeps what is already on screen
            ServerMessage::RoomJoined { room_id, .. } if !self.is_current(room_id) => {
                self.join_room(room_id.clone())
            }
            ServerMessage::RoomLeft { .. } => self.leave_room(),
            ServerMessage::ReceiveMessage {
                id,
                room_id,
                user_id,
                username,
                message,
                timestamp,
            } if self.is_current(room_id) => {
                self.typing_users.retain(|u| u.user_id != *user_id);
                self.messages.push(DisplayMessage {
                    id: *id,
                    user_id: *user_id,
                    username: username.clone(),
                    body: message.clone(),
                    timestamp: *timestamp,
                    own: false,
                });
            }
            ServerMessage::MessageSent { id, timestamp, .. } => {
                self.record_own_message(*id, *timestamp);
            }
            ServerMessage::UserTyping {
                room_id,
                user_id,
                username,
            } if self.is_current(room_id) => {
                let deadline = now + TYPING_INDICATOR_TTL_MS;
                match self.typing_users.iter_mut().find(|u| u.user_id == *user_id) {
                    Some(user) => user.deadline = deadline,
                    None => self.typing_users.push(TypingUser {
                        user_id: *user_id,
                        username: username.clone(),
                        deadline,
                    }),
                }
            }
            ServerMessage::UserStopTyping {
                room_id, user_id, ..
            } if self.is_current(room_id) => {
                self.typing_users.retain(|u| u.user_id != *user_id);
            }
            // A rejected send never gets an ack.
            ServerMessage::Error { code, .. }
                if matches!(
                    code,
                    ErrorCodeDto::PersistenceFailed
                        | ErrorCodeDto::InvalidMessage
                        | ErrorCodeDto::NotInRoom
                        | ErrorCodeDto::Unauthenticated
                ) =>
            {
                self.pending.pop_front();
            }
            _ => {}
        }
    }

    /// Drop indicators whose deadline has passed. Returns whether any were
    /// removed.
    pub fn expire_typing(&mut self, now: i64) -> bool {
        let before = self.typing_users.len();
        self.typing_users.retain(|u| u.deadline > now);
        self.typing_users.len() != before
    }

    /// "alice, bob is typing…", or `None` when nobody is
    pub fn typing_line(&self) -> Option<String> {
        if self.typing_users.is_empty() {
            return None;
        }
        let names: Vec<&str> = self
            .typing_users
            .iter()
            .map(|u| u.username.as_str())
            .collect();
        Some(format!("{} is typing…", names.join(", ")))
    }

    fn is_current(&self, room_id: &str) -> bool {
        self.current_room.as_deref() == Some(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typing(user_id: i64, username: &str) -> ServerMessage {
        ServerMessage::UserTyping {
            room_id: "general".to_string(),
            user_id,
            username: username.to_string(),
        }
    }

    fn received(id: i64, user_id: i64, username: &str, body: &str) -> ServerMessage {
        ServerMessage::ReceiveMessage {
            id,
            room_id: "general".to_string(),
            user_id,
            username: username.to_string(),
            message: body.to_string(),
            timestamp: 1_000,
        }
    }

    fn in_general() -> ChatState {
        let mut state = ChatState::new();
        state.join_room("general".to_string());
        state
    }

    #[test]
    fn test_join_clears_room_state() {
        // Test: joining a room starts with an empty history and no typists
        // given:
        let mut state = in_general();
        state.apply(&received(1, 2, "bob", "hi"), 0);
        state.apply(&typing(3, "carol"), 0);

        // when:
        state.join_room("random".to_string());

        // then:
        assert_eq!(state.current_room(), Some("random"));
        assert!(state.messages().is_empty());
        assert!(state.typing_users().is_empty());
    }

    #[test]
    fn test_room_joined_for_current_room_keeps_history() {
        // Test: the server confirming the room we are already in does not
        // wipe the messages on screen
        // given:
        let mut state = in_general();
        state.apply(&received(1, 2, "bob", "hi"), 0);

        // when:
        state.apply(
            &ServerMessage::RoomJoined {
                room_id: "general".to_string(),
                members: Vec::new(),
            },
            10,
        );

        // then:
        assert_eq!(state.current_room(), Some("general"));
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn test_message_from_typist_clears_indicator() {
        // Test: a message from a typing user hides their indicator
        // given:
        let mut state = in_general();
        state.apply(&typing(2, "bob"), 0);
        state.apply(&typing(3, "carol"), 0);

        // when:
        state.apply(&received(1, 2, "bob", "done"), 100);

        // then:
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.typing_line(), Some("carol is typing…".to_string()));
    }

    #[test]
    fn test_typing_indicator_expires_after_three_seconds() {
        // Test: a single typing event is hidden three seconds later
        // given:
        let mut state = in_general();
        state.apply(&typing(2, "bob"), 10_000);

        // when:
        let early = state.expire_typing(12_999);
        let late = state.expire_typing(13_000);

        // then:
        assert!(!early);
        assert!(late);
        assert_eq!(state.typing_line(), None);
    }

    #[test]
    fn test_typing_refresh_extends_deadline() {
        // Test: repeated typing events keep one entry with a later deadline
        // given:
        let mut state = in_general();
        state.apply(&typing(2, "bob"), 0);

        // when:
        state.apply(&typing(2, "bob"), 2_000);

        // then:
        assert_eq!(state.typing_users().len(), 1);
        assert!(!state.expire_typing(4_000));
        assert!(state.expire_typing(5_000));
    }

    #[test]
    fn test_typing_line_lists_everyone() {
        // Test: several typists are joined with commas
        // given:
        let mut state = in_general();
        state.apply(&typing(2, "alice"), 0);
        state.apply(&typing(3, "bob"), 0);

        // when:
        let line = state.typing_line();

        // then:
        assert_eq!(line, Some("alice, bob is typing…".to_string()));
    }

    #[test]
    fn test_events_for_other_rooms_are_ignored() {
        // Test: stale events from a previous room do not leak in
        // given:
        let mut state = in_general();

        // when:
        state.apply(
            &ServerMessage::UserTyping {
                room_id: "random".to_string(),
                user_id: 2,
                username: "bob".to_string(),
            },
            0,
        );

        // then:
        assert!(state.typing_users().is_empty());
    }

    #[test]
    fn test_own_message_recorded_on_ack() {
        // Test: the locally sent body appears once the server acks it
        // given:
        let mut state = in_general();
        state.apply(
            &ServerMessage::Authenticated {
                user_id: 1,
                username: "alice".to_string(),
            },
            0,
        );
        state.queue_own_message("hello".to_string());

        // when:
        state.apply(
            &ServerMessage::MessageSent {
                id: 7,
                room_id: "general".to_string(),
                timestamp: 500,
            },
            0,
        );

        // then:
        let last = state.messages().last().unwrap();
        assert_eq!(last.id, 7);
        assert_eq!(last.body, "hello");
        assert!(last.own);
    }

    #[test]
    fn test_rejected_send_drops_pending() {
        // Test: a failed send is not shown when a later ack arrives
        // given:
        let mut state = in_general();
        state.queue_own_message("lost".to_string());
        state.queue_own_message("kept".to_string());

        // when:
        state.apply(
            &ServerMessage::Error {
                code: ErrorCodeDto::PersistenceFailed,
                message: "store down".to_string(),
            },
            0,
        );
        state.apply(
            &ServerMessage::MessageSent {
                id: 2,
                room_id: "general".to_string(),
                timestamp: 0,
            },
            0,
        );

        // then:
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].body, "kept");
    }

    #[test]
    fn test_disconnect_remembers_room() {
        // Test: after a disconnect the room is cleared but queued for rejoin
        // given:
        let mut state = in_general();
        state.apply(
            &ServerMessage::Connected {
                connection_id: "c1".to_string(),
                user_id: None,
                username: None,
            },
            0,
        );
        state.apply(&received(1, 2, "bob", "hi"), 0);

        // when:
        state.disconnect();

        // then:
        assert!(!state.is_connected());
        assert!(state.current_room().is_none());
        assert!(state.messages().is_empty());
        assert_eq!(state.take_rejoin_room(), Some("general".to_string()));
        assert_eq!(state.take_rejoin_room(), None);
    }
}
