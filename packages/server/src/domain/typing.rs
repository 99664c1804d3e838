//! Typing indicator keys and transitions.

use super::{RoomId, UserId};

/// Default time a typing indicator survives without a fresh signal
pub const TYPING_TTL_MILLIS: u64 = 3_000;

/// Typing state is tracked per (room, user)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypingKey {
    pub room_id: RoomId,
    pub user_id: UserId,
}

impl TypingKey {
    pub fn new(room_id: RoomId, user_id: UserId) -> Self {
        Self { room_id, user_id }
    }
}

/// What a typing or stop-typing signal did to the (room, user) state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingTransition {
    /// Idle -> Typing
    Started,
    /// Typing -> Typing, expiry pushed back
    Refreshed,
    /// Typing -> Idle
    Stopped,
    /// Stop signal while already idle
    AlreadyIdle,
}
