//! Value objects of the chat domain.
//!
//! Each value object validates its input at construction, so the rest of the
//! server can rely on a `RoomId` or `MessageBody` being well-formed.

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// Longest accepted room identifier (characters)
pub const ROOM_ID_MAX_LENGTH: usize = 100;
/// Longest accepted username (characters)
pub const USERNAME_MAX_LENGTH: usize = 50;
/// Longest accepted chat message body (characters)
pub const MESSAGE_BODY_MAX_LENGTH: usize = 2000;

/// Unique identifier of one live client connection.
///
/// Distinct from the user's identity: one user may hold several connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a new random connection id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque room identifier.
///
/// Surrounding whitespace is trimmed; the result must be 1 to
/// `ROOM_ID_MAX_LENGTH` characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyRoomId);
        }
        let length = trimmed.chars().count();
        if length > ROOM_ID_MAX_LENGTH {
            return Err(ValueObjectError::RoomIdTooLong {
                length,
                max: ROOM_ID_MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyUsername);
        }
        let length = trimmed.chars().count();
        if length > USERNAME_MAX_LENGTH {
            return Err(ValueObjectError::UsernameTooLong {
                length,
                max: USERNAME_MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text of a chat message (trimmed, non-empty, bounded length)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyMessage);
        }
        let length = trimmed.chars().count();
        if length > MESSAGE_BODY_MAX_LENGTH {
            return Err(ValueObjectError::MessageTooLong {
                length,
                max: MESSAGE_BODY_MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageBody {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identifier assigned to a message by the message store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(i64);

impl MessageId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Unix timestamp in UTC milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_ids_are_unique() {
        // Test: generated connection ids never collide
        // given / when:
        let first = ConnectionId::generate();
        let second = ConnectionId::generate();

        // then:
        assert_ne!(first, second);
    }

    #[test]
    fn test_room_id_is_trimmed() {
        // Test: surrounding whitespace is not part of the room id
        // given:
        let raw = "  general \n".to_string();

        // when:
        let room_id = RoomId::new(raw).unwrap();

        // then:
        assert_eq!(room_id.as_str(), "general");
    }

    #[test]
    fn test_room_id_rejects_blank_input() {
        // Test: a blank room id is rejected
        // given:
        let raw = "   ".to_string();

        // when:
        let result = RoomId::new(raw);

        // then:
        assert_eq!(result, Err(ValueObjectError::EmptyRoomId));
    }

    #[test]
    fn test_room_id_length_limit() {
        // Test: 100 characters are accepted, 101 are not
        // given:
        let at_limit = "a".repeat(ROOM_ID_MAX_LENGTH);
        let over_limit = "a".repeat(ROOM_ID_MAX_LENGTH + 1);

        // when / then:
        assert!(RoomId::new(at_limit).is_ok());
        assert_eq!(
            RoomId::new(over_limit),
            Err(ValueObjectError::RoomIdTooLong {
                length: ROOM_ID_MAX_LENGTH + 1,
                max: ROOM_ID_MAX_LENGTH,
            })
        );
    }

    #[test]
    fn test_username_rejects_blank_input() {
        // Test: usernames must contain visible characters
        assert_eq!(
            Username::new(" ".to_string()),
            Err(ValueObjectError::EmptyUsername)
        );
        assert_eq!(Username::new(" alice ".to_string()).unwrap().as_str(), "alice");
    }

    #[test]
    fn test_message_body_validation() {
        // Test: message bodies are trimmed and must be non-empty and bounded
        // given:
        let blank = "\t \n".to_string();
        let too_long = "x".repeat(MESSAGE_BODY_MAX_LENGTH + 1);
        let valid = " hello ".to_string();

        // when / then:
        assert_eq!(MessageBody::new(blank), Err(ValueObjectError::EmptyMessage));
        assert!(matches!(
            MessageBody::new(too_long),
            Err(ValueObjectError::MessageTooLong { .. })
        ));
        assert_eq!(MessageBody::new(valid).unwrap().as_str(), "hello");
    }

    #[test]
    fn test_message_body_counts_characters_not_bytes() {
        // Test: multi-byte characters count once toward the limit
        // given:
        let body = "é".repeat(MESSAGE_BODY_MAX_LENGTH);

        // when:
        let result = MessageBody::new(body);

        // then:
        assert!(result.is_ok());
    }
}
