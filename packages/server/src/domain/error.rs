//! Domain error types.

use thiserror::Error;

use super::value_object::{ConnectionId, MessageId};

/// Validation failures raised by value object constructors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("room id is {length} characters long (max {max})")]
    RoomIdTooLong { length: usize, max: usize },

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("username is {length} characters long (max {max})")]
    UsernameTooLong { length: usize, max: usize },

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("message is {length} characters long (max {max})")]
    MessageTooLong { length: usize, max: usize },
}

/// Errors raised by the connection registry / room membership table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),
}

/// The message store could not durably record a message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("message store unavailable: {0}")]
    Unavailable(String),
}

/// A message could not be deleted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteMessageError {
    #[error("message {} does not exist", .0.value())]
    NotFound(MessageId),

    #[error("message {} belongs to another user", .0.value())]
    NotAuthor(MessageId),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Delivery of one event to one connection failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    #[error("connection '{0}' has no outbound channel")]
    ClientNotFound(ConnectionId),

    #[error("outbound queue of connection '{0}' is full")]
    QueueFull(ConnectionId),

    #[error("outbound channel of connection '{0}' is closed")]
    ChannelClosed(ConnectionId),

    #[error("failed to encode event: {0}")]
    Encoding(String),
}

/// A presented credential could not be turned into an identity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("credential is empty")]
    MissingCredential,

    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("failed to issue token: {0}")]
    Issue(String),
}
