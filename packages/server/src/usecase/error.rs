//! UseCase error types.

use thiserror::Error;

use crate::domain::{AuthError, ConnectionId, PersistenceError, RepositoryError, RoomId};

/// Failure of `EventBroadcaster::broadcast_message`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),

    #[error("connection '{0}' has no identity")]
    Unauthenticated(ConnectionId),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),

    #[error("sending messages requires authentication")]
    Unauthenticated,

    #[error("not a member of room '{0}'")]
    NotInRoom(RoomId),

    #[error("failed to store message: {0}")]
    Persistence(#[from] PersistenceError),
}

impl From<BroadcastError> for SendMessageError {
    fn from(error: BroadcastError) -> Self {
        match error {
            BroadcastError::ConnectionNotFound(id) => Self::ConnectionNotFound(id),
            BroadcastError::Unauthenticated(_) => Self::Unauthenticated,
            BroadcastError::Persistence(e) => Self::Persistence(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypingError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),

    #[error("typing indicators require authentication")]
    Unauthenticated,

    #[error("not a member of room '{0}'")]
    NotInRoom(RoomId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachIdentityError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
