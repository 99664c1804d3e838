//! Domain layer: entities, value objects, the membership table and the
//! interfaces of the collaborators the chat core depends on.

mod authenticator;
mod entity;
mod error;
mod event;
mod message_pusher;
mod message_store;
mod repository;
mod room_table;
mod typing;
mod value_object;

pub use authenticator::Authenticator;
pub use entity::{
    ChatMessage, Connection, Identity, MemberInfo, MessagePage, RoomDetail, RoomSummary,
    StoredMessage,
};
pub use error::{
    AuthError, DeleteMessageError, PersistenceError, PushError, RepositoryError, ValueObjectError,
};
pub use event::{ErrorCode, ServerEvent};
pub use message_pusher::{BroadcastReport, MessagePusher, PusherChannel};
pub use message_store::MessageStore;
pub use repository::RoomRepository;
pub use room_table::{JoinOutcome, RoomTable};
pub use typing::{TYPING_TTL_MILLIS, TypingKey, TypingTransition};
pub use value_object::{
    ConnectionId, MESSAGE_BODY_MAX_LENGTH, MessageBody, MessageId, ROOM_ID_MAX_LENGTH, RoomId,
    Timestamp, USERNAME_MAX_LENGTH, UserId, Username,
};

#[cfg(test)]
pub use authenticator::MockAuthenticator;
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use message_store::MockMessageStore;
#[cfg(test)]
pub use repository::MockRoomRepository;
