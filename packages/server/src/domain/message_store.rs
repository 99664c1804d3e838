//! Message persistence bridge.

use async_trait::async_trait;

use super::{
    ChatMessage, DeleteMessageError, Identity, MessageBody, MessageId, MessagePage,
    PersistenceError, RoomId, StoredMessage, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Durably store a message and return the assigned id and timestamp
    async fn store(
        &self,
        room_id: &RoomId,
        sender: &Identity,
        body: &MessageBody,
    ) -> Result<StoredMessage, PersistenceError>;

    /// Page `page` (1-based, newest first) of `limit` messages of a room.
    /// Messages inside the page are oldest first.
    async fn page(
        &self,
        room_id: &RoomId,
        page: usize,
        limit: usize,
    ) -> Result<MessagePage, PersistenceError>;

    /// Delete a message on behalf of `user_id`, who must be its author
    async fn delete(
        &self,
        message_id: MessageId,
        user_id: UserId,
    ) -> Result<ChatMessage, DeleteMessageError>;
}
