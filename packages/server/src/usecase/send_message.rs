//! UseCase: send a chat message to the sender's room
//!
//! The message is persisted first and only then fanned out; a store failure
//! means nobody (not even the sender) sees an acknowledgement.

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ConnectionId, MessageBody, MessagePusher, RoomId, RoomRepository, ServerEvent,
};

use super::{EventBroadcaster, TypingTracker, error::SendMessageError};

pub struct SendMessageUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    typing: Arc<TypingTracker>,
    broadcaster: Arc<EventBroadcaster>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        typing: Arc<TypingTracker>,
        broadcaster: Arc<EventBroadcaster>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            typing,
            broadcaster,
        }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        body: MessageBody,
    ) -> Result<ChatMessage, SendMessageError> {
        let connection = self
            .repository
            .get_connection(connection_id)
            .await
            .ok_or(SendMessageError::ConnectionNotFound(*connection_id))?;
        let identity = connection
            .identity
            .clone()
            .ok_or(SendMessageError::Unauthenticated)?;
        if !connection.is_in(&room_id) {
            tracing::warn!(
                "Connection '{}' tried to send to '{}' without being a member",
                connection_id,
                room_id
            );
            return Err(SendMessageError::NotInRoom(room_id));
        }

        // Submitting ends the sender's typing indicator.
        if self.typing.is_typing(&room_id, identity.user_id).await {
            self.typing.stop(&room_id, *connection_id, &identity).await;
        }

        let message = self
            .broadcaster
            .broadcast_message(&room_id, connection_id, body)
            .await?;

        let ack = ServerEvent::MessageSent {
            id: message.id,
            room_id,
            timestamp: message.timestamp,
        };
        if let Err(e) = self.message_pusher.push_to(connection_id, &ack).await {
            tracing::warn!("Failed to acknowledge message to '{}': {}", connection_id, e);
        }
        Ok(message)
    }
}
