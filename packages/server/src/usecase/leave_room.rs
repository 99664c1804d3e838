//! UseCase: leave the current room

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId, RoomRepository, ServerEvent};

use super::{EventBroadcaster, TypingTracker};

pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    typing: Arc<TypingTracker>,
    broadcaster: Arc<EventBroadcaster>,
}

impl LeaveRoomUseCase {
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

    /// Returns the room that was left, or `None` when the connection was not
    /// in a room.
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let connection = self.repository.get_connection(connection_id).await?;
        let room_id = self.repository.leave_room(connection_id).await?;

        self.typing.clear_connection(&room_id, connection_id).await;
        let left = ServerEvent::RoomLeft {
            room_id: room_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(connection_id, &left).await {
            tracing::warn!("Failed to confirm leave to '{}': {}", connection_id, e);
        }
        self.broadcaster
            .broadcast_member_left(&room_id, connection.member_info())
            .await;

        tracing::info!("Connection '{}' left '{}'", connection_id, room_id);
        Some(room_id)
    }
}
