//! UseCase: join a room
//!
//! A connection sits in at most one room. Joining a new room moves it: the
//! old room loses the member (and its typing indicator, silently) before the
//! new room gains it.

use std::sync::Arc;

use crate::domain::{
    ConnectionId, JoinOutcome, MessagePusher, RepositoryError, RoomId, RoomRepository,
    ServerEvent,
};

use super::{EventBroadcaster, TypingTracker, error::JoinError};

pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    typing: Arc<TypingTracker>,
    broadcaster: Arc<EventBroadcaster>,
}

impl JoinRoomUseCase {
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
    ) -> Result<JoinOutcome, JoinError> {
        let outcome = self
            .repository
            .join_room(connection_id, room_id.clone())
            .await?;
        let connection = self
            .repository
            .get_connection(connection_id)
            .await
            .ok_or(RepositoryError::ConnectionNotFound(*connection_id))?;
        let member = connection.member_info();

        if let JoinOutcome::Joined {
            previous: Some(previous),
        } = &outcome
        {
            self.typing.clear_connection(previous, connection_id).await;
            self.broadcaster
                .broadcast_member_left(previous, member.clone())
                .await;
            tracing::info!(
                "Connection '{}' moved from '{}' to '{}'",
                connection_id,
                previous,
                room_id
            );
        }

        let members = self.repository.member_infos(&room_id).await;
        let joined = ServerEvent::RoomJoined {
            room_id: room_id.clone(),
            members,
        };
        if let Err(e) = self.message_pusher.push_to(connection_id, &joined).await {
            tracing::warn!("Failed to confirm join to '{}': {}", connection_id, e);
        }

        if matches!(outcome, JoinOutcome::Joined { .. }) {
            let notified = self.broadcaster.broadcast_member_joined(&room_id, member).await;
            tracing::info!(
                "Connection '{}' joined '{}' ({} member(s) notified)",
                connection_id,
                room_id,
                notified
            );
        }
        Ok(outcome)
    }
}
