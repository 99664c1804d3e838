//! UseCase: relay typing / stop-typing signals

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomId, RoomRepository, TypingTransition};

use super::{TypingTracker, error::TypingError};

pub struct UpdateTypingUseCase {
    repository: Arc<dyn RoomRepository>,
    typing: Arc<TypingTracker>,
}

impl UpdateTypingUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, typing: Arc<TypingTracker>) -> Self {
        Self { repository, typing }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        is_typing: bool,
    ) -> Result<TypingTransition, TypingError> {
        let connection = self
            .repository
            .get_connection(connection_id)
            .await
            .ok_or(TypingError::ConnectionNotFound(*connection_id))?;
        let identity = connection.identity.as_ref().ok_or(TypingError::Unauthenticated)?;
        if !connection.is_in(&room_id) {
            return Err(TypingError::NotInRoom(room_id));
        }

        let transition = if is_typing {
            self.typing.start(&room_id, *connection_id, identity).await
        } else {
            self.typing.stop(&room_id, *connection_id, identity).await
        };
        Ok(transition)
    }
}
