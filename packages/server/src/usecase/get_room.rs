//! UseCase: describe one room

use std::sync::Arc;

use crate::domain::{MessageStore, PersistenceError, RoomDetail, RoomId, RoomRepository};

pub struct GetRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_store: Arc<dyn MessageStore>,
}

impl GetRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, message_store: Arc<dyn MessageStore>) -> Self {
        Self {
            repository,
            message_store,
        }
    }

    /// Members and history size of `room_id`. A room nobody is in and nobody
    /// ever wrote to does not exist.
    pub async fn execute(&self, room_id: &RoomId) -> Result<Option<RoomDetail>, PersistenceError> {
        let members = self.repository.member_infos(room_id).await;
        let newest = self.message_store.page(room_id, 1, 1).await?;
        if members.is_empty() && newest.total == 0 {
            return Ok(None);
        }

        Ok(Some(RoomDetail {
            room_id: room_id.clone(),
            members,
            message_count: newest.total,
            last_message_at: newest.messages.last().map(|m| m.timestamp),
        }))
    }
}
