//! UseCase: list active rooms

use std::sync::Arc;

use crate::domain::{RoomRepository, RoomSummary};

pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Vec<RoomSummary> {
        self.repository.list_rooms().await
    }
}
