//! InMemory Room Repository implementation
//!
//! Implements the domain `RoomRepository` trait on top of a `RoomTable`
//! guarded by a single mutex. Every method takes the lock for the duration of
//! one table operation and returns owned data, so no caller ever iterates the
//! live table.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, Identity, JoinOutcome, MemberInfo, RepositoryError, RoomId,
    RoomRepository, RoomSummary, RoomTable, Timestamp,
};

pub struct InMemoryRoomRepository {
    table: Arc<Mutex<RoomTable>>,
}

impl InMemoryRoomRepository {
    pub fn new(table: Arc<Mutex<RoomTable>>) -> Self {
        Self { table }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(RoomTable::new())))
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn register_connection(&self, connected_at: Timestamp) -> ConnectionId {
        let mut table = self.table.lock().await;
        let id = table.register(connected_at);
        tracing::debug!(
            "Connection '{}' registered ({} live)",
            id,
            table.connection_count()
        );
        id
    }

    async fn attach_identity(
        &self,
        connection_id: &ConnectionId,
        identity: Identity,
    ) -> Result<(), RepositoryError> {
        let mut table = self.table.lock().await;
        table.attach_identity(connection_id, identity)
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let mut table = self.table.lock().await;
        let removed = table.unregister(connection_id);
        if removed.is_some() {
            tracing::debug!(
                "Connection '{}' unregistered ({} live)",
                connection_id,
                table.connection_count()
            );
        }
        removed
    }

    async fn join_room(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<JoinOutcome, RepositoryError> {
        let mut table = self.table.lock().await;
        table.join(connection_id, room_id)
    }

    async fn leave_room(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let mut table = self.table.lock().await;
        table.leave(connection_id)
    }

    async fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let table = self.table.lock().await;
        table.members_of(room_id)
    }

    async fn member_infos(&self, room_id: &RoomId) -> Vec<MemberInfo> {
        let table = self.table.lock().await;
        table.member_infos(room_id)
    }

    async fn get_connection(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let table = self.table.lock().await;
        table.connection(connection_id).cloned()
    }

    async fn list_rooms(&self) -> Vec<RoomSummary> {
        let table = self.table.lock().await;
        table.rooms()
    }
}
