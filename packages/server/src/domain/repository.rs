//! Repository trait definitions
//!
//! The use case layer depends on these interfaces only; the infrastructure
//! layer supplies the concrete implementations.

use async_trait::async_trait;

use super::{
    Connection, ConnectionId, Identity, JoinOutcome, MemberInfo, RepositoryError, RoomId,
    RoomSummary, Timestamp,
};

/// Connection registry and room membership store.
///
/// Implementations must make every mutation and every read mutually
/// exclusive, and return owned snapshots so callers never iterate live state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Register a new connection and assign it an id
    async fn register_connection(&self, connected_at: Timestamp) -> ConnectionId;

    /// Attach an authenticated identity (last write wins)
    async fn attach_identity(
        &self,
        connection_id: &ConnectionId,
        identity: Identity,
    ) -> Result<(), RepositoryError>;

    /// Remove a connection, leaving its room. Returns its final state.
    async fn unregister_connection(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// Move a connection into a room (single-room semantics)
    async fn join_room(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<JoinOutcome, RepositoryError>;

    /// Leave the current room, if any
    async fn leave_room(&self, connection_id: &ConnectionId) -> Option<RoomId>;

    /// Snapshot of a room's member connections
    async fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// Snapshot of a room's members with their identities
    async fn member_infos(&self, room_id: &RoomId) -> Vec<MemberInfo>;

    async fn get_connection(&self, connection_id: &ConnectionId) -> Option<Connection>;

    async fn list_rooms(&self) -> Vec<RoomSummary>;
}
