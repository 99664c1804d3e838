//! Connection registry and room membership table.
//!
//! `RoomTable` is plain data with no locking of its own; the repository wraps
//! it in a mutex so every join, leave and membership read is mutually
//! exclusive.
//!
//! ## Invariants
//!
//! - A connection belongs to at most one room. Joining a room first removes
//!   the connection from the room it was in.
//! - A room's member set only ever contains registered connections;
//!   unregistering a connection removes it from its room.
//! - Rooms are created on first join and dropped when their last member
//!   leaves.

use std::collections::{HashMap, HashSet};

use super::{
    entity::{Connection, Identity, MemberInfo, RoomSummary},
    error::RepositoryError,
    value_object::{ConnectionId, RoomId, Timestamp},
};

/// Result of a join request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The connection was added to the room, leaving `previous` if it was elsewhere
    Joined { previous: Option<RoomId> },
    /// The connection was already a member of the target room
    AlreadyMember,
}

#[derive(Debug, Default)]
pub struct RoomTable {
    connections: HashMap<ConnectionId, Connection>,
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
}

impl RoomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and return its freshly assigned id
    pub fn register(&mut self, connected_at: Timestamp) -> ConnectionId {
        let id = loop {
            let candidate = ConnectionId::generate();
            if !self.connections.contains_key(&candidate) {
                break candidate;
            }
        };
        self.connections.insert(id, Connection::new(id, connected_at));
        id
    }

    /// Attach an authenticated identity. Calling it again replaces the identity.
    pub fn attach_identity(
        &mut self,
        id: &ConnectionId,
        identity: Identity,
    ) -> Result<(), RepositoryError> {
        let connection = self
            .connections
            .get_mut(id)
            .ok_or(RepositoryError::ConnectionNotFound(*id))?;
        connection.identity = Some(identity);
        Ok(())
    }

    /// Remove a connection and every trace of it, returning its final state
    pub fn unregister(&mut self, id: &ConnectionId) -> Option<Connection> {
        let connection = self.connections.remove(id)?;
        if let Some(room_id) = &connection.room {
            self.remove_member(room_id, id);
        }
        Some(connection)
    }

    pub fn join(
        &mut self,
        id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<JoinOutcome, RepositoryError> {
        let connection = self
            .connections
            .get_mut(id)
            .ok_or(RepositoryError::ConnectionNotFound(*id))?;

        if connection.is_in(&room_id) {
            return Ok(JoinOutcome::AlreadyMember);
        }

        let previous = connection.room.replace(room_id.clone());
        if let Some(previous_room) = &previous {
            self.remove_member(previous_room, id);
        }
        self.rooms.entry(room_id).or_default().insert(*id);

        Ok(JoinOutcome::Joined { previous })
    }

    /// Leave the current room. Returns the room left, or `None` if the
    /// connection was not in a room (or is unknown).
    pub fn leave(&mut self, id: &ConnectionId) -> Option<RoomId> {
        let room_id = self.connections.get_mut(id)?.room.take()?;
        self.remove_member(&room_id, id);
        Some(room_id)
    }

    /// Snapshot of a room's members, sorted for stable output
    pub fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let mut members: Vec<ConnectionId> = self
            .rooms
            .get(room_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    pub fn member_infos(&self, room_id: &RoomId) -> Vec<MemberInfo> {
        self.members_of(room_id)
            .iter()
            .filter_map(|id| self.connections.get(id))
            .map(Connection::member_info)
            .collect()
    }

    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn room_of(&self, id: &ConnectionId) -> Option<&RoomId> {
        self.connections.get(id)?.room.as_ref()
    }

    /// Active rooms, sorted by id
    pub fn rooms(&self) -> Vec<RoomSummary> {
        let mut rooms: Vec<RoomSummary> = self
            .rooms
            .iter()
            .map(|(room_id, members)| RoomSummary {
                room_id: room_id.clone(),
                member_count: members.len(),
            })
            .collect();
        rooms.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        rooms
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn remove_member(&mut self, room_id: &RoomId, id: &ConnectionId) {
        if let Some(members) = self.rooms.get_mut(room_id) {
            members.remove(id);
            if members.is_empty() {
                self.rooms.remove(room_id);
                tracing::debug!("Room '{}' is empty and was reaped", room_id);
            }
        }
    }
}
