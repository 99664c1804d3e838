//! Typing-State Tracker
//!
//! Each `(room, user)` pair is either idle or typing. A typing entry owns a
//! spawned expiry task; a fresh signal aborts that task and spawns a new one,
//! so the indicator lives `ttl` past the latest signal.
//!
//! Entries carry a generation number. An expiry task only removes the entry it
//! was spawned for, which keeps a task that lost the race with a refresh from
//! clearing the newer entry.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle};

use crate::domain::{
    ConnectionId, Identity, RoomId, TYPING_TTL_MILLIS, TypingKey, TypingTransition, UserId,
};

use super::broadcaster::EventBroadcaster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingConfig {
    /// How long an indicator survives without a fresh signal
    pub ttl: Duration,
    /// Whether expiry is announced with `user-stop-typing`
    pub broadcast_on_expiry: bool,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_millis(TYPING_TTL_MILLIS),
            broadcast_on_expiry: true,
        }
    }
}

struct TypingEntry {
    generation: u64,
    connection_id: ConnectionId,
    identity: Identity,
    expiry: JoinHandle<()>,
}

#[derive(Default)]
struct TypingTable {
    next_generation: u64,
    entries: HashMap<TypingKey, TypingEntry>,
}

pub struct TypingTracker {
    table: Arc<Mutex<TypingTable>>,
    broadcaster: Arc<EventBroadcaster>,
    config: TypingConfig,
}

impl TypingTracker {
    pub fn new(broadcaster: Arc<EventBroadcaster>, config: TypingConfig) -> Self {
        Self {
            table: Arc::new(Mutex::new(TypingTable::default())),
            broadcaster,
            config,
        }
    }

    /// Handle a typing signal. Every signal is relayed to the other members.
    pub async fn start(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        identity: &Identity,
    ) -> TypingTransition {
        let key = TypingKey::new(room_id.clone(), identity.user_id);
        let transition = {
            let mut table = self.table.lock().await;
            table.next_generation += 1;
            let generation = table.next_generation;

            // Spawned under the lock: the task cannot observe the table
            // before its own entry is in place.
            let expiry = self.spawn_expiry(key.clone(), generation);
            let entry = TypingEntry {
                generation,
                connection_id,
                identity: identity.clone(),
                expiry,
            };
            match table.entries.insert(key, entry) {
                Some(previous) => {
                    previous.expiry.abort();
                    TypingTransition::Refreshed
                }
                None => TypingTransition::Started,
            }
        };

        tracing::debug!(
            "'{}' typing in '{}' ({:?})",
            identity.username,
            room_id,
            transition
        );
        self.broadcaster
            .broadcast_typing(room_id, &connection_id, identity, true)
            .await;
        transition
    }

    /// Handle an explicit stop-typing signal. Idle users produce no broadcast.
    pub async fn stop(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        identity: &Identity,
    ) -> TypingTransition {
        if !self.remove(room_id, identity.user_id).await {
            return TypingTransition::AlreadyIdle;
        }
        self.broadcaster
            .broadcast_typing(room_id, &connection_id, identity, false)
            .await;
        TypingTransition::Stopped
    }

    /// Forget any typing state of `user_id` in `room_id` without telling
    /// anyone. Used when the user leaves the room or disconnects.
    pub async fn clear(&self, room_id: &RoomId, user_id: UserId) -> bool {
        let removed = self.remove(room_id, user_id).await;
        if removed {
            tracing::debug!("Cleared typing state of user {} in '{}'", user_id, room_id);
        }
        removed
    }

    /// Forget every typing entry `connection_id` holds in `room_id`, whatever
    /// identity it was typing under. Used when the connection leaves the room
    /// or disconnects.
    pub async fn clear_connection(&self, room_id: &RoomId, connection_id: &ConnectionId) -> usize {
        let mut table = self.table.lock().await;
        let keys: Vec<TypingKey> = table
            .entries
            .iter()
            .filter(|(key, entry)| &key.room_id == room_id && &entry.connection_id == connection_id)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            if let Some(entry) = table.entries.remove(key) {
                entry.expiry.abort();
            }
        }
        if !keys.is_empty() {
            tracing::debug!(
                "Cleared {} typing entries of '{}' in '{}'",
                keys.len(),
                connection_id,
                room_id
            );
        }
        keys.len()
    }

    pub async fn is_typing(&self, room_id: &RoomId, user_id: UserId) -> bool {
        let table = self.table.lock().await;
        table
            .entries
            .contains_key(&TypingKey::new(room_id.clone(), user_id))
    }

    pub async fn active_count(&self) -> usize {
        self.table.lock().await.entries.len()
    }

    async fn remove(&self, room_id: &RoomId, user_id: UserId) -> bool {
        let mut table = self.table.lock().await;
        match table
            .entries
            .remove(&TypingKey::new(room_id.clone(), user_id))
        {
            Some(entry) => {
                entry.expiry.abort();
                true
            }
            None => false,
        }
    }

    fn spawn_expiry(&self, key: TypingKey, generation: u64) -> JoinHandle<()> {
        let table = self.table.clone();
        let broadcaster = self.broadcaster.clone();
        let TypingConfig {
            ttl,
            broadcast_on_expiry,
        } = self.config;

        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;

            let expired = {
                let mut table = table.lock().await;
                match table.entries.get(&key) {
                    Some(entry) if entry.generation == generation => table.entries.remove(&key),
                    _ => None,
                }
            };

            if let Some(entry) = expired {
                tracing::debug!(
                    "Typing indicator of '{}' in '{}' expired",
                    entry.identity.username,
                    key.room_id
                );
                if broadcast_on_expiry {
                    let sender = entry.connection_id;
                    broadcaster
                        .broadcast_typing(&key.room_id, &sender, &entry.identity, false)
                        .await;
                }
            }
        })
    }
}
