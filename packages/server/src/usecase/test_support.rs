//! Shared fixtures for use case tests: real in-memory collaborators wired
//! together, plus helpers to connect clients and read what they were sent.

use std::{num::NonZeroUsize, sync::Arc};

use inkpot_shared::time::FixedClock;
use tokio::sync::mpsc;

use crate::domain::{
    ConnectionId, Identity, MessagePusher, RoomId, RoomRepository, Timestamp, UserId, Username,
};
use crate::infrastructure::{
    dto::websocket::ServerMessage, message_pusher::WebSocketMessagePusher,
    message_store::InMemoryMessageStore, repository::InMemoryRoomRepository,
};

use super::{EventBroadcaster, TypingConfig, TypingTracker};

pub const TEST_NOW: i64 = 1_700_000_000_000;

pub fn room(name: &str) -> RoomId {
    RoomId::new(name.to_string()).unwrap()
}

pub fn alice() -> Identity {
    Identity::new(UserId::new(1), Username::new("alice".to_string()).unwrap())
}

pub fn bob() -> Identity {
    Identity::new(UserId::new(2), Username::new("bob".to_string()).unwrap())
}

pub fn carol() -> Identity {
    Identity::new(UserId::new(9), Username::new("carol".to_string()).unwrap())
}

pub struct Harness {
    pub repository: Arc<InMemoryRoomRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub store: Arc<InMemoryMessageStore>,
    pub clock: Arc<FixedClock>,
    pub broadcaster: Arc<EventBroadcaster>,
    pub typing: Arc<TypingTracker>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_typing_config(TypingConfig::default())
    }

    pub fn with_typing_config(config: TypingConfig) -> Self {
        let repository = Arc::new(InMemoryRoomRepository::default());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let clock = Arc::new(FixedClock::new(TEST_NOW));
        let capacity = NonZeroUsize::new(100).unwrap();
        let store = Arc::new(InMemoryMessageStore::with_clock(capacity, clock.clone()));
        let broadcaster = Arc::new(EventBroadcaster::new(
            repository.clone(),
            pusher.clone(),
            store.clone(),
            clock.clone(),
        ));
        let typing = Arc::new(TypingTracker::new(broadcaster.clone(), config));
        Self {
            repository,
            pusher,
            store,
            clock,
            broadcaster,
            typing,
        }
    }

    /// Register a connection with an outbound queue, bypassing the connect
    /// use case
    pub async fn connect(
        &self,
        identity: Option<Identity>,
    ) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = self
            .repository
            .register_connection(Timestamp::new(TEST_NOW))
            .await;
        if let Some(identity) = identity {
            self.repository.attach_identity(&id, identity).await.unwrap();
        }
        let (tx, rx) = mpsc::channel(32);
        self.pusher.register_client(id, tx).await;
        (id, rx)
    }

    /// Everything queued for a connection so far, decoded
    pub fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<ServerMessage> {
        let mut received = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            received.push(serde_json::from_str(&frame).unwrap());
        }
        received
    }
}
