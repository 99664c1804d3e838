//! WebSocket MessagePusher implementation
//!
//! The UI layer owns the sockets; this pusher only holds the sending half of
//! each connection's bounded outbound queue. Events are encoded once per call
//! and handed to every target with `try_send`, so a slow connection loses
//! events instead of stalling the broadcaster.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::domain::{
    BroadcastReport, ConnectionId, MessagePusher, PushError, PusherChannel, ServerEvent,
};
use crate::infrastructure::dto::conversion::encode_event;

#[derive(Default)]
pub struct WebSocketMessagePusher {
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(event: &ServerEvent) -> Result<String, PushError> {
        encode_event(event).map_err(|e| PushError::Encoding(e.to_string()))
    }

    fn deliver(
        connection_id: ConnectionId,
        sender: &PusherChannel,
        frame: String,
    ) -> Result<(), PushError> {
        sender.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => PushError::QueueFull(connection_id),
            TrySendError::Closed(_) => PushError::ChannelClosed(connection_id),
        })
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), PushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;
        let sender = clients
            .get(connection_id)
            .ok_or(PushError::ClientNotFound(*connection_id))?;
        Self::deliver(*connection_id, sender, frame)
    }

    async fn broadcast(&self, targets: &[ConnectionId], event: &ServerEvent) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        if targets.is_empty() {
            return report;
        }

        let frame = match Self::encode(event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Dropping broadcast: {}", e);
                report
                    .failed
                    .extend(targets.iter().map(|id| (*id, e.clone())));
                return report;
            }
        };

        let clients = self.clients.lock().await;
        for target in targets {
            let result = match clients.get(target) {
                Some(sender) => Self::deliver(*target, sender, frame.clone()),
                None => Err(PushError::ClientNotFound(*target)),
            };
            match result {
                Ok(()) => report.delivered.push(*target),
                Err(e) => {
                    tracing::warn!("Failed to push event to '{}': {}", target, e);
                    report.failed.push((*target, e));
                }
            }
        }
        report
    }
}
