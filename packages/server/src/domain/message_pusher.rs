//! MessagePusher trait definition
//!
//! Abstracts the transport's per-connection send primitive. Sends never wait
//! on a slow connection: a connection that cannot accept an event right now
//! simply misses it.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, PushError, ServerEvent};

/// Outbound channel of one connection (encoded frames)
pub type PusherChannel = mpsc::Sender<String>;

/// Per-recipient result of one broadcast call
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: Vec<ConnectionId>,
    pub failed: Vec<(ConnectionId, PushError)>,
}

impl BroadcastReport {
    pub fn delivered_count(&self) -> usize {
        self.delivered.len()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Deliver an event to a single connection
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), PushError>;

    /// Deliver an event to every target. A failure for one target never
    /// prevents delivery to the others.
    async fn broadcast(&self, targets: &[ConnectionId], event: &ServerEvent) -> BroadcastReport;
}
