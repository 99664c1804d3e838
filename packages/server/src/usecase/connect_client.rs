//! UseCase: register a new connection

use std::sync::Arc;

use inkpot_shared::time::Clock;

use crate::domain::{
    ConnectionId, Identity, MessagePusher, PusherChannel, RoomRepository, ServerEvent, Timestamp,
};

pub struct ConnectClientUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectClientUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// Register the connection, attach its outbound queue and greet it with
    /// a `connected` event.
    ///
    /// `identity` is `None` for connections that did not present a token at
    /// upgrade time; they may authenticate later.
    pub async fn execute(
        &self,
        sender: PusherChannel,
        identity: Option<Identity>,
    ) -> ConnectionId {
        let connected_at = Timestamp::new(self.clock.now_millis());
        let connection_id = self.repository.register_connection(connected_at).await;

        if let Some(identity) = identity.clone() {
            // Cannot fail: the id was registered above and nothing else knows it yet.
            if let Err(e) = self
                .repository
                .attach_identity(&connection_id, identity)
                .await
            {
                tracing::error!("Failed to attach identity to '{}': {}", connection_id, e);
            }
        }

        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        let greeting = ServerEvent::Connected {
            connection_id,
            identity: identity.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &greeting).await {
            tracing::warn!("Failed to greet '{}': {}", connection_id, e);
        }

        match &identity {
            Some(identity) => tracing::info!(
                "Connection '{}' opened for '{}'",
                connection_id,
                identity.username
            ),
            None => tracing::info!("Anonymous connection '{}' opened", connection_id),
        }
        connection_id
    }
}
