//! UseCase: tear down a closed connection

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, MessagePusher, RoomRepository};

use super::{EventBroadcaster, TypingTracker};

pub struct DisconnectClientUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    typing: Arc<TypingTracker>,
    broadcaster: Arc<EventBroadcaster>,
}

impl DisconnectClientUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        typing: Arc<TypingTracker>,
        broadcaster: Arc<EventBroadcaster>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            typing,
            broadcaster,
        }
    }

    /// Unregister the connection, drop its typing state and outbound queue,
    /// and tell its former room that it left.
    ///
    /// Calling this for an already-removed connection is a no-op.
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Connection> {
        self.message_pusher.unregister_client(connection_id).await;
        let connection = self.repository.unregister_connection(connection_id).await?;

        if let Some(room_id) = &connection.room {
            self.typing.clear_connection(room_id, connection_id).await;
            self.broadcaster
                .broadcast_member_left(room_id, connection.member_info())
                .await;
        }

        tracing::info!("Connection '{}' closed", connection_id);
        Some(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::dto::websocket::ServerMessage;
    use crate::usecase::test_support::{Harness, alice, bob, room};

    fn usecase(harness: &Harness) -> DisconnectClientUseCase {
        DisconnectClientUseCase::new(
            harness.repository.clone(),
            harness.pusher.clone(),
            harness.typing.clone(),
            harness.broadcaster.clone(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_cleans_everything() {
        // Test: membership, typing state and outbound queue are all released
        // given:
        let harness = Harness::new();
        let (leaver, _leaver_rx) = harness.connect(Some(alice())).await;
        let (stayer, mut stayer_rx) = harness.connect(Some(bob())).await;
        for id in [leaver, stayer] {
            harness.repository.join_room(&id, room("general")).await.unwrap();
        }
        harness.typing.start(&room("general"), leaver, &alice()).await;
        Harness::drain(&mut stayer_rx);

        // when:
        let removed = usecase(&harness).execute(&leaver).await;

        // then:
        assert_eq!(removed.unwrap().id, leaver);
        assert!(harness.repository.get_connection(&leaver).await.is_none());
        assert_eq!(harness.repository.members_of(&room("general")).await, vec![stayer]);
        assert_eq!(harness.typing.active_count().await, 0);
        assert!(matches!(
            Harness::drain(&mut stayer_rx).as_slice(),
            [ServerMessage::UserLeft { user_id: Some(1), .. }]
        ));

        // and no stop-typing arrives later from the cancelled expiry
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        assert!(Harness::drain(&mut stayer_rx).is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_noop() {
        // Test: a second disconnect for the same id does nothing
        // given:
        let harness = Harness::new();
        let (id, _rx) = harness.connect(None).await;
        let usecase = usecase(&harness);
        usecase.execute(&id).await;

        // when:
        let second = usecase.execute(&id).await;

        // then:
        assert!(second.is_none());
    }
}
