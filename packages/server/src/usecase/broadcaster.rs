//! Event Broadcaster
//!
//! Fans room events out to the room's members. Every fan-out works on a
//! snapshot of the member set taken from the repository, and the message store
//! is called with no repository lock held.
//!
//! Delivery is best-effort: each recipient gets each event at most once, and a
//! recipient whose queue is full or closed just misses it.

use std::sync::Arc;

use inkpot_shared::time::Clock;

use crate::domain::{
    BroadcastReport, ChatMessage, ConnectionId, Identity, MemberInfo, MessageBody, MessagePusher,
    MessageStore, RoomId, RoomRepository, ServerEvent, Timestamp,
};

use super::error::BroadcastError;

pub struct EventBroadcaster {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    message_store: Arc<dyn MessageStore>,
    clock: Arc<dyn Clock>,
}

impl EventBroadcaster {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        message_store: Arc<dyn MessageStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            message_store,
            clock,
        }
    }

    /// Persist a chat message, then deliver it to every member of `room_id`
    /// except the sender.
    ///
    /// Nothing is delivered when the store rejects the message.
    pub async fn broadcast_message(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        body: MessageBody,
    ) -> Result<ChatMessage, BroadcastError> {
        let connection = self
            .repository
            .get_connection(sender)
            .await
            .ok_or(BroadcastError::ConnectionNotFound(*sender))?;
        let identity = connection
            .identity
            .ok_or(BroadcastError::Unauthenticated(*sender))?;

        let stored = self
            .message_store
            .store(room_id, &identity, &body)
            .await
            .inspect_err(|e| {
                tracing::error!("Failed to store message in room '{}': {}", room_id, e)
            })?;

        let message = ChatMessage::from_stored(stored, room_id.clone(), &identity, body);
        let report = self
            .fan_out(
                room_id,
                Some(sender),
                &ServerEvent::MessageReceived(message.clone()),
            )
            .await;
        tracing::info!(
            "Message {} from '{}' delivered to {} member(s) of '{}'",
            message.id.value(),
            identity.username,
            report.delivered_count(),
            room_id
        );
        Ok(message)
    }

    /// Relay a typing start/stop to every member except `sender`.
    /// Returns the number of recipients reached.
    pub async fn broadcast_typing(
        &self,
        room_id: &RoomId,
        sender: &ConnectionId,
        identity: &Identity,
        is_typing: bool,
    ) -> usize {
        let event = ServerEvent::TypingChanged {
            room_id: room_id.clone(),
            identity: identity.clone(),
            is_typing,
        };
        self.fan_out(room_id, Some(sender), &event)
            .await
            .delivered_count()
    }

    pub async fn broadcast_member_joined(&self, room_id: &RoomId, member: MemberInfo) -> usize {
        let exclude = member.connection_id;
        let event = ServerEvent::MemberJoined {
            room_id: room_id.clone(),
            member,
            timestamp: self.now(),
        };
        self.fan_out(room_id, Some(&exclude), &event)
            .await
            .delivered_count()
    }

    pub async fn broadcast_member_left(&self, room_id: &RoomId, member: MemberInfo) -> usize {
        let exclude = member.connection_id;
        let event = ServerEvent::MemberLeft {
            room_id: room_id.clone(),
            member,
            timestamp: self.now(),
        };
        self.fan_out(room_id, Some(&exclude), &event)
            .await
            .delivered_count()
    }

    async fn fan_out(
        &self,
        room_id: &RoomId,
        exclude: Option<&ConnectionId>,
        event: &ServerEvent,
    ) -> BroadcastReport {
        let targets: Vec<ConnectionId> = self
            .repository
            .members_of(room_id)
            .await
            .into_iter()
            .filter(|id| Some(id) != exclude)
            .collect();
        self.message_pusher.broadcast(&targets, event).await
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}
