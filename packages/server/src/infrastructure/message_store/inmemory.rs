//! InMemory MessageStore implementation
//!
//! Keeps every room's history in process memory. Ids are global and
//! monotonically increasing from 1; each room holds at most `room_capacity`
//! messages, and storing into a full room evicts its oldest message.

use std::{
    collections::{HashMap, VecDeque},
    num::NonZeroUsize,
    sync::Arc,
};

use async_trait::async_trait;
use inkpot_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, DeleteMessageError, Identity, MessageBody, MessageId, MessagePage, MessageStore,
    PersistenceError, RoomId, StoredMessage, Timestamp, UserId,
};

pub const DEFAULT_ROOM_MESSAGE_CAPACITY: NonZeroUsize = NonZeroUsize::new(10_000).unwrap();

#[derive(Default)]
struct StoreInner {
    last_id: i64,
    rooms: HashMap<RoomId, VecDeque<ChatMessage>>,
}

pub struct InMemoryMessageStore {
    inner: Mutex<StoreInner>,
    clock: Arc<dyn Clock>,
    room_capacity: NonZeroUsize,
}

impl InMemoryMessageStore {
    pub fn new(room_capacity: NonZeroUsize) -> Self {
        Self::with_clock(room_capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(room_capacity: NonZeroUsize, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            clock,
            room_capacity,
        }
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_MESSAGE_CAPACITY)
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn store(
        &self,
        room_id: &RoomId,
        sender: &Identity,
        body: &MessageBody,
    ) -> Result<StoredMessage, PersistenceError> {
        let mut inner = self.inner.lock().await;

        inner.last_id += 1;
        let stored = StoredMessage {
            id: MessageId::new(inner.last_id),
            timestamp: Timestamp::new(self.clock.now_millis()),
        };
        let message = ChatMessage::from_stored(stored, room_id.clone(), sender, body.clone());

        let history = inner.rooms.entry(room_id.clone()).or_default();
        while history.len() >= self.room_capacity.get() {
            if let Some(evicted) = history.pop_front() {
                tracing::debug!(
                    "Evicted message {} from full room '{}'",
                    evicted.id.value(),
                    room_id
                );
            }
        }
        history.push_back(message);

        tracing::debug!("Stored message {} in room '{}'", stored.id.value(), room_id);
        Ok(stored)
    }

    async fn page(
        &self,
        room_id: &RoomId,
        page: usize,
        limit: usize,
    ) -> Result<MessagePage, PersistenceError> {
        let page = page.max(1);
        let inner = self.inner.lock().await;
        let Some(history) = inner.rooms.get(room_id) else {
            return Ok(MessagePage {
                messages: Vec::new(),
                page,
                limit,
                total: 0,
            });
        };

        let total = history.len();
        let skipped = (page - 1).saturating_mul(limit);
        let end = total.saturating_sub(skipped);
        let start = end.saturating_sub(limit);
        Ok(MessagePage {
            messages: history.range(start..end).cloned().collect(),
            page,
            limit,
            total,
        })
    }

    async fn delete(
        &self,
        message_id: MessageId,
        user_id: UserId,
    ) -> Result<ChatMessage, DeleteMessageError> {
        let mut inner = self.inner.lock().await;
        for history in inner.rooms.values_mut() {
            let Some(position) = history.iter().position(|m| m.id == message_id) else {
                continue;
            };
            if history[position].user_id != user_id {
                return Err(DeleteMessageError::NotAuthor(message_id));
            }
            if let Some(removed) = history.remove(position) {
                tracing::debug!(
                    "Deleted message {} from room '{}'",
                    message_id.value(),
                    removed.room_id
                );
                return Ok(removed);
            }
        }
        Err(DeleteMessageError::NotFound(message_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Username;
    use inkpot_shared::time::FixedClock;

    fn room(name: &str) -> RoomId {
        RoomId::new(name.to_string()).unwrap()
    }

    fn alice() -> Identity {
        Identity::new(UserId::new(1), Username::new("alice".to_string()).unwrap())
    }

    fn bob() -> Identity {
        Identity::new(UserId::new(2), Username::new("bob".to_string()).unwrap())
    }

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn body(text: &str) -> MessageBody {
        MessageBody::new(text.to_string()).unwrap()
    }

    fn bodies(page: &MessagePage) -> Vec<&str> {
        page.messages.iter().map(|m| m.body.as_str()).collect()
    }

    async fn store_all(store: &InMemoryMessageStore, texts: &[&str]) {
        for text in texts {
            store.store(&room("general"), &alice(), &body(text)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_ids_start_at_one_and_increase() {
        // Test: ids are assigned in store order across rooms
        // given:
        let store = InMemoryMessageStore::with_clock(capacity(10), Arc::new(FixedClock::new(1000)));

        // when:
        let first = store.store(&room("general"), &alice(), &body("a")).await.unwrap();
        let second = store.store(&room("random"), &alice(), &body("b")).await.unwrap();

        // then:
        assert_eq!(first.id, MessageId::new(1));
        assert_eq!(second.id, MessageId::new(2));
        assert_eq!(first.timestamp, Timestamp::new(1000));
    }

    #[tokio::test]
    async fn test_pages_walk_back_from_newest() {
        // Test: page 1 is the newest slice, later pages go back in time, and
        // every page is in send order
        // given:
        let store = InMemoryMessageStore::default();
        store_all(&store, &["one", "two", "three", "four", "five"]).await;

        // when:
        let first = store.page(&room("general"), 1, 2).await.unwrap();
        let second = store.page(&room("general"), 2, 2).await.unwrap();
        let last = store.page(&room("general"), 3, 2).await.unwrap();
        let beyond = store.page(&room("general"), 4, 2).await.unwrap();

        // then:
        assert_eq!(bodies(&first), vec!["four", "five"]);
        assert_eq!(bodies(&second), vec!["two", "three"]);
        assert_eq!(bodies(&last), vec!["one"]);
        assert!(beyond.messages.is_empty());
        assert_eq!(first.total, 5);
        assert_eq!(first.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_page_of_unknown_room_is_empty() {
        let store = InMemoryMessageStore::default();
        let page = store.page(&room("empty"), 0, 10).await.unwrap();
        assert!(page.messages.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_full_room_evicts_oldest() {
        // Test: a full room keeps accepting messages and drops its oldest
        // given:
        let store = InMemoryMessageStore::new(capacity(2));
        store_all(&store, &["a", "b"]).await;

        // when:
        let third = store.store(&room("general"), &alice(), &body("c")).await.unwrap();

        // then:
        assert_eq!(third.id, MessageId::new(3));
        let page = store.page(&room("general"), 1, 10).await.unwrap();
        assert_eq!(bodies(&page), vec!["b", "c"]);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_author_deletes_own_message() {
        // given:
        let store = InMemoryMessageStore::default();
        store_all(&store, &["keep", "drop"]).await;

        // when:
        let deleted = store.delete(MessageId::new(2), alice().user_id).await.unwrap();

        // then:
        assert_eq!(deleted.body.as_str(), "drop");
        let page = store.page(&room("general"), 1, 10).await.unwrap();
        assert_eq!(bodies(&page), vec!["keep"]);
    }

    #[tokio::test]
    async fn test_delete_rejects_other_users_and_missing_ids() {
        // Test: only the author may delete; unknown ids are reported as such
        // given:
        let store = InMemoryMessageStore::default();
        store_all(&store, &["mine"]).await;

        // when:
        let foreign = store.delete(MessageId::new(1), bob().user_id).await;
        let missing = store.delete(MessageId::new(42), alice().user_id).await;

        // then:
        assert_eq!(foreign, Err(DeleteMessageError::NotAuthor(MessageId::new(1))));
        assert_eq!(missing, Err(DeleteMessageError::NotFound(MessageId::new(42))));
        assert_eq!(store.page(&room("general"), 1, 10).await.unwrap().total, 1);
    }
}
