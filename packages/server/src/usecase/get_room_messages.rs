//! UseCase: read a page of a room's history

use std::sync::Arc;

use crate::domain::{MessagePage, MessageStore, PersistenceError, RoomId};

/// Messages per page when the caller gives no limit
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
/// Upper bound on a single history request
pub const MAX_HISTORY_LIMIT: usize = 200;

pub struct GetRoomMessagesUseCase {
    message_store: Arc<dyn MessageStore>,
}

impl GetRoomMessagesUseCase {
    pub fn new(message_store: Arc<dyn MessageStore>) -> Self {
        Self { message_store }
    }

    /// Page `page` of `room_id` (1 = newest), oldest first within the page.
    /// Missing or zero values fall back to page 1 and the default limit.
    pub async fn execute(
        &self,
        room_id: &RoomId,
        page: Option<usize>,
        limit: Option<usize>,
    ) -> Result<MessagePage, PersistenceError> {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .min(MAX_HISTORY_LIMIT);
        self.message_store.page(room_id, page, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockMessageStore;
    use crate::usecase::test_support::room;

    fn empty_page(page: usize, limit: usize) -> MessagePage {
        MessagePage {
            messages: Vec::new(),
            page,
            limit,
            total: 0,
        }
    }

    #[tokio::test]
    async fn test_defaults() {
        // Test: no parameters means the first page of the default size
        // given:
        let mut store = MockMessageStore::new();
        store
            .expect_page()
            .withf(|_, page, limit| *page == 1 && *limit == DEFAULT_HISTORY_LIMIT)
            .returning(|_, page, limit| Ok(empty_page(page, limit)));

        // when:
        let result = GetRoomMessagesUseCase::new(Arc::new(store))
            .execute(&room("general"), None, None)
            .await;

        // then:
        assert_eq!(result, Ok(empty_page(1, DEFAULT_HISTORY_LIMIT)));
    }

    #[tokio::test]
    async fn test_limit_is_capped_and_zero_page_is_first() {
        // Test: oversized limits are clamped and page 0 reads page 1
        // given:
        let mut store = MockMessageStore::new();
        store
            .expect_page()
            .withf(|_, page, limit| *page == 1 && *limit == MAX_HISTORY_LIMIT)
            .returning(|_, page, limit| Ok(empty_page(page, limit)));

        // when:
        let result = GetRoomMessagesUseCase::new(Arc::new(store))
            .execute(&room("general"), Some(0), Some(10_000))
            .await;

        // then:
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_store_failure_is_surfaced() {
        let mut store = MockMessageStore::new();
        store
            .expect_page()
            .returning(|_, _, _| Err(PersistenceError::Unavailable("db down".to_string())));

        let result = GetRoomMessagesUseCase::new(Arc::new(store))
            .execute(&room("general"), Some(2), Some(10))
            .await;

        assert_eq!(
            result,
            Err(PersistenceError::Unavailable("db down".to_string()))
        );
    }
}
