//! UseCase: delete a stored message on behalf of its author

use std::sync::Arc;

use crate::domain::{ChatMessage, DeleteMessageError, Identity, MessageId, MessageStore};

pub struct DeleteMessageUseCase {
    message_store: Arc<dyn MessageStore>,
}

impl DeleteMessageUseCase {
    pub fn new(message_store: Arc<dyn MessageStore>) -> Self {
        Self { message_store }
    }

    pub async fn execute(
        &self,
        message_id: MessageId,
        requester: &Identity,
    ) -> Result<ChatMessage, DeleteMessageError> {
        match self.message_store.delete(message_id, requester.user_id).await {
            Ok(message) => {
                tracing::info!(
                    "'{}' deleted message {} in '{}'",
                    requester.username,
                    message_id.value(),
                    message.room_id
                );
                Ok(message)
            }
            Err(e) => {
                tracing::warn!(
                    "'{}' could not delete message {}: {}",
                    requester.username,
                    message_id.value(),
                    e
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageBody, MessagePage, RoomId};
    use crate::usecase::test_support::{Harness, alice, bob, room};

    async fn seed(harness: &Harness, text: &str) -> MessageId {
        harness
            .store
            .store(
                &room("general"),
                &alice(),
                &MessageBody::new(text.to_string()).unwrap(),
            )
            .await
            .unwrap()
            .id
    }

    async fn history(harness: &Harness, room_id: &RoomId) -> MessagePage {
        harness.store.page(room_id, 1, 10).await.unwrap()
    }

    #[tokio::test]
    async fn test_author_can_delete() {
        // given:
        let harness = Harness::new();
        let id = seed(&harness, "oops").await;

        // when:
        let deleted = DeleteMessageUseCase::new(harness.store.clone())
            .execute(id, &alice())
            .await
            .unwrap();

        // then:
        assert_eq!(deleted.id, id);
        assert_eq!(history(&harness, &room("general")).await.total, 0);
    }

    #[tokio::test]
    async fn test_other_user_is_refused() {
        // Test: bob cannot delete alice's message and it stays in history
        // given:
        let harness = Harness::new();
        let id = seed(&harness, "mine").await;

        // when:
        let result = DeleteMessageUseCase::new(harness.store.clone())
            .execute(id, &bob())
            .await;

        // then:
        assert_eq!(result, Err(DeleteMessageError::NotAuthor(id)));
        assert_eq!(history(&harness, &room("general")).await.total, 1);
    }
}
