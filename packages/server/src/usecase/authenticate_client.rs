//! UseCase: attach an identity to an open connection

use std::sync::Arc;

use crate::domain::{
    Authenticator, ConnectionId, Identity, MessagePusher, RoomRepository, ServerEvent,
};

use super::error::AttachIdentityError;

pub struct AuthenticateClientUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    authenticator: Arc<dyn Authenticator>,
}

impl AuthenticateClientUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            authenticator,
        }
    }

    /// Verify `credential` and attach the resulting identity. The last
    /// successful call wins.
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        credential: &str,
    ) -> Result<Identity, AttachIdentityError> {
        let identity = self.authenticator.authenticate(credential)?;
        self.repository
            .attach_identity(connection_id, identity.clone())
            .await?;

        tracing::info!(
            "Connection '{}' authenticated as '{}'",
            connection_id,
            identity.username
        );
        if let Err(e) = self
            .message_pusher
            .push_to(connection_id, &ServerEvent::Authenticated(identity.clone()))
            .await
        {
            tracing::warn!("Failed to confirm authentication to '{}': {}", connection_id, e);
        }
        Ok(identity)
    }
}
