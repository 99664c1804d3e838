//! Shared application state.

use std::{num::NonZeroUsize, sync::Arc};

use inkpot_shared::time::{Clock, SystemClock};

use crate::{
    config::ServerConfig,
    domain::{Authenticator, MessagePusher, MessageStore, RoomRepository},
    infrastructure::{
        auth::JwtAuthenticator, message_pusher::WebSocketMessagePusher,
        message_store::InMemoryMessageStore, repository::InMemoryRoomRepository,
    },
    usecase::{
        AuthenticateClientUseCase, ConnectClientUseCase, DeleteMessageUseCase,
        DisconnectClientUseCase, EventBroadcaster, GetRoomMessagesUseCase, GetRoomUseCase,
        GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase, TypingTracker,
        UpdateTypingUseCase,
    },
};

pub struct AppState {
    pub authenticator: Arc<dyn Authenticator>,
    /// Used by the socket handler for direct error replies
    pub message_pusher: Arc<dyn MessagePusher>,
    pub outbound_capacity: NonZeroUsize,
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub authenticate_client_usecase: Arc<AuthenticateClientUseCase>,
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub update_typing_usecase: Arc<UpdateTypingUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_usecase: Arc<GetRoomUseCase>,
    pub get_room_messages_usecase: Arc<GetRoomMessagesUseCase>,
    pub delete_message_usecase: Arc<DeleteMessageUseCase>,
}

impl AppState {
    /// Wire the in-memory collaborators and every use case for `config`
    pub fn from_config(config: &ServerConfig) -> Self {
        // 1. Collaborators
        let repository: Arc<dyn RoomRepository> = Arc::new(InMemoryRoomRepository::default());
        let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());
        let message_store: Arc<dyn MessageStore> =
            Arc::new(InMemoryMessageStore::new(config.room_message_capacity));
        let authenticator: Arc<dyn Authenticator> =
            Arc::new(JwtAuthenticator::new(&config.jwt_secret));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        // 2. Broadcast and typing machinery
        let broadcaster = Arc::new(EventBroadcaster::new(
            repository.clone(),
            message_pusher.clone(),
            message_store.clone(),
            clock.clone(),
        ));
        let typing = Arc::new(TypingTracker::new(
            broadcaster.clone(),
            config.typing_config(),
        ));

        // 3. UseCases
        Self {
            authenticator: authenticator.clone(),
            message_pusher: message_pusher.clone(),
            outbound_capacity: config.outbound_capacity,
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock,
            )),
            authenticate_client_usecase: Arc::new(AuthenticateClientUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                authenticator,
            )),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                typing.clone(),
                broadcaster.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                typing.clone(),
                broadcaster.clone(),
            )),
            leave_room_usecase: Arc::new(LeaveRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                typing.clone(),
                broadcaster.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                message_pusher,
                typing.clone(),
                broadcaster,
            )),
            update_typing_usecase: Arc::new(UpdateTypingUseCase::new(repository.clone(), typing)),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_usecase: Arc::new(GetRoomUseCase::new(repository, message_store.clone())),
            get_room_messages_usecase: Arc::new(GetRoomMessagesUseCase::new(
                message_store.clone(),
            )),
            delete_message_usecase: Arc::new(DeleteMessageUseCase::new(message_store)),
        }
    }
}
