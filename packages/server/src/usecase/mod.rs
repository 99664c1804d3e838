//! UseCase layer: the chat operations, built on the domain collaborators.

mod authenticate_client;
mod broadcaster;
mod connect_client;
mod delete_message;
mod disconnect_client;
pub mod error;
mod get_room;
mod get_room_messages;
mod get_rooms;
mod join_room;
mod leave_room;
mod send_message;
mod typing_tracker;
mod update_typing;

#[cfg(test)]
pub(crate) mod test_support;

pub use authenticate_client::AuthenticateClientUseCase;
pub use broadcaster::EventBroadcaster;
pub use connect_client::ConnectClientUseCase;
pub use delete_message::DeleteMessageUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{AttachIdentityError, BroadcastError, JoinError, SendMessageError, TypingError};
pub use get_room::GetRoomUseCase;
pub use get_room_messages::{DEFAULT_HISTORY_LIMIT, GetRoomMessagesUseCase, MAX_HISTORY_LIMIT};
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use send_message::SendMessageUseCase;
pub use typing_tracker::{TypingConfig, TypingTracker};
pub use update_typing::UpdateTypingUseCase;
