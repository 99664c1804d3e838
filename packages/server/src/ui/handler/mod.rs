//! Request handlers.

mod auth;
mod http;
mod websocket;

pub use http::{delete_message, get_room, get_room_messages, get_rooms, health_check};
pub use websocket::websocket_handler;
