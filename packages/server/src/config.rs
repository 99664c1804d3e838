//! Server configuration.

use std::{num::NonZeroUsize, time::Duration};

use crate::infrastructure::message_store::DEFAULT_ROOM_MESSAGE_CAPACITY;
use crate::usecase::TypingConfig;

/// Per-connection outbound queue length
pub const DEFAULT_OUTBOUND_CAPACITY: NonZeroUsize = NonZeroUsize::new(64).unwrap();

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// HS256 signing secret for connection tokens
    pub jwt_secret: String,
    pub typing_ttl: Duration,
    pub broadcast_typing_expiry: bool,
    pub outbound_capacity: NonZeroUsize,
    pub room_message_capacity: NonZeroUsize,
}

impl ServerConfig {
    pub fn typing_config(&self) -> TypingConfig {
        TypingConfig {
            ttl: self.typing_ttl,
            broadcast_on_expiry: self.broadcast_typing_expiry,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let typing = TypingConfig::default();
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            jwt_secret: String::new(),
            typing_ttl: typing.ttl,
            broadcast_typing_expiry: typing.broadcast_on_expiry,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            room_message_capacity: DEFAULT_ROOM_MESSAGE_CAPACITY,
        }
    }
}
