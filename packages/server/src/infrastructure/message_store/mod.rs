//! `MessageStore` implementations.

pub mod inmemory;

pub use inmemory::{DEFAULT_ROOM_MESSAGE_CAPACITY, InMemoryMessageStore};
