//! Infrastructure layer: concrete implementations of the domain collaborators
//! and the wire DTOs.

pub mod auth;
pub mod dto;
pub mod message_pusher;
pub mod message_store;
pub mod repository;
