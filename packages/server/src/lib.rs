//! Inkpot real-time chat server.
//!
//! Connections join named rooms over WebSocket; messages are persisted and
//! fanned out to the other members, and typing indicators expire on their own.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
