//! Terminal client for Inkpot chat rooms.

pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
mod runner;
mod session;
pub mod state;
mod ui;

pub use runner::run_client;
