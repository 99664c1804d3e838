//! Utilities shared by the Inkpot server and client binaries.

pub mod logger;
pub mod time;
