//! HTTP and WebSocket request handlers.

pub mod health;
pub mod presence;
pub mod user;
pub mod ws;
