//! # linkup-realtime
//!
//! Real-time engine for Linkup. Provides:
//!
//! - WebSocket connection lifecycle with JWT authentication at handshake
//! - The presence registry of online identities and their private rooms
//! - The call-signaling relay (offer, answer, ICE candidate, end, reject)
//! - Fire-and-forget broadcast hooks for social-graph and content events
//! - Engine metrics

pub mod bridge;
pub mod connection;
pub mod message;
pub mod metrics;
pub mod presence;
pub mod server;
pub mod signaling;

pub use bridge::EventBridge;
pub use connection::manager::{ConnectionManager, ConnectionSession, Handshake};
pub use presence::PresenceRegistry;
pub use server::RealtimeEngine;
pub use signaling::SignalingRelay;
