//! Event bridge: social-graph and content events into client broadcasts.

pub mod event_bridge;

pub use event_bridge::EventBridge;
