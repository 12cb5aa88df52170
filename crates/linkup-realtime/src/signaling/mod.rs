//! Call-signaling relay: per-connection state machine.

pub mod relay;
pub mod state;

pub use relay::SignalingRelay;
pub use state::{ConnectionState, Effect, SessionEvent, Transition};
