//! States, inputs, and effects of the per-connection state machine.

use linkup_core::types::Identity;

use crate::message::types::{ClientEvent, OutboundEvent};

/// Lifecycle of one connection.
///
/// `Connecting → Authenticated → Registered → Closed`; `Closed` is reachable
/// from every state and is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Handshake not yet verified.
    Connecting,
    /// Credential verified; identity bound for the connection's lifetime.
    Authenticated {
        /// Bound identity.
        identity: Identity,
    },
    /// The client registered itself as online.
    Registered {
        /// Bound identity.
        identity: Identity,
    },
    /// Terminal.
    Closed,
}

impl ConnectionState {
    /// The bound identity, once authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated { identity } | Self::Registered { identity } => Some(identity),
            Self::Connecting | Self::Closed => None,
        }
    }

    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Authenticated { .. } => "authenticated",
            Self::Registered { .. } => "registered",
            Self::Closed => "closed",
        }
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Connection opened with an optional credential.
    Handshake {
        /// Raw token.
        credential: Option<String>,
    },
    /// A decoded client event.
    Inbound(ClientEvent),
    /// The transport is gone: close frame, error, heartbeat timeout or shutdown.
    Disconnect,
}

/// Side effects requested by a transition, applied by the connection manager.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send an event back to this connection.
    Reply(OutboundEvent),
    /// Deliver an event to every connection in `to`'s room except this one.
    Forward {
        /// Target identity.
        to: Identity,
        /// Event to deliver.
        event: OutboundEvent,
    },
    /// Put this connection into the identity's room.
    Register(Identity),
    /// Take this connection out of the identity's room.
    Release(Identity),
    /// Close the transport.
    Close,
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Next state.
    pub state: ConnectionState,
    /// Effects, in order.
    pub effects: Vec<Effect>,
}

impl Transition {
    /// Move to `state` with no effects.
    pub fn to(state: ConnectionState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    /// Stay in `state` with no effects.
    pub fn stay(state: &ConnectionState) -> Self {
        Self::to(state.clone())
    }

    /// Stay in `state` and reply with `event`.
    pub fn reply(state: &ConnectionState, event: OutboundEvent) -> Self {
        Self::stay(state).with(Effect::Reply(event))
    }

    /// Append an effect.
    pub fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Whether the transition closes the transport.
    pub fn closes(&self) -> bool {
        self.effects.contains(&Effect::Close)
    }
}
