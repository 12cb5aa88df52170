//! Presence registry: which identities are online, and their private rooms.

pub mod registry;

pub use registry::PresenceRegistry;
