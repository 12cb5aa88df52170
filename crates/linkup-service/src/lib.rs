//! # linkup-service
//!
//! The user-account collaborator consulted by the signaling relay and the
//! social-graph routes.
//!
//! Services follow constructor injection: dependencies are provided at
//! construction time via `Arc` references.

pub mod account;
pub mod context;
pub mod graph;

pub use account::{AccountDirectory, MemoryAccountDirectory};
pub use context::RequestContext;
pub use graph::SocialGraphService;
