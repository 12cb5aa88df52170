//! # linkup-api
//!
//! HTTP API layer for Linkup built on Axum.
//!
//! Provides the WebSocket upgrade carrying presence and call signaling, the
//! social-graph routes, presence and health endpoints, middleware (CORS,
//! logging), the `AuthUser` extractor, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
