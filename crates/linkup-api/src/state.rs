//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use linkup_auth::jwt::JwtDecoder;
use linkup_core::config::AppConfig;
use linkup_realtime::server::RealtimeEngine;
use linkup_service::account::AccountDirectory;
use linkup_service::graph::SocialGraphService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// JWT decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Account directory
    pub directory: Arc<dyn AccountDirectory>,
    /// Follow / block rules
    pub graph: Arc<SocialGraphService>,
    /// WebSocket realtime engine
    pub realtime: Arc<RealtimeEngine>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("realtime", &self.realtime)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires the services and the realtime engine around `directory`.
    pub fn new(config: AppConfig, directory: Arc<dyn AccountDirectory>) -> Self {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let graph = Arc::new(SocialGraphService::new(directory.clone()));
        let realtime = Arc::new(RealtimeEngine::new(
            &config.realtime,
            jwt_decoder.clone(),
            directory.clone(),
        ));

        Self {
            config: Arc::new(config),
            jwt_decoder,
            directory,
            graph,
            realtime,
        }
    }
}
