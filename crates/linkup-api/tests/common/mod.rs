//! Shared fixtures for the API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use linkup_api::AppState;
use linkup_auth::jwt::JwtEncoder;
use linkup_core::config::AppConfig;
use linkup_core::types::Identity;
use linkup_entity::account::Account;
use linkup_service::account::MemoryAccountDirectory;

pub const SECRET: &str = "integration-test-secret";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = SECRET.to_string();
    config.server.shutdown_grace_seconds = 1;
    config
}

/// alice, bob and carol; bob has blocked carol.
pub fn seeded_directory() -> Arc<MemoryAccountDirectory> {
    let alice = Account::new(Identity::new("alice"), "Alice");
    let mut bob = Account::new(Identity::new("bob"), "Bob");
    bob.blocked_users.insert(Identity::new("carol"));
    let carol = Account::new(Identity::new("carol"), "Carol");

    Arc::new(MemoryAccountDirectory::with_accounts([alice, bob, carol]))
}

pub fn test_state() -> (AppState, Arc<MemoryAccountDirectory>) {
    test_state_with(test_config())
}

pub fn test_state_with(config: AppConfig) -> (AppState, Arc<MemoryAccountDirectory>) {
    let directory = seeded_directory();
    let state = AppState::new(config, directory.clone());
    (state, directory)
}

pub fn token_for(id: &str) -> String {
    JwtEncoder::new(&test_config().auth)
        .issue(&Identity::new(id), Some(id))
        .expect("issue token")
        .token
}
