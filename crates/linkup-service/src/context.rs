//! Request context carrying the authenticated caller.

use serde::{Deserialize, Serialize};

use linkup_core::types::Identity;

/// Context for the current authenticated request.
///
/// Built by the `AuthUser` extractor and passed into service methods so
/// every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated identity.
    pub identity: Identity,
    /// Username from the token, if present.
    pub username: Option<String>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(identity: Identity, username: Option<String>) -> Self {
        Self { identity, username }
    }
}
