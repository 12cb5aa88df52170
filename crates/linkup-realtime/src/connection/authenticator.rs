//! WebSocket authentication: validates the JWT supplied at handshake.

use std::sync::Arc;

use linkup_auth::jwt::JwtDecoder;
use linkup_core::error::AppError;
use linkup_core::types::Identity;

/// Sent when the handshake carries no credential.
pub const AUTH_REQUIRED: &str = "Authentication required";
/// Sent when the credential fails verification.
pub const AUTH_INVALID: &str = "Invalid or expired token";

/// Authenticated connection info extracted from the JWT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedConnection {
    /// Identity from the `sub` claim.
    pub identity: Identity,
}

/// Authenticates WebSocket connections using JWT tokens.
#[derive(Clone)]
pub struct WsAuthenticator {
    /// JWT decoder.
    decoder: Arc<JwtDecoder>,
}

impl std::fmt::Debug for WsAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsAuthenticator").finish()
    }
}

impl WsAuthenticator {
    /// Creates a new WebSocket authenticator.
    pub fn new(decoder: Arc<JwtDecoder>) -> Self {
        Self { decoder }
    }

    /// Authenticates a handshake credential.
    ///
    /// The error message is the one sent to the client in `authError`.
    pub fn authenticate(
        &self,
        credential: Option<&str>,
    ) -> Result<AuthenticatedConnection, AppError> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication(AUTH_REQUIRED))?;

        let claims = self.decoder.decode(token).map_err(|e| {
            tracing::debug!(error = %e, "Handshake credential rejected");
            AppError::with_source(
                linkup_core::error::ErrorKind::Authentication,
                AUTH_INVALID,
                e,
            )
        })?;

        Ok(AuthenticatedConnection {
            identity: claims.identity(),
        })
    }
}
