//! JWT token creation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use linkup_core::config::AuthConfig;
use linkup_core::error::AppError;
use linkup_core::types::Identity;

use super::claims::Claims;

/// Creates signed JWT access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token TTL in minutes.
    ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

/// A freshly signed token and its expiry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IssuedToken {
    /// Signed JWT.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_minutes: config.jwt_access_ttl_minutes as i64,
        }
    }

    /// Issues a token for `identity` valid for the configured TTL.
    pub fn issue(
        &self,
        identity: &Identity,
        username: Option<&str>,
    ) -> Result<IssuedToken, AppError> {
        self.issue_with_ttl(identity, username, chrono::Duration::minutes(self.ttl_minutes))
    }

    /// Issues a token with an explicit lifetime. A negative `ttl` yields an
    /// already-expired token.
    pub fn issue_with_ttl(
        &self,
        identity: &Identity,
        username: Option<&str>,
        ttl: chrono::Duration,
    ) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let exp = now + ttl;

        let claims = Claims {
            sub: identity.as_str().to_string(),
            username: username.map(str::to_string),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))?;

        Ok(IssuedToken {
            token,
            expires_at: exp,
        })
    }
}
