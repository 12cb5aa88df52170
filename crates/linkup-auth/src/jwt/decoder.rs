//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use linkup_core::config::AuthConfig;
use linkup_core::error::AppError;

use super::claims::Claims;

/// Validates JWT signatures and expiry.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token string.
    ///
    /// Checks:
    /// 1. Signature validity
    /// 2. Expiration
    /// 3. Non-empty subject
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(AppError::authentication("Token has no subject"));
        }

        tracing::trace!(sub = %token_data.claims.sub, "Token verified");

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use linkup_core::error::ErrorKind;
    use linkup_core::types::Identity;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_access_ttl_minutes: 60,
            leeway_seconds: 0,
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let cfg = config("test-secret");
        let issued = JwtEncoder::new(&cfg)
            .issue(&Identity::new("alice"), Some("ally"))
            .expect("issue");
        let claims = JwtDecoder::new(&cfg).decode(&issued.token).expect("decode");
        assert_eq!(claims.identity(), Identity::new("alice"));
        assert_eq!(claims.username.as_deref(), Some("ally"));
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = JwtEncoder::new(&config("one"))
            .issue(&Identity::new("alice"), None)
            .expect("issue");
        let err = JwtDecoder::new(&config("two"))
            .decode(&issued.token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_expired_rejected() {
        let cfg = config("test-secret");
        let issued = JwtEncoder::new(&cfg)
            .issue_with_ttl(&Identity::new("alice"), None, chrono::Duration::minutes(-5))
            .expect("issue");
        let err = JwtDecoder::new(&cfg).decode(&issued.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn test_garbage_rejected() {
        let err = JwtDecoder::new(&config("s")).decode("not-a-jwt").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_empty_subject_rejected() {
        let cfg = config("test-secret");
        let issued = JwtEncoder::new(&cfg)
            .issue(&Identity::new(""), None)
            .expect("issue");
        let err = JwtDecoder::new(&cfg).decode(&issued.token).unwrap_err();
        assert_eq!(err.message, "Token has no subject");
    }
}
