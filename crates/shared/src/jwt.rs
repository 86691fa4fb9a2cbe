//! JWT session token generation and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{Claims, Role};

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,
}

/// JWT service for session token operations.
#[derive(Clone)]
pub struct JwtService {
    session_expiry_days: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("session_expiry_days", &self.session_expiry_days)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service.
    #[must_use]
    pub fn new(secret: &str, session_expiry_days: i64) -> Self {
        Self {
            session_expiry_days,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Mints a session token for a principal.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_session_token(
        &self,
        principal_id: Uuid,
        identity: &str,
        role: Role,
    ) -> Result<String, JwtError> {
        let expires_at = Utc::now() + Duration::days(self.session_expiry_days);
        let claims = Claims::new(principal_id, identity, role, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a session token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired, and
    /// `JwtError::DecodingError` if it is malformed or tampered with.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Session token lifetime in seconds.
    #[must_use]
    pub const fn session_expires_in(&self) -> i64 {
        self.session_expiry_days * 86_400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret-key-for-testing", 7)
    }

    #[test]
    fn test_generate_and_validate_user_token() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let token = service
            .generate_session_token(user_id, "faizan", Role::User)
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.principal_id(), user_id);
        assert_eq!(claims.identity, "faizan");
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn test_admin_token_carries_admin_role() {
        let service = create_test_service();
        let admin_id = Uuid::new_v4();

        let token = service
            .generate_session_token(admin_id, "ops@example.com", Role::Admin)
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.identity, "ops@example.com");
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        assert!(service.validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let service = create_test_service();
        let other = JwtService::new("a-different-secret", 7);

        let token = other
            .generate_session_token(Uuid::new_v4(), "x", Role::User)
            .unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::DecodingError(_))
        ));
    }

    #[test]
    fn test_session_expires_in_seconds() {
        assert_eq!(create_test_service().session_expires_in(), 604_800);
    }
}
