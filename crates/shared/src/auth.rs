//! Authentication types: principal roles, JWT claims, request/response payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Principal role carried inside session tokens.
///
/// Two principal kinds exist: end users (dashboard) and admins (back office).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End user principal.
    User,
    /// Admin principal.
    Admin,
}

impl Role {
    /// Returns the role as the string stored in tokens and rows.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// JWT claims for session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal ID).
    pub sub: Uuid,
    /// Principal identity: username for users, email for admins.
    pub identity: String,
    /// Principal role.
    pub role: Role,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a principal.
    #[must_use]
    pub fn new(principal_id: Uuid, identity: &str, role: Role, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: principal_id,
            identity: identity.to_string(),
            role,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the principal ID from claims.
    #[must_use]
    pub const fn principal_id(&self) -> Uuid {
        self.sub
    }
}

/// The authenticated principal context attached to each request.
///
/// This is all a component below the HTTP boundary ever sees of auth:
/// no cookies, no token formats, just `{id, role}`.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    /// Principal ID.
    pub id: Uuid,
    /// Principal role.
    pub role: Role,
}

/// Signup request payload.
///
/// Fields default to empty so missing keys surface as validation
/// messages, not body-rejection errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    /// Display name.
    pub name: String,
    /// Login username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// User login request payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    /// Login username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Admin login request payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminLoginRequest {
    /// Admin email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login username.
    pub username: String,
    /// Role string.
    pub role: Role,
}

/// Response for signup and user login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Human-readable status message.
    pub message: String,
    /// Bearer session token.
    pub token: String,
    /// The authenticated user.
    pub user: UserInfo,
}

/// Admin info returned in auth responses (never includes the hash).
#[derive(Debug, Clone, Serialize)]
pub struct AdminInfo {
    /// Admin ID.
    pub id: Uuid,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Admin email.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Admin flag.
    pub is_admin: bool,
    /// Last login timestamp.
    pub last_login: Option<DateTime<Utc>>,
}

/// Response for admin login.
#[derive(Debug, Clone, Serialize)]
pub struct AdminLoginResponse {
    /// Human-readable status message.
    pub message: String,
    /// Bearer session token (also set as the `admin_token` cookie).
    pub token: String,
    /// The authenticated admin.
    pub admin: AdminInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::User.as_str(), "user");
        assert!(Role::from_str("owner").is_err());
    }

    #[test]
    fn test_claims_carry_identity_and_role() {
        let id = Uuid::new_v4();
        let expires = Utc::now() + chrono::Duration::days(7);
        let claims = Claims::new(id, "faizan", Role::User, expires);

        assert_eq!(claims.principal_id(), id);
        assert_eq!(claims.identity, "faizan");
        assert_eq!(claims.role, Role::User);
        assert!(claims.exp > claims.iat);
    }
}
