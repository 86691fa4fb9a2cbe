//! Authentication middleware for protected routes.
//!
//! One authentication capability, two token-source strategies composed
//! explicitly per route group:
//!
//! - [`TokenSource::BearerClaim`] reads the `Authorization` header.
//! - [`TokenSource::CookieSession`] reads the `admin_token` cookie set by
//!   the admin login (back-office SSO).
//!
//! User routes accept bearer tokens only. Admin routes try the cookie
//! first, then the header; either way the claims must carry the admin
//! role AND the admin row must still exist and be active. There is no
//! user-role-as-admin fallback.
//!
//! Handlers see only the [`Principal`] context stored in request
//! extensions; cookies and token formats stop here.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tracing::warn;

use crate::AppState;
use tooldesk_db::AdminRepository;
use tooldesk_shared::auth::{Claims, Principal, Role};

/// Cookie carrying the admin session token.
pub const ADMIN_TOKEN_COOKIE: &str = "admin_token";

/// Where a session token may be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// `Authorization: Bearer <token>` header.
    BearerClaim,
    /// `admin_token` HttpOnly cookie.
    CookieSession,
}

impl TokenSource {
    /// Extracts a raw token from the request headers, if present.
    #[must_use]
    pub fn extract(self, headers: &HeaderMap) -> Option<String> {
        match self {
            Self::BearerClaim => headers
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(extract_bearer_token)
                .map(ToString::to_string),
            Self::CookieSession => CookieJar::from_headers(headers)
                .get(ADMIN_TOKEN_COOKIE)
                .map(|cookie| cookie.value().to_string()),
        }
    }
}

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn unauthorized(error: &str, message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": error, "message": message })),
    )
        .into_response()
}

/// Validates the first token found in `sources` and returns its claims.
fn claims_from_sources(
    state: &AppState,
    headers: &HeaderMap,
    sources: &[TokenSource],
) -> Result<Claims, Response> {
    let token = sources
        .iter()
        .find_map(|source| source.extract(headers))
        .ok_or_else(|| unauthorized("missing_token", "Authentication required"))?;

    state.jwt_service.validate_token(&token).map_err(|e| match e {
        tooldesk_shared::JwtError::Expired => {
            unauthorized("token_expired", "Token has expired")
        }
        _ => unauthorized("invalid_token", "Invalid or malformed token"),
    })
}

/// Authentication middleware for end-user routes (bearer tokens only).
pub async fn user_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let claims = match claims_from_sources(&state, request.headers(), &[TokenSource::BearerClaim]) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    let principal = Principal {
        id: claims.principal_id(),
        role: claims.role,
    };
    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(principal);
    next.run(request).await
}

/// Authentication middleware for admin routes.
///
/// Tries the cookie session first, then the bearer header. The decoded
/// claims must carry the admin role, and the admin row is re-checked
/// against the credential store so a deactivated admin loses access
/// immediately, tokens notwithstanding.
pub async fn admin_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let claims = match claims_from_sources(
        &state,
        request.headers(),
        &[TokenSource::CookieSession, TokenSource::BearerClaim],
    ) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    if claims.role != Role::Admin {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "admin_required",
                "message": "Admin access required"
            })),
        )
            .into_response();
    }

    let admin_repo = AdminRepository::new((*state.db).clone());
    match admin_repo.find_by_id(claims.principal_id()).await {
        Ok(Some(admin)) if admin.is_active => {}
        Ok(_) => {
            warn!(admin_id = %claims.principal_id(), "Token for missing or deactivated admin");
            return unauthorized("admin_not_found", "Admin not found or deactivated");
        }
        Err(e) => {
            tracing::error!(error = %e, "Database error during admin auth");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "An error occurred during authentication"
                })),
            )
                .into_response();
        }
    }

    let principal = Principal {
        id: claims.principal_id(),
        role: claims.role,
    };
    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(principal);
    next.run(request).await
}

/// Extractor for the authenticated principal context.
///
/// Use this in handlers to get `{id, role}`:
///
/// ```ignore
/// async fn handler(auth: AuthPrincipal) -> impl IntoResponse {
///     let principal_id = auth.id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

impl AuthPrincipal {
    /// Returns the principal ID.
    #[must_use]
    pub const fn id(&self) -> uuid::Uuid {
        self.0.id
    }

    /// Returns the principal role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.0.role
    }
}

impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .map(AuthPrincipal)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

/// Extractor for the full session claims (identity included).
#[derive(Debug, Clone)]
pub struct SessionClaims(pub Claims);

impl<S> FromRequestParts<S> for SessionClaims
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(SessionClaims)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_bearer_source_reads_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok123"));

        assert_eq!(
            TokenSource::BearerClaim.extract(&headers),
            Some("tok123".to_string())
        );
        assert_eq!(TokenSource::CookieSession.extract(&headers), None);
    }

    #[test]
    fn test_cookie_source_reads_admin_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("admin_token=tok456; other=x"),
        );

        assert_eq!(
            TokenSource::CookieSession.extract(&headers),
            Some("tok456".to_string())
        );
        assert_eq!(TokenSource::BearerClaim.extract(&headers), None);
    }
}
