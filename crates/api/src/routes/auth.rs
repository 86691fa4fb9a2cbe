//! Authentication routes for user signup, login, and logout.

use axum::{
    Json, Router, extract::State, http::StatusCode, http::header, response::IntoResponse,
    routing::post,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::middleware::auth::ADMIN_TOKEN_COOKIE;
use tooldesk_core::auth::{hash_password, verify_password};
use tooldesk_db::UserRepository;
use tooldesk_shared::Role;
use tooldesk_shared::auth::{AuthResponse, LoginRequest, SignupRequest, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

/// Creates the logout router.
///
/// Kept outside the store-readiness gate: clearing cookies must work even
/// while the database is down.
pub fn logout_routes() -> Router<AppState> {
    Router::new().route("/logout", post(logout))
}

/// POST /auth/signup - Register a new end user.
///
/// Signup always assigns the `user` role; there is no way to self-register
/// as an admin.
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> impl IntoResponse {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push("name is required".to_string());
    }
    if payload.username.trim().is_empty() {
        errors.push("username is required".to_string());
    }
    if payload.password.is_empty() {
        errors.push("password is required".to_string());
    }
    if !errors.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "VALIDATION_ERROR",
                "message": "Please provide name, username, and password",
                "errors": errors
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let username = payload.username.trim().to_lowercase();

    // Check if username already exists
    match user_repo.username_exists(&username).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "CONFLICT",
                    "message": "Username already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking username");
            return internal_error("An error occurred during signup");
        }
    }

    // Hash password
    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error("An error occurred during signup");
        }
    };

    // Create user
    let user = match user_repo
        .create(&username, payload.name.trim(), &password_hash)
        .await
    {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "Failed to create user");
            return internal_error("An error occurred during signup");
        }
    };

    // Issue a session token right away
    let token = match state
        .jwt_service
        .generate_session_token(user.id, &user.username, Role::User)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate session token");
            return internal_error("An error occurred during signup");
        }
    };

    info!(user_id = %user.id, username = %user.username, "New user registered");

    (
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user: UserInfo {
                id: user.id,
                name: user.name,
                username: user.username,
                role: Role::User,
            },
        }),
    )
        .into_response()
}

/// POST /auth/login - Authenticate a user and return a session token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "VALIDATION_ERROR",
                "message": "Please provide username and password"
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let username = payload.username.trim().to_lowercase();

    // Find user by username
    let user = match user_repo.find_by_username(&username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(username = %username, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error("An error occurred during login");
        }
    };

    // Check if user is active
    if !user.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    // Verify password
    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("An error occurred during login");
        }
    }

    let token = match state
        .jwt_service
        .generate_session_token(user.id, &user.username, Role::User)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate session token");
            return internal_error("An error occurred during login");
        }
    };

    info!(user_id = %user.id, "User logged in successfully");

    (
        StatusCode::OK,
        Json(AuthResponse {
            message: "Login successful".to_string(),
            token,
            user: UserInfo {
                id: user.id,
                name: user.name,
                username: user.username,
                role: Role::User,
            },
        }),
    )
        .into_response()
}

/// POST /logout - Clear session cookies.
async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar
        .remove(Cookie::build((ADMIN_TOKEN_COOKIE, "")).path("/").build())
        .remove(Cookie::build(("user_token", "")).path("/").build());

    (
        jar,
        [(header::CACHE_CONTROL, "no-store")],
        Json(json!({ "ok": true })),
    )
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid username or password"
        })),
    )
        .into_response()
}

fn internal_error(message: &str) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "INTERNAL_ERROR",
            "message": message
        })),
    )
        .into_response()
}
