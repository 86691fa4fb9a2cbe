//! Admin account routes: login, session helpers, and back-office CRUD.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::{ADMIN_TOKEN_COOKIE, AuthPrincipal};
use crate::AppState;
use tooldesk_core::auth::{hash_password, verify_password};
use tooldesk_db::repositories::{AdminRepository, AdminUpdate, NewAdmin};
use tooldesk_shared::auth::{AdminInfo, AdminLoginRequest, AdminLoginResponse};
use tooldesk_shared::{AppError, Role};

/// Creates the public admin routes (login only).
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/admins/login", post(login))
}

/// Creates the admin routes behind admin auth.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/admins/me", get(me))
        .route("/admins/verify", get(verify))
        .route("/admins/stats/overview", get(stats_overview))
        .route("/admins", get(list_admins))
        .route("/admins", post(create_admin))
        .route("/admins/{id}", get(get_admin))
        .route("/admins/{id}", put(update_admin))
        .route("/admins/{id}", delete(delete_admin))
}

fn admin_info(admin: &tooldesk_db::entities::admins::Model) -> AdminInfo {
    AdminInfo {
        id: admin.id,
        first_name: admin.first_name.clone(),
        last_name: admin.last_name.clone(),
        email: admin.email.clone(),
        phone: admin.phone.clone(),
        is_admin: admin.is_admin,
        last_login: admin.last_login.map(|t| t.to_utc()),
    }
}

/// POST /admins/login - Authenticate an admin.
///
/// On success the session token is returned in the body and also set as
/// the `admin_token` HttpOnly cookie for back-office SSO.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<AdminLoginRequest>,
) -> impl IntoResponse {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "VALIDATION_ERROR",
                "message": "Email and password required"
            })),
        )
            .into_response();
    }

    let admin_repo = AdminRepository::new((*state.db).clone());
    let email = payload.email.trim().to_lowercase();

    let admin = match admin_repo.find_by_email(&email).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            info!(email = %email, "Admin login attempt for unknown email");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during admin login");
            return internal_error();
        }
    };

    if !admin.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "Admin account is deactivated"
            })),
        )
            .into_response();
    }

    match verify_password(&payload.password, &admin.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(admin_id = %admin.id, "Failed admin login - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    if let Err(e) = admin_repo.touch_last_login(admin.id).await {
        // Login still succeeds; the timestamp is best-effort.
        error!(error = %e, "Failed to record last login");
    }

    let token = match state
        .jwt_service
        .generate_session_token(admin.id, &admin.email, Role::Admin)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate session token");
            return internal_error();
        }
    };

    info!(admin_id = %admin.id, "Admin logged in successfully");

    let cookie = Cookie::build((ADMIN_TOKEN_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .build();

    let mut info = admin_info(&admin);
    info.last_login = Some(chrono::Utc::now());

    (
        jar.add(cookie),
        Json(AdminLoginResponse {
            message: "Admin login successful".to_string(),
            token,
            admin: info,
        }),
    )
        .into_response()
}

/// GET /admins/me - The authenticated admin's profile.
async fn me(State(state): State<AppState>, auth: AuthPrincipal) -> ApiResult<impl IntoResponse> {
    let admin_repo = AdminRepository::new((*state.db).clone());
    let admin = admin_repo
        .find_by_id(auth.id())
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

    Ok(Json(json!({ "ok": true, "admin": admin_info(&admin) })))
}

/// GET /admins/verify - Confirms the presented session is valid.
async fn verify(State(state): State<AppState>, auth: AuthPrincipal) -> ApiResult<impl IntoResponse> {
    let admin_repo = AdminRepository::new((*state.db).clone());
    let admin = admin_repo
        .find_by_id(auth.id())
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

    Ok(Json(json!({
        "message": "Token is valid",
        "admin": admin_info(&admin)
    })))
}

/// GET /admins/stats/overview - Aggregate admin counts.
async fn stats_overview(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let admin_repo = AdminRepository::new((*state.db).clone());
    let stats = admin_repo.stats().await?;

    Ok(Json(json!({
        "total": stats.total,
        "active": stats.active,
        "inactive": stats.inactive,
        "recent": stats.recent,
    })))
}

/// Query parameters for listing admins.
#[derive(Debug, Deserialize)]
struct ListAdminsQuery {
    page: Option<u64>,
    limit: Option<u64>,
    search: Option<String>,
}

/// GET /admins - List admins, paged, newest first.
async fn list_admins(
    State(state): State<AppState>,
    Query(query): Query<ListAdminsQuery>,
) -> ApiResult<impl IntoResponse> {
    let admin_repo = AdminRepository::new((*state.db).clone());
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let (admins, total) = admin_repo
        .list(query.search.as_deref(), page, limit)
        .await?;

    Ok(Json(json!({
        "admins": admins.iter().map(admin_info).collect::<Vec<_>>(),
        "totalPages": total.div_ceil(limit),
        "currentPage": page,
        "total": total,
    })))
}

/// GET /admins/{id} - Fetch one admin.
async fn get_admin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let admin_repo = AdminRepository::new((*state.db).clone());
    let admin = admin_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

    Ok(Json(json!({ "admin": admin_info(&admin) })))
}

/// Request body for creating an admin.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAdminRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    email: String,
    phone: Option<String>,
    password: String,
    #[serde(default = "default_true")]
    is_admin: bool,
}

fn default_true() -> bool {
    true
}

/// POST /admins - Create an admin, attributed to the caller.
async fn create_admin(
    State(state): State<AppState>,
    auth: AuthPrincipal,
    Json(payload): Json<CreateAdminRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = Vec::new();
    if payload.email.trim().is_empty() {
        errors.push("email is required".to_string());
    }
    if payload.password.is_empty() {
        errors.push("password is required".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors).into());
    }

    let admin_repo = AdminRepository::new((*state.db).clone());
    let email = payload.email.trim().to_lowercase();

    if admin_repo.email_exists(&email).await? {
        return Err(
            AppError::Conflict("An admin with this email already exists".to_string()).into(),
        );
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| ApiError(AppError::Internal(e.to_string())))?;

    let admin = admin_repo
        .create(NewAdmin {
            first_name: payload.first_name.as_deref(),
            last_name: payload.last_name.as_deref(),
            email: &email,
            phone: payload.phone.as_deref(),
            password_hash: &password_hash,
            is_admin: payload.is_admin,
            created_by: Some(auth.id()),
        })
        .await?;

    info!(admin_id = %admin.id, created_by = %auth.id(), "Admin created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Admin created successfully",
            "admin": admin_info(&admin)
        })),
    ))
}

/// Request body for updating an admin.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAdminRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    password: Option<String>,
    is_active: Option<bool>,
}

/// PUT /admins/{id} - Apply a partial profile update.
async fn update_admin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAdminRequest>,
) -> ApiResult<impl IntoResponse> {
    let admin_repo = AdminRepository::new((*state.db).clone());

    let password_hash = match payload.password {
        Some(ref password) if !password.is_empty() => Some(
            hash_password(password).map_err(|e| ApiError(AppError::Internal(e.to_string())))?,
        ),
        _ => None,
    };

    let admin = admin_repo
        .update(
            id,
            AdminUpdate {
                first_name: payload.first_name,
                last_name: payload.last_name,
                phone: payload.phone,
                password_hash,
                is_active: payload.is_active,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

    Ok(Json(json!({
        "message": "Admin updated successfully",
        "admin": admin_info(&admin)
    })))
}

/// DELETE /admins/{id} - Remove an admin.
async fn delete_admin(
    State(state): State<AppState>,
    auth: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if id == auth.id() {
        return Err(AppError::validation("You cannot delete your own account").into());
    }

    let admin_repo = AdminRepository::new((*state.db).clone());
    if !admin_repo.delete(id).await? {
        return Err(AppError::NotFound("Admin not found".to_string()).into());
    }

    Ok(Json(json!({ "message": "Admin deleted" })))
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid email or password"
        })),
    )
        .into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "INTERNAL_ERROR",
            "message": "An error occurred during login"
        })),
    )
        .into_response()
}
