//! Admin entitlement routes: assigning tools to users.
//!
//! Assignment upserts by (user, tool) and always resets the grant to
//! active; unassignment deletes the pair. Listings derive expiry against
//! the read-time clock without ever writing the derived state back.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use tooldesk_core::entitlement;
use tooldesk_core::ledger::parse_day;
use tooldesk_db::entities::{tools, user_tools, users};
use tooldesk_db::{EntitlementRepository, ToolRepository, UserRepository};
use tooldesk_shared::AppError;

/// Creates the admin entitlement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/tools", get(list_tools))
        .route("/admin/assign-tool", post(assign_tool))
        .route("/admin/unassign-tool", delete(unassign_tool))
        .route("/admin/users-with-tools", get(users_with_tools))
        .route("/admin/user-tools/{username}", get(user_tools_by_username))
}

/// Request body for assigning a tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignToolRequest {
    /// Target username.
    pub username: Option<String>,
    /// Tool slug.
    pub tool_slug: Option<String>,
    /// Grant expiry: ISO-8601 datetime or `YYYY-MM-DD`.
    pub expires_at: Option<String>,
}

/// Request body for unassigning a tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignToolRequest {
    /// Target username.
    pub username: Option<String>,
    /// Tool slug.
    pub tool_slug: Option<String>,
}

/// Tool info embedded in grant listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    /// Tool ID.
    pub id: Uuid,
    /// Tool name.
    pub name: String,
    /// Tool slug.
    pub slug: String,
    /// Image URL.
    pub image: Option<String>,
    /// Access URL.
    pub access_url: Option<String>,
}

impl From<&tools::Model> for ToolInfo {
    fn from(tool: &tools::Model) -> Self {
        Self {
            id: tool.id,
            name: tool.name.clone(),
            slug: tool.slug.clone(),
            image: tool.image.clone(),
            access_url: tool.access_url.clone(),
        }
    }
}

/// One grant as rendered in admin listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantInfo {
    /// Grant record ID.
    pub id: Uuid,
    /// Stored status.
    pub status: String,
    /// Expiry instant.
    pub expires_at: String,
    /// Derived at read time; never written back.
    pub is_expired: bool,
    /// The granted tool, if it still exists.
    pub tool: Option<ToolInfo>,
}

fn grant_info(
    grant: &user_tools::Model,
    tool: Option<&tools::Model>,
    now: DateTime<Utc>,
) -> GrantInfo {
    let expires_at = grant.expires_at.to_utc();
    GrantInfo {
        id: grant.id,
        status: tooldesk_core::entitlement::GrantStatus::from(grant.status.clone()).to_string(),
        expires_at: expires_at.to_rfc3339(),
        is_expired: entitlement::is_expired(expires_at, now),
        tool: tool.map(Into::into),
    }
}

/// Parses an expiry value: full datetime, or a bare day read as UTC midnight.
fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Some(instant.with_timezone(&Utc));
    }
    parse_day(raw)
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// GET /admin/tools - Active tools for the assignment dropdown.
async fn list_tools(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let tool_repo = ToolRepository::new((*state.db).clone());
    let tools: Vec<ToolInfo> = tool_repo.list_active().await?.iter().map(Into::into).collect();

    Ok(Json(json!({ "tools": tools })))
}

/// Resolves a (username, slug) pair to rows, with per-field validation.
async fn resolve_pair(
    state: &AppState,
    username: Option<&str>,
    tool_slug: Option<&str>,
) -> Result<(users::Model, tools::Model), crate::error::ApiError> {
    let mut errors = Vec::new();
    let username = username.map(|u| u.trim().to_lowercase()).unwrap_or_default();
    if username.is_empty() {
        errors.push("username is required".to_string());
    }
    let slug = tool_slug.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    if slug.is_empty() {
        errors.push("toolSlug is required".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors).into());
    }

    let user = UserRepository::new((*state.db).clone())
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let tool = ToolRepository::new((*state.db).clone())
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Tool not found".to_string()))?;

    Ok((user, tool))
}

/// POST /admin/assign-tool - Grant a tool to a user (create or update).
async fn assign_tool(
    State(state): State<AppState>,
    Json(payload): Json<AssignToolRequest>,
) -> ApiResult<impl IntoResponse> {
    let expires_at = match payload.expires_at.as_deref() {
        None => return Err(AppError::validation("expiresAt is required").into()),
        Some(raw) => parse_expiry(raw)
            .ok_or_else(|| AppError::validation("Invalid expiresAt date"))?,
    };

    let (user, tool) =
        resolve_pair(&state, payload.username.as_deref(), payload.tool_slug.as_deref()).await?;

    let repo = EntitlementRepository::new((*state.db).clone());
    let record = repo.assign(user.id, tool.id, expires_at).await?;

    info!(user_id = %user.id, tool = %tool.slug, "Tool assigned");

    Ok(Json(json!({
        "message": "Tool assigned successfully",
        "username": user.username,
        "tool": tool.name,
        "toolSlug": tool.slug,
        "expiresAt": record.expires_at.to_utc().to_rfc3339(),
        "recordId": record.id,
    })))
}

/// DELETE /admin/unassign-tool - Remove a grant.
async fn unassign_tool(
    State(state): State<AppState>,
    Json(payload): Json<UnassignToolRequest>,
) -> ApiResult<impl IntoResponse> {
    let (user, tool) =
        resolve_pair(&state, payload.username.as_deref(), payload.tool_slug.as_deref()).await?;

    let repo = EntitlementRepository::new((*state.db).clone());
    if !repo.unassign(user.id, tool.id).await? {
        return Err(AppError::NotFound("Assignment not found".to_string()).into());
    }

    info!(user_id = %user.id, tool = %tool.slug, "Tool unassigned");

    Ok(Json(json!({
        "message": "Tool unassigned successfully",
        "username": user.username,
        "tool": tool.name,
        "toolSlug": tool.slug,
    })))
}

/// GET /admin/users-with-tools - Every user with their grants, grouped.
async fn users_with_tools(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = UserRepository::new((*state.db).clone()).list_all().await?;
    let grants = EntitlementRepository::new((*state.db).clone())
        .list_all()
        .await?;
    let now = Utc::now();

    let rows: Vec<serde_json::Value> = users
        .iter()
        .map(|user| {
            let assigned: Vec<GrantInfo> = grants
                .iter()
                .filter(|(grant, _)| grant.user_id == user.id)
                .map(|(grant, tool)| grant_info(grant, tool.as_ref(), now))
                .collect();
            let active = assigned
                .iter()
                .filter(|g| g.status == "active" && !g.is_expired)
                .count();

            json!({
                "id": user.id,
                "username": user.username,
                "name": user.name,
                "role": user.role,
                "tools": assigned,
                "summary": {
                    "total": assigned.len(),
                    "active": active,
                    "none": assigned.is_empty(),
                },
            })
        })
        .collect();

    Ok(Json(json!({ "users": rows })))
}

/// GET /admin/user-tools/{username} - One user's grants.
async fn user_tools_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let username = username.trim().to_lowercase();
    if username.is_empty() {
        return Err(AppError::validation("Username required").into());
    }

    let user = UserRepository::new((*state.db).clone())
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let grants = EntitlementRepository::new((*state.db).clone())
        .list_for_user(user.id)
        .await?;
    let now = Utc::now();

    let tools: Vec<GrantInfo> = grants
        .iter()
        .map(|(grant, tool)| grant_info(grant, tool.as_ref(), now))
        .collect();

    Ok(Json(json!({
        "user": {
            "id": user.id,
            "username": user.username,
            "name": user.name,
        },
        "tools": tools,
    })))
}
