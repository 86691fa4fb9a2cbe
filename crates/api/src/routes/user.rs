//! End-user dashboard routes.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use chrono::Utc;
use serde_json::json;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::auth::SessionClaims;
use tooldesk_core::entitlement;
use tooldesk_db::EntitlementRepository;

/// Creates the user dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/me", get(me))
        .route("/user/my-tools", get(my_tools))
}

/// GET /user/me - The authenticated principal's identity.
async fn me(SessionClaims(claims): SessionClaims) -> impl IntoResponse {
    Json(json!({
        "userId": claims.principal_id(),
        "username": claims.identity,
    }))
}

/// GET /user/my-tools - The caller's usable tools.
///
/// Only grants that are stored-active AND unexpired at read time show up;
/// the expiry check never mutates storage.
async fn my_tools(
    State(state): State<AppState>,
    SessionClaims(claims): SessionClaims,
) -> ApiResult<impl IntoResponse> {
    let repo = EntitlementRepository::new((*state.db).clone());
    let grants = repo.list_for_user(claims.principal_id()).await?;
    let now = Utc::now();

    let tools: Vec<serde_json::Value> = grants
        .iter()
        .filter(|(grant, tool)| {
            tool.is_some()
                && entitlement::is_usable(
                    grant.status.clone().into(),
                    grant.expires_at.to_utc(),
                    now,
                )
        })
        .filter_map(|(grant, tool)| {
            tool.as_ref().map(|tool| {
                json!({
                    "id": grant.id,
                    "name": tool.name,
                    "slug": tool.slug,
                    "image": tool.image,
                    "accessUrl": tool.access_url,
                    "expiresAt": grant.expires_at.to_utc().to_rfc3339(),
                })
            })
        })
        .collect();

    Ok(Json(json!({ "tools": tools })))
}
