//! Subscription record routes.
//!
//! At most one active record per email is enforced here on create and on
//! email-changing updates; it is a write-path rule, not a storage
//! constraint. Creating a record optionally sends a notification email;
//! a failed send never fails the write.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use tooldesk_core::subscription::{self, SubscriptionDuration, SubscriptionStatus};
use tooldesk_db::SubscriptionRepository;
use tooldesk_db::entities::sea_orm_active_enums::SubscriptionStatus as DbSubscriptionStatus;
use tooldesk_db::entities::subscriptions;
use tooldesk_db::repositories::SubscriptionUpdate;
use tooldesk_shared::AppError;

/// Creates the subscription routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/subscriptions", get(list_subscriptions))
        .route("/subscriptions", post(create_subscription))
        .route("/subscriptions/{id}", get(get_subscription))
        .route("/subscriptions/{id}", put(update_subscription))
        .route("/subscriptions/{id}", delete(delete_subscription))
}

/// Query parameters for listing subscriptions.
#[derive(Debug, Deserialize)]
pub struct ListSubscriptionsQuery {
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
    /// Status filter; `all` (or absent) disables it.
    pub status: Option<String>,
    /// Email search term.
    pub search: Option<String>,
}

/// Request body for creating a subscription.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    /// Subscriber email.
    pub email: Option<String>,
    /// Plan duration ("6 Months" or "1 Year").
    pub duration: Option<SubscriptionDuration>,
    /// Start instant; defaults to now.
    pub date: Option<DateTime<Utc>>,
    /// Initial status; defaults to active.
    pub status: Option<SubscriptionStatus>,
    /// Whether to send the notification email; defaults to true.
    pub send_email: Option<bool>,
}

/// Request body for updating a subscription. All fields optional.
#[derive(Debug, Deserialize)]
pub struct UpdateSubscriptionRequest {
    /// New subscriber email.
    pub email: Option<String>,
    /// New plan duration.
    pub duration: Option<SubscriptionDuration>,
    /// New start instant.
    pub date: Option<DateTime<Utc>>,
    /// New status.
    pub status: Option<SubscriptionStatus>,
}

/// A subscription record as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    /// Record ID.
    pub id: Uuid,
    /// Subscriber email.
    pub email: String,
    /// Plan duration label.
    pub duration: String,
    /// Start instant.
    pub date: String,
    /// Record status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

fn subscription_response(model: &subscriptions::Model) -> SubscriptionResponse {
    let duration: SubscriptionDuration = model.duration.clone().into();
    SubscriptionResponse {
        id: model.id,
        email: model.email.clone(),
        duration: duration.label().to_string(),
        date: model.day.to_utc().to_rfc3339(),
        status: match model.status {
            DbSubscriptionStatus::Active => "active",
            DbSubscriptionStatus::Inactive => "inactive",
            DbSubscriptionStatus::Expired => "expired",
        }
        .to_string(),
        created_at: model.created_at.to_utc().to_rfc3339(),
        updated_at: model.updated_at.to_utc().to_rfc3339(),
    }
}

/// GET /subscriptions - List records, paged, newest first.
async fn list_subscriptions(
    State(state): State<AppState>,
    Query(query): Query<ListSubscriptionsQuery>,
) -> ApiResult<impl IntoResponse> {
    let repo = SubscriptionRepository::new((*state.db).clone());
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let status = match query.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(parse_status(raw)?),
    };

    let (models, total) = repo
        .list(status.map(Into::into), query.search.as_deref(), page, limit)
        .await?;

    Ok(Json(json!({
        "subscriptions": models.iter().map(subscription_response).collect::<Vec<_>>(),
        "totalPages": total.div_ceil(limit),
        "currentPage": page,
        "total": total,
    })))
}

/// GET /subscriptions/{id} - Fetch one record.
async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = SubscriptionRepository::new((*state.db).clone());
    let model = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

    Ok(Json(subscription_response(&model)))
}

/// POST /subscriptions - Create a record and (best-effort) notify.
async fn create_subscription(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubscriptionRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_lowercase();
    let mut errors = Vec::new();
    if email.is_empty() {
        errors.push("email is required".to_string());
    } else if !email.contains('@') {
        errors.push("email is invalid".to_string());
    }
    let Some(duration) = payload.duration else {
        errors.push("duration is required".to_string());
        return Err(AppError::Validation(errors).into());
    };
    if !errors.is_empty() {
        return Err(AppError::Validation(errors).into());
    }

    let repo = SubscriptionRepository::new((*state.db).clone());

    // One active record per email (business rule, write-path enforced).
    if repo.find_active_by_email(&email, None).await?.is_some() {
        return Err(AppError::Conflict(
            "An active subscription already exists for this email".to_string(),
        )
        .into());
    }

    let day = payload.date.unwrap_or_else(Utc::now);
    let status = payload.status.unwrap_or(SubscriptionStatus::Active);
    let model = repo
        .create(&email, duration.into(), day, status.into())
        .await?;

    info!(email = %model.email, duration = %duration, "Subscription saved");

    // Notification side-effect: never fails the write.
    let mut email_sent = false;
    if payload.send_email.unwrap_or(true) {
        let expires_on = subscription::expiry_date(day, duration);
        match state
            .email_service
            .send_subscription_email(&email, duration.label(), expires_on)
            .await
        {
            Ok(()) => {
                info!(email = %email, "Subscription email sent");
                email_sent = true;
            }
            Err(e) => {
                error!(error = %e, email = %email, "Failed to send subscription email");
            }
        }
    }

    let mut body = serde_json::to_value(subscription_response(&model))
        .unwrap_or_else(|_| json!({}));
    if let Some(object) = body.as_object_mut() {
        object.insert("emailSent".to_string(), json!(email_sent));
    }

    Ok((StatusCode::CREATED, Json(body)))
}

/// PUT /subscriptions/{id} - Apply a partial update.
async fn update_subscription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubscriptionRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = SubscriptionRepository::new((*state.db).clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

    let email = payload
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());

    // Changing the email must not collide with another active record.
    if let Some(ref new_email) = email
        && *new_email != existing.email
        && repo
            .find_active_by_email(new_email, Some(id))
            .await?
            .is_some()
    {
        return Err(AppError::Conflict(
            "An active subscription already exists for this email".to_string(),
        )
        .into());
    }

    let model = repo
        .update(
            id,
            SubscriptionUpdate {
                email,
                duration: payload.duration.map(Into::into),
                day: payload.date,
                status: payload.status.map(Into::into),
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

    Ok(Json(subscription_response(&model)))
}

/// DELETE /subscriptions/{id} - Remove a record.
async fn delete_subscription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = SubscriptionRepository::new((*state.db).clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound("Subscription not found".to_string()).into());
    }

    Ok(Json(json!({ "message": "Subscription deleted" })))
}

fn parse_status(raw: &str) -> Result<SubscriptionStatus, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation(format!("unknown status filter: {raw}")))
}
