//! Expense ledger routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use tooldesk_core::expense::{self, ExpenseEntry};
use tooldesk_core::ledger;
use tooldesk_db::repositories::expense::{ExpenseRepository, to_entry};
use tooldesk_shared::AppError;

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", post(create_expense))
        .route("/expenses", get(list_expenses))
        .route("/expenses/monthly", get(monthly_expenses))
        .route("/expenses/grouped", get(grouped_expenses))
        .route("/expenses/{id}", delete(delete_expense))
}

/// Request body for creating an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Short title.
    pub title: Option<String>,
    /// Amount spent.
    pub amount: Option<Decimal>,
    /// Day of the expense: `YYYY-MM-DD` or an ISO-8601 datetime.
    #[serde(alias = "day")]
    pub date: Option<String>,
    /// Optional note.
    pub note: Option<String>,
    /// Category label.
    pub category: Option<String>,
}

/// Query parameters for the monthly report.
#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    /// Year, defaults to the current UTC year.
    pub year: Option<i32>,
    /// Month 1-12, defaults to the current UTC month.
    pub month: Option<u32>,
}

/// POST /expenses - Add a new expense entry.
async fn create_expense(
    State(state): State<AppState>,
    Json(payload): Json<CreateExpenseRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = Vec::new();

    let title = payload.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        errors.push("title is required".to_string());
    }
    if payload.amount.is_none() {
        errors.push("amount is required".to_string());
    }
    let category = payload
        .category
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if category.is_empty() {
        errors.push("category is required".to_string());
    }
    let day = match payload.date.as_deref() {
        None => {
            errors.push("date is required".to_string());
            None
        }
        Some(raw) => match ledger::parse_day(raw) {
            Ok(day) => Some(day),
            Err(e) => {
                errors.extend(e.messages().iter().cloned());
                None
            }
        },
    };

    let (Some(amount), Some(day)) = (payload.amount, day) else {
        return Err(AppError::Validation(errors).into());
    };
    if !errors.is_empty() {
        return Err(AppError::Validation(errors).into());
    }

    let repo = ExpenseRepository::new((*state.db).clone());
    let model = repo
        .create(title, amount, day, payload.note.as_deref(), category)
        .await?;

    Ok((StatusCode::CREATED, Json(to_entry(&model))))
}

/// GET /expenses - List all expenses, newest day first.
async fn list_expenses(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let repo = ExpenseRepository::new((*state.db).clone());
    let entries: Vec<ExpenseEntry> = repo.list_all().await?.iter().map(to_entry).collect();

    Ok(Json(entries))
}

/// GET /expenses/monthly?year=&month= - Expenses of one calendar month
/// with their total.
async fn monthly_expenses(
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> ApiResult<impl IntoResponse> {
    let now = Utc::now();
    let year = query.year.unwrap_or_else(|| now.year());
    let month = query.month.unwrap_or_else(|| now.month());

    let (first, next) = ledger::month_bounds(year, month)?;

    let repo = ExpenseRepository::new((*state.db).clone());
    let entries: Vec<ExpenseEntry> = repo
        .find_in_range(first, next)
        .await?
        .iter()
        .map(to_entry)
        .collect();

    Ok(Json(json!({
        "month": month,
        "year": year,
        "total": expense::total(&entries),
        "expenses": entries,
    })))
}

/// GET /expenses/grouped - All expenses grouped by day, newest day first.
async fn grouped_expenses(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let repo = ExpenseRepository::new((*state.db).clone());
    let entries: Vec<ExpenseEntry> = repo.list_all().await?.iter().map(to_entry).collect();

    Ok(Json(json!({ "groups": expense::group_by_day(entries) })))
}

/// DELETE /expenses/{id} - Remove an expense.
async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = ExpenseRepository::new((*state.db).clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound("Expense not found".to_string()).into());
    }

    Ok(Json(json!({ "message": "Expense deleted" })))
}
