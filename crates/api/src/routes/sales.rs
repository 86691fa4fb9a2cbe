//! Sales ledger routes.
//!
//! Every write runs through the Ledger Engine's explicit normalize step
//! before persistence; reads fold stored records with the engine's
//! aggregate queries. Records are append-only: posting twice on the same
//! day produces two records, and daily totals sum across them.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use tooldesk_core::ledger::{
    self, NormalizedSale, SaleItem, SaleItemDraft,
};
use tooldesk_db::repositories::sale::{SaleRepository, to_normalized};
use tooldesk_db::entities::sales;
use tooldesk_shared::AppError;

/// Creates the sales routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", post(create_sale))
        .route("/sales", get(list_sales))
        .route("/sales/today", get(today_summary))
        .route("/sales/by-date", get(by_date_summary))
        .route("/sales/monthly", get(monthly_summary))
        .route("/sales/{id}", put(update_sale))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a sale record.
#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    /// Sale day: `YYYY-MM-DD` or an ISO-8601 datetime.
    #[serde(alias = "day")]
    pub date: Option<String>,
    /// Sold items. Optional; an empty record is valid.
    #[serde(default)]
    pub items: Vec<SaleItemDraft>,
}

/// Request body for updating a sale record. Both fields optional.
#[derive(Debug, Deserialize)]
pub struct UpdateSaleRequest {
    /// New sale day.
    #[serde(alias = "day")]
    pub date: Option<String>,
    /// Replacement item list.
    pub items: Option<Vec<SaleItemDraft>>,
}

/// Query parameters for the by-date summary.
#[derive(Debug, Deserialize)]
pub struct ByDateQuery {
    /// Day to summarize, `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// Query parameters for the monthly summary.
#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    /// Year, defaults to the current UTC year.
    pub year: Option<i32>,
    /// Month 1-12, defaults to the current UTC month.
    pub month: Option<u32>,
}

/// A stored sale record as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    /// Record ID.
    pub id: Uuid,
    /// Sale day as a UTC-midnight instant.
    pub date: String,
    /// Items in insertion order.
    pub items: Vec<SaleItem>,
    /// Sum of item selling prices.
    pub total_sales_amount: Decimal,
    /// Sum of item profits.
    pub total_profit: Decimal,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

fn sale_response(model: &sales::Model) -> ApiResult<SaleResponse> {
    let normalized = to_normalized(model)?;
    Ok(SaleResponse {
        id: model.id,
        date: utc_midnight(model.day),
        items: normalized.items,
        total_sales_amount: model.total_sales_amount,
        total_profit: model.total_profit,
        created_at: model.created_at.to_utc().to_rfc3339(),
        updated_at: model.updated_at.to_utc().to_rfc3339(),
    })
}

/// Renders a day as its UTC-midnight instant, e.g. `2024-03-05T00:00:00Z`.
fn utc_midnight(day: NaiveDate) -> String {
    format!("{day}T00:00:00Z")
}

fn load_normalized(models: &[sales::Model]) -> ApiResult<Vec<NormalizedSale>> {
    models
        .iter()
        .map(|m| to_normalized(m).map_err(Into::into))
        .collect()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /sales - Create a sale record (always appends, never merges).
async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<CreateSaleRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = Vec::new();

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

    let items = match ledger::validate_items(&payload.items) {
        Ok(items) => Some(items),
        Err(e) => {
            errors.extend(e.messages().iter().cloned());
            None
        }
    };

    let (Some(day), Some(items)) = (day, items) else {
        return Err(AppError::Validation(errors).into());
    };

    let sale = ledger::normalize(day, items);
    let repo = SaleRepository::new((*state.db).clone());
    let model = repo.create(&sale).await?;

    Ok((StatusCode::CREATED, Json(sale_response(&model)?)))
}

/// GET /sales - List all records, newest day first.
async fn list_sales(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let repo = SaleRepository::new((*state.db).clone());
    let models = repo.list_all().await?;

    let sales: Vec<SaleResponse> = models
        .iter()
        .map(sale_response)
        .collect::<ApiResult<_>>()?;

    Ok(Json(sales))
}

/// GET /sales/today - Aggregate of today's records (UTC).
///
/// Returns a zero-valued aggregate with `totalOrders: 0` when nothing was
/// sold yet; this variant never 404s.
async fn today_summary(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let repo = SaleRepository::new((*state.db).clone());
    let records = load_normalized(&repo.find_by_day(today).await?)?;

    Ok(Json(ledger::daily_summary(today, &records, true)))
}

/// GET /sales/by-date?date=YYYY-MM-DD - Aggregate of one day's records.
///
/// Fails with 404 when the day has no records.
async fn by_date_summary(
    State(state): State<AppState>,
    Query(query): Query<ByDateQuery>,
) -> ApiResult<impl IntoResponse> {
    let raw = query
        .date
        .ok_or_else(|| AppError::validation("date query parameter is required"))?;
    let day = ledger::parse_day(&raw)?;

    let repo = SaleRepository::new((*state.db).clone());
    let models = repo.find_by_day(day).await?;
    if models.is_empty() {
        return Err(AppError::NotFound("No sale found for date".to_string()).into());
    }

    let records = load_normalized(&models)?;
    Ok(Json(ledger::daily_summary(day, &records, false)))
}

/// GET /sales/monthly?year=&month= - Dense monthly series plus totals.
async fn monthly_summary(
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> ApiResult<impl IntoResponse> {
    let now = Utc::now();
    let year = query.year.unwrap_or_else(|| now.year());
    let month = query.month.unwrap_or_else(|| now.month());

    let (first, next) = ledger::month_bounds(year, month)?;

    let repo = SaleRepository::new((*state.db).clone());
    let records = load_normalized(&repo.find_in_range(first, next).await?)?;

    let summary = ledger::monthly_summary(year, month, &records)?;

    Ok(Json(summary))
}

/// PUT /sales/{id} - Apply a partial change and re-normalize.
///
/// Whatever subset of `{date, items}` the caller sends, the merged record
/// passes through normalize before persisting, so the totals invariant
/// holds after every update.
async fn update_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSaleRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = SaleRepository::new((*state.db).clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale not found".to_string()))?;
    let current = to_normalized(&existing)?;

    let mut errors = Vec::new();

    let day = match payload.date.as_deref() {
        None => Some(current.day),
        Some(raw) => match ledger::parse_day(raw) {
            Ok(day) => Some(day),
            Err(e) => {
                errors.extend(e.messages().iter().cloned());
                None
            }
        },
    };

    let items = match payload.items {
        None => Some(current.items),
        Some(ref drafts) => match ledger::validate_items(drafts) {
            Ok(items) => Some(items),
            Err(e) => {
                errors.extend(e.messages().iter().cloned());
                None
            }
        },
    };

    let (Some(day), Some(items)) = (day, items) else {
        return Err(AppError::Validation(errors).into());
    };

    let sale = ledger::normalize(day, items);
    let model = repo
        .update(id, &sale)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale not found".to_string()))?;

    Ok(Json(sale_response(&model)?))
}
