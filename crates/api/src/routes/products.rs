//! Product catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use tooldesk_db::entities::products;
use tooldesk_db::repositories::product::{ProductInput, ProductRepository};
use tooldesk_shared::AppError;

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}", put(update_product))
        .route("/products/{id}", delete(delete_product))
}

/// Request body for creating or replacing a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    /// Product name.
    pub name: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Display price string.
    pub price: Option<String>,
    /// Display pre-discount price string.
    pub original_price: Option<String>,
    /// Plan duration label.
    pub duration: Option<String>,
    /// Badge label.
    pub badge: Option<String>,
    /// Star rating.
    pub rating: Option<Decimal>,
    /// Review count.
    pub reviews: Option<i32>,
    /// Image asset URL.
    pub image: Option<String>,
    /// Whether priced variants exist.
    #[serde(default)]
    pub has_variants: bool,
    /// Variant definitions.
    #[serde(default = "empty_array")]
    pub variants: serde_json::Value,
    /// Feature strings.
    #[serde(default = "empty_array")]
    pub features: serde_json::Value,
    /// Label/value specification pairs.
    #[serde(default = "empty_array")]
    pub specifications: serde_json::Value,
    /// Category label.
    pub category: Option<String>,
    /// Visibility flag.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn empty_array() -> serde_json::Value {
    serde_json::Value::Array(Vec::new())
}

fn default_true() -> bool {
    true
}

impl ProductRequest {
    /// Validates required fields and converts into a repository input.
    fn into_input(self) -> Result<ProductInput, AppError> {
        let mut errors = Vec::new();

        let required = [
            ("name", self.name.as_deref()),
            ("description", self.description.as_deref()),
            ("price", self.price.as_deref()),
            ("originalPrice", self.original_price.as_deref()),
            ("duration", self.duration.as_deref()),
            ("badge", self.badge.as_deref()),
            ("image", self.image.as_deref()),
            ("category", self.category.as_deref()),
        ];
        for (field, value) in required {
            if value.map(str::trim).unwrap_or_default().is_empty() {
                errors.push(format!("{field} is required"));
            }
        }
        if self.rating.is_none() {
            errors.push("rating is required".to_string());
        }
        if self.reviews.is_none() {
            errors.push("reviews is required".to_string());
        }
        if !self.variants.is_array() {
            errors.push("variants must be an array".to_string());
        }
        if !self.features.is_array() {
            errors.push("features must be an array".to_string());
        }
        if !self.specifications.is_array() {
            errors.push("specifications must be an array".to_string());
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(ProductInput {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            original_price: self.original_price.unwrap_or_default(),
            duration: self.duration.unwrap_or_default(),
            badge: self.badge.unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
            reviews: self.reviews.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
            has_variants: self.has_variants,
            variants: self.variants,
            features: self.features,
            specifications: self.specifications,
            category: self.category.unwrap_or_default(),
            is_active: self.is_active,
        })
    }
}

/// Query parameters for listing products.
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
    /// Name/description search term.
    pub search: Option<String>,
    /// Category filter.
    pub category: Option<String>,
}

/// A product as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    /// Product ID.
    pub id: Uuid,
    /// Product name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Display price string.
    pub price: String,
    /// Display pre-discount price string.
    pub original_price: String,
    /// Plan duration label.
    pub duration: String,
    /// Badge label.
    pub badge: String,
    /// Star rating.
    pub rating: Decimal,
    /// Review count.
    pub reviews: i32,
    /// Image asset URL.
    pub image: String,
    /// Whether priced variants exist.
    pub has_variants: bool,
    /// Variant definitions.
    pub variants: serde_json::Value,
    /// Feature strings.
    pub features: serde_json::Value,
    /// Label/value specification pairs.
    pub specifications: serde_json::Value,
    /// Category label.
    pub category: String,
    /// Visibility flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

fn product_response(model: products::Model) -> ProductResponse {
    ProductResponse {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        original_price: model.original_price,
        duration: model.duration,
        badge: model.badge,
        rating: model.rating,
        reviews: model.reviews,
        image: model.image,
        has_variants: model.has_variants,
        variants: model.variants,
        features: model.features,
        specifications: model.specifications,
        category: model.category,
        is_active: model.is_active,
        created_at: model.created_at.to_utc().to_rfc3339(),
        updated_at: model.updated_at.to_utc().to_rfc3339(),
    }
}

/// POST /products - Add a product to the catalog.
async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = payload.into_input()?;

    let repo = ProductRepository::new((*state.db).clone());
    let model = repo.create(input).await?;

    Ok((StatusCode::CREATED, Json(product_response(model))))
}

/// GET /products - List products, paged, newest first.
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> ApiResult<impl IntoResponse> {
    let repo = ProductRepository::new((*state.db).clone());
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let (models, total) = repo
        .list(
            query.search.as_deref(),
            query.category.as_deref(),
            page,
            limit,
        )
        .await?;

    Ok(Json(json!({
        "products": models.into_iter().map(product_response).collect::<Vec<_>>(),
        "totalPages": total.div_ceil(limit),
        "currentPage": page,
        "total": total,
    })))
}

/// GET /products/{id} - Fetch one product.
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = ProductRepository::new((*state.db).clone());
    let model = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product_response(model)))
}

/// PUT /products/{id} - Replace a product's caller-supplied fields.
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = payload.into_input()?;

    let repo = ProductRepository::new((*state.db).clone());
    let model = repo
        .update(id, input)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product_response(model)))
}

/// DELETE /products/{id} - Remove a product.
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = ProductRepository::new((*state.db).clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound("Product not found".to_string()).into());
    }

    Ok(Json(json!({ "message": "Product deleted" })))
}
