//! Store-readiness gate.
//!
//! Runs before any route logic: when the document store is unreachable
//! the request is rejected with 503 immediately, so handlers never see a
//! dead connection.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::AppState;

/// Rejects requests while the database connection is not ready.
pub async fn require_store(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Err(e) = state.db.ping().await {
        error!(error = %e, "Database connection not ready");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": "STORE_UNAVAILABLE",
                "message": "Database connection not ready"
            })),
        )
            .into_response();
    }

    next.run(request).await
}
