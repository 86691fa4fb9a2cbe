//! Response mapping for application errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use tooldesk_core::ledger::LedgerError;
use tooldesk_shared::AppError;

/// Wrapper turning an `AppError` into an HTTP response.
///
/// Bodies follow the `{error, message}` shape used everywhere in this API;
/// validation failures additionally carry an `errors` list with one entry
/// per failed field. Store failures are logged and surfaced verbatim;
/// nothing here retries.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(messages) => Self(AppError::Validation(messages)),
            LedgerError::InvalidMonth { year, month } => Self(AppError::validation(format!(
                "month must be 1-12, got {year}-{month}"
            ))),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        let body = match &self.0 {
            AppError::Validation(messages) => json!({
                "error": self.0.error_code(),
                "message": "Validation error",
                "errors": messages,
            }),
            other => json!({
                "error": other.error_code(),
                "message": other.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError(AppError::NotFound("Sale not found".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let err = ApiError(AppError::Validation(vec!["x".to_string()]));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = ApiError(AppError::StoreUnavailable("not ready".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_ledger_error_becomes_validation() {
        let err: ApiError = LedgerError::validation("day is required").into();
        assert!(matches!(err.0, AppError::Validation(ref m) if m.len() == 1));
    }
}
