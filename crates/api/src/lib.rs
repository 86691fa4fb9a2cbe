//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware (bearer and cookie strategies)
//! - Store-readiness gate
//! - Response error mapping

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use tooldesk_shared::{EmailService, JwtService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for session token operations.
    pub jwt_service: Arc<JwtService>,
    /// Email service for subscription notifications.
    pub email_service: Arc<EmailService>,
}

/// Creates the main application router.
///
/// `allowed_origins` drives CORS; credentials are allowed, so origins must
/// be explicit (never a wildcard).
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse().map_or_else(
                |_| {
                    warn!(origin = %origin, "Skipping unparseable CORS origin");
                    None
                },
                Some,
            )
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .merge(routes::health::routes())
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
