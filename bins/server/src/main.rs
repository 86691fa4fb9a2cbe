//! Tooldesk API Server
//!
//! Main entry point for the Tooldesk backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tooldesk_api::{AppState, create_router};
use tooldesk_db::connect;
use tooldesk_shared::{AppConfig, EmailService, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tooldesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url, config.database.max_connections).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.session_expiry_days);

    // Create email service
    let email_service = EmailService::new(config.email.clone());
    if email_service.is_enabled() {
        info!(
            smtp_host = %config.email.smtp_host,
            smtp_port = %config.email.smtp_port,
            "Email service configured"
        );
    } else {
        info!("Email service disabled");
    }

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        email_service: Arc::new(email_service),
    };

    // Create router
    let app = create_router(state, &config.cors.allowed_origins);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
