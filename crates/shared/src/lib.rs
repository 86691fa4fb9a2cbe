//! Shared types, errors, and configuration for Tooldesk.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - JWT session issuance and validation
//! - Auth request/response payloads
//! - Email notification service

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;

pub use auth::{Claims, Role};
pub use config::AppConfig;
pub use email::{EmailError, EmailService};
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
