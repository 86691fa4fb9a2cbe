//! Request middleware: authentication and store readiness.

pub mod auth;
pub mod readiness;

pub use auth::{AuthPrincipal, admin_auth, user_auth};
pub use readiness::require_store;
