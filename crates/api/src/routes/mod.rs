//! API route definitions.

use axum::{Router, middleware};

use crate::{
    AppState,
    middleware::{admin_auth, require_store, user_auth},
};

pub mod admins;
pub mod auth;
pub mod entitlements;
pub mod expenses;
pub mod health;
pub mod products;
pub mod sales;
pub mod subscriptions;
pub mod user;

/// Creates the `/api` router: public auth routes plus the admin- and
/// user-protected groups, all behind the store-readiness gate.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let admin_protected = Router::new()
        .merge(admins::protected_routes())
        .merge(entitlements::routes())
        .merge(sales::routes())
        .merge(expenses::routes())
        .merge(products::routes())
        .merge(subscriptions::routes())
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth));

    let user_protected = Router::new()
        .merge(user::routes())
        .layer(middleware::from_fn_with_state(state.clone(), user_auth));

    Router::new()
        .merge(auth::routes())
        .merge(admins::public_routes())
        .merge(admin_protected)
        .merge(user_protected)
        .layer(middleware::from_fn_with_state(state, require_store))
        // Added after the readiness layer on purpose; see logout_routes.
        .merge(auth::logout_routes())
}
