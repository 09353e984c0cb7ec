use crate::core::middleware::admin_session_middleware;
use crate::features::auth::handlers;
use crate::features::auth::services::AuthGateway;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Public auth routes (no session required)
pub fn public_routes(gateway: Arc<AuthGateway>) -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/session", get(handlers::get_session))
        .with_state(gateway)
}

/// Routes that require an admin session
pub fn protected_routes(gateway: Arc<AuthGateway>) -> Router {
    Router::new()
        .route("/api/auth/me", get(handlers::get_me))
        .route_layer(middleware::from_fn_with_state(
            gateway.clone(),
            admin_session_middleware,
        ))
        .with_state(gateway)
}
