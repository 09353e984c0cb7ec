use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use crate::core::middleware::admin_session_middleware;
use crate::features::auth::AuthGateway;
use crate::features::distributors::handlers;
use crate::features::distributors::services::DistributorService;

/// Public directory routes (no authentication required)
pub fn public_routes(service: Arc<DistributorService>) -> Router {
    Router::new()
        .route("/api/distributors", get(handlers::list_distributors))
        .route("/api/distributors/suggestions", get(handlers::get_suggestions))
        .route("/api/distributors/map", get(handlers::get_map))
        .with_state(service)
}

/// Distributor management, gated on an admin session
pub fn admin_routes(service: Arc<DistributorService>, gateway: Arc<AuthGateway>) -> Router {
    Router::new()
        .route(
            "/api/admin/distributors",
            get(handlers::list_all_distributors).post(handlers::create_distributor),
        )
        .route(
            "/api/admin/distributors/{id}",
            put(handlers::update_distributor).delete(handlers::delete_distributor),
        )
        .route_layer(middleware::from_fn_with_state(
            gateway,
            admin_session_middleware,
        ))
        .with_state(service)
}
