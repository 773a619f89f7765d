use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::organization_middleware;

use crate::handlers;

/// Mounted at `/api/doctors`.
pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/organization/{organization_id}", get(handlers::organization_doctors));

    // Hospital or clinic accounts only
    let organization_routes = Router::new()
        .route("/add", post(handlers::add_doctor))
        .route("/delete/{id}", delete(handlers::delete_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), organization_middleware));

    Router::new()
        .merge(public_routes)
        .merge(organization_routes)
        .with_state(state)
}

/// Mounted at `/api/user/v2/doctors`.
pub fn doctor_directory_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/all", get(handlers::all_doctors))
        .route("/filter", get(handlers::filter_doctors))
        .route("/nearest", get(handlers::nearest_doctors))
        .route("/{id}", get(handlers::get_doctor))
        .with_state(state)
}
