use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Mounted at `/api/search`.
pub fn search_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::search))
        .route("/specialty", get(handlers::search_specialty))
        .route("/doctors", get(handlers::search_doctors))
        .route("/hospitals", get(handlers::search_hospitals))
        .route("/clinics", get(handlers::search_clinics))
        .route("/doctors/nearby", post(handlers::nearby_doctors))
        .route("/hospitals/nearby", post(handlers::nearby_hospitals))
        .route("/clinics/nearby", post(handlers::nearby_clinics))
        .route("/v1/hospital/nearby", get(handlers::registry_sample))
        .with_state(state)
}

/// Mounted at `/api/v2/hospitals`.
pub fn registry_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/search", get(handlers::registry_search))
        .route("/details/{id}", get(handlers::registry_details))
        .route("/nearby", get(handlers::registry_nearby))
        .with_state(state)
}
