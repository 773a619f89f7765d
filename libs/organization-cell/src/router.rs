use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Mounted at `/api/hospitals`.
pub fn hospital_account_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/register", post(handlers::register_hospital))
        .route("/login", post(handlers::login_hospital))
        .with_state(state)
}

/// Mounted at `/api/clinics` and `/api/user/clinics`.
pub fn clinic_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/register", post(handlers::register_clinic))
        .route("/login", post(handlers::login_clinic))
        .route("/all", get(handlers::list_clinics))
        .route("/nearest", get(handlers::nearest_clinics))
        .route("/{clinic_id}/doctors", get(handlers::clinic_doctors))
        .with_state(state)
}

/// Mounted at `/api/user/v2` and `/api/user/hospitals`.
pub fn hospital_directory_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/all", get(handlers::list_hospitals))
        .route("/nearest", get(handlers::nearest_hospitals))
        .route("/{id}", get(handlers::get_hospital))
        .with_state(state)
}
