use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::provider_middleware;

use crate::handlers;

/// Mounted at `/api/appointments`.
pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/create", post(handlers::create_appointment))
        .route("/doctor", get(handlers::doctor_appointments))
        .route("/user/{email}", get(handlers::user_appointments))
        .route("/all", get(handlers::organization_appointments))
        .route("/{id}", get(handlers::get_appointment));

    // Hospitals, clinics and doctors
    let provider_routes = Router::new()
        .route("/{id}/status", patch(handlers::update_appointment_status))
        .route("/{id}", delete(handlers::delete_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), provider_middleware));

    Router::new()
        .merge(public_routes)
        .merge(provider_routes)
        .with_state(state)
}
