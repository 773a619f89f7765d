use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

/// Mounted at `/api/v2/doctors`.
pub fn hospital_dashboard_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/count/{email}", get(handlers::doctors_count))
        .route("/stats/{email}", get(handlers::hospital_stats))
        .with_state(state)
}

/// Mounted at `/api/clinic`.
pub fn clinic_dashboard_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/doctors/count/{email}", get(handlers::doctors_count))
        .route("/stats/{email}", get(handlers::clinic_stats))
        .with_state(state)
}

/// Mounted at `/api/v1/consultant`.
pub fn consultant_dashboard_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/dashboard/{email}/{organization_email}", get(handlers::consultant_dashboard))
        .with_state(state)
}
