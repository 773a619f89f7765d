use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use auth_cell::router::{consultant_routes, patient_routes, token_routes};
use dashboard_cell::router::{clinic_dashboard_routes, consultant_dashboard_routes, hospital_dashboard_routes};
use doctor_cell::router::{doctor_directory_routes, doctor_routes};
use health_tracker_cell::router::health_tracker_routes;
use organization_cell::router::{clinic_routes, hospital_account_routes, hospital_directory_routes};
use review_cell::router::{review_routes, web_review_routes};
use search_cell::router::{registry_routes, search_routes};
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Medico API is running" }))
        // Accounts
        .nest("/api/token/validate", token_routes(state.clone()))
        .nest("/api/users", patient_routes(state.clone()))
        .nest("/api/consultant", consultant_routes(state.clone()))
        // Organizations
        .nest("/api/hospitals", hospital_account_routes(state.clone()))
        .nest("/api/clinics", clinic_routes(state.clone()))
        .nest("/api/user/clinics", clinic_routes(state.clone()))
        .nest("/api/user/v2/doctors", doctor_directory_routes(state.clone()))
        .nest("/api/user/v2", hospital_directory_routes(state.clone()))
        .nest("/api/user/hospitals", hospital_directory_routes(state.clone()))
        // Doctors and bookings
        .nest("/api/doctors", doctor_routes(state.clone()))
        .nest("/api/appointments", appointment_routes(state.clone()))
        // Reviews
        .nest("/api/v1/reviews", review_routes(state.clone()))
        .nest("/api/webreviews", web_review_routes(state.clone()))
        // Search
        .nest("/api/search", search_routes(state.clone()))
        .nest("/api/v2/hospitals", registry_routes(state.clone()))
        // Dashboards
        .nest("/api/v2/doctors", hospital_dashboard_routes(state.clone()))
        .nest("/api/clinic", clinic_dashboard_routes(state.clone()))
        .nest("/api/v1/consultant", consultant_dashboard_routes(state.clone()))
        // Health tracker
        .nest("/api/health/v2", health_tracker_routes(state))
}
