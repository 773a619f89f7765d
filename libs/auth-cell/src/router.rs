use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Mounted at `/api/token/validate`.
pub fn token_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::validate_token).post(handlers::validate_token))
        .with_state(state)
}

/// Mounted at `/api/users`.
pub fn patient_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/register", post(handlers::patient_signup))
        .route("/login", post(handlers::patient_login))
        .with_state(state)
}

/// Mounted at `/api/consultant`.
pub fn consultant_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/login", post(handlers::consultant_login))
        .with_state(state)
}
