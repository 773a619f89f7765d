use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Mounted at `/api/v1/reviews`.
pub fn review_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::all_reviews))
        .route("/create", post(handlers::create_review))
        .route("/hospital/{email}", get(handlers::hospital_reviews))
        .route("/clinic/{email}", get(handlers::clinic_reviews))
        .route("/entity/{entity_type}/{email}", get(handlers::entity_reviews));

    let protected_routes = Router::new()
        .route("/{id}", patch(handlers::update_review).delete(handlers::delete_review))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

/// Mounted at `/api/webreviews`.
pub fn web_review_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/create", post(handlers::create_web_review))
        .route("/all", get(handlers::latest_web_reviews));

    let protected_routes = Router::new()
        .route("/{id}", delete(handlers::delete_web_review))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
