use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Mounted at `/api/health/v2`.
pub fn health_tracker_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/food/search", get(handlers::search_foods))
        .route("/food/nutrition", post(handlers::nutrition_info))
        .route("/food/upc", get(handlers::food_by_upc))
        .route("/exercise/calories", post(handlers::exercise_calories))
        .route("/calculate/dailycalories", post(handlers::daily_calories))
        .with_state(state)
}
