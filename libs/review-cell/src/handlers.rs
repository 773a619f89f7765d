use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::Principal;
use shared_models::error::AppError;
use shared_utils::payload::JsonBody;

use crate::models::{CreateReviewRequest, CreateWebReviewRequest, ReviewSubject, UpdateReviewRequest};
use crate::services::{ReviewService, WebReviewService};

// ==============================================================================
// ENTITY REVIEW HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_review(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = ReviewService::new(&config);
    let review = service.create(request).await?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": review }))))
}

#[axum::debug_handler]
pub async fn hospital_reviews(
    State(config): State<Arc<AppConfig>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    subject_reviews(&config, ReviewSubject::Hospital, &email).await
}

#[axum::debug_handler]
pub async fn clinic_reviews(
    State(config): State<Arc<AppConfig>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    subject_reviews(&config, ReviewSubject::Clinic, &email).await
}

async fn subject_reviews(config: &AppConfig, subject: ReviewSubject, email: &str) -> Result<Json<Value>, AppError> {
    let service = ReviewService::new(config);
    let reviews = service.for_subject(subject, email).await?;

    Ok(Json(json!({ "success": true, "data": reviews })))
}

#[axum::debug_handler]
pub async fn all_reviews(State(config): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = ReviewService::new(&config);
    let reviews = service.all().await?;

    Ok(Json(json!({
        "success": true,
        "count": reviews.len(),
        "data": reviews
    })))
}

#[axum::debug_handler]
pub async fn entity_reviews(
    State(config): State<Arc<AppConfig>>,
    Path((entity_type, email)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let subject: ReviewSubject = entity_type.parse()?;
    let service = ReviewService::new(&config);
    let reviews = service.for_entity(subject, &email).await?;

    Ok(Json(json!({
        "success": true,
        "count": reviews.len(),
        "data": reviews
    })))
}

#[axum::debug_handler]
pub async fn update_review(
    State(config): State<Arc<AppConfig>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateReviewRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("{} {} is editing review {}", principal.role, principal.id, id);

    let service = ReviewService::new(&config);
    let review = service.update(&id, request).await?;

    Ok(Json(json!({ "success": true, "data": review })))
}

#[axum::debug_handler]
pub async fn delete_review(
    State(config): State<Arc<AppConfig>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    debug!("{} {} is deleting review {}", principal.role, principal.id, id);

    let service = ReviewService::new(&config);
    service.delete(&id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Review deleted successfully"
    })))
}

// ==============================================================================
// WEBSITE REVIEW HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_web_review(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<CreateWebReviewRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = WebReviewService::new(&config);
    let review = service.create(request).await?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": review }))))
}

#[axum::debug_handler]
pub async fn latest_web_reviews(State(config): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = WebReviewService::new(&config);
    let reviews = service.latest().await?;

    Ok(Json(json!({
        "success": true,
        "count": reviews.len(),
        "data": reviews
    })))
}

#[axum::debug_handler]
pub async fn delete_web_review(
    State(config): State<Arc<AppConfig>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    debug!("{} {} is deleting web review {}", principal.role, principal.id, id);

    let service = WebReviewService::new(&config);
    service.delete(&id).await?;

    Ok(Json(json!({ "success": true, "data": {} })))
}
