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
use shared_utils::payload::{JsonBody, QueryParams};

use crate::models::{AddDoctorRequest, DoctorFilterQuery, NearestDoctorsQuery};
use crate::services::{DoctorDirectoryService, DoctorRosterService};

// ==============================================================================
// ORGANIZATION HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn add_doctor(
    State(config): State<Arc<AppConfig>>,
    Extension(principal): Extension<Principal>,
    JsonBody(request): JsonBody<AddDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    debug!("{} {} is adding a doctor", principal.role, principal.id);

    let service = DoctorRosterService::new(&config);
    let doctor = service.add(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Doctor added successfully",
            "doctor": doctor
        })),
    ))
}

#[axum::debug_handler]
pub async fn organization_doctors(
    State(config): State<Arc<AppConfig>>,
    Path(organization_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorRosterService::new(&config);
    let doctors = service.for_organization(&organization_id).await?;

    Ok(Json(json!({ "success": true, "doctors": doctors })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(config): State<Arc<AppConfig>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    debug!("{} {} is deleting doctor {}", principal.role, principal.id, id);

    let service = DoctorRosterService::new(&config);
    service.delete(&id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor and associated image deleted successfully"
    })))
}

// ==============================================================================
// PUBLIC DIRECTORY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn all_doctors(State(config): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = DoctorDirectoryService::new(&config);
    let doctors = service.all().await?;

    Ok(Json(json!({ "success": true, "data": doctors })))
}

#[axum::debug_handler]
pub async fn filter_doctors(
    State(config): State<Arc<AppConfig>>,
    QueryParams(filter): QueryParams<DoctorFilterQuery>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorDirectoryService::new(&config);
    let doctors = service.filter(filter).await?;

    Ok(Json(json!({ "success": true, "data": doctors })))
}

#[axum::debug_handler]
pub async fn nearest_doctors(
    State(config): State<Arc<AppConfig>>,
    QueryParams(query): QueryParams<NearestDoctorsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorDirectoryService::new(&config);
    let doctors = service.nearest(query).await?;

    Ok(Json(json!({ "success": true, "data": doctors })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorDirectoryService::new(&config);
    let doctor = service.get(&id).await?;

    Ok(Json(json!({ "success": true, "data": doctor })))
}
