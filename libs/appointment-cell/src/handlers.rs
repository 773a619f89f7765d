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

use crate::models::{
    CreateAppointmentRequest, DoctorAppointmentsQuery, OrganizationAppointmentsQuery, StatusUpdateRequest,
};
use crate::services::AppointmentService;

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_appointment(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = AppointmentService::new(&config);
    let appointment = service.create(request).await?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": appointment }))))
}

#[axum::debug_handler]
pub async fn doctor_appointments(
    State(config): State<Arc<AppConfig>>,
    QueryParams(query): QueryParams<DoctorAppointmentsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&config);
    let appointments = service.for_doctor(query).await?;

    Ok(Json(json!({
        "success": true,
        "count": appointments.len(),
        "data": appointments
    })))
}

#[axum::debug_handler]
pub async fn user_appointments(
    State(config): State<Arc<AppConfig>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&config);
    let appointments = service.for_user(&email).await?;

    Ok(Json(json!({
        "success": true,
        "count": appointments.len(),
        "data": appointments
    })))
}

#[axum::debug_handler]
pub async fn organization_appointments(
    State(config): State<Arc<AppConfig>>,
    QueryParams(query): QueryParams<OrganizationAppointmentsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&config);
    let appointments = service.for_organization(query).await?;

    Ok(Json(json!({ "success": true, "data": appointments })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&config);
    let appointment = service.get(&id).await?;

    Ok(Json(json!({ "success": true, "data": appointment })))
}

// ==============================================================================
// PROVIDER HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(config): State<Arc<AppConfig>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<StatusUpdateRequest>,
) -> Result<Json<Value>, AppError> {
    debug!("{} {} updating appointment {}", principal.role, principal.id, id);

    let service = AppointmentService::new(&config);
    let appointment = service.update_status(&id, request).await?;

    Ok(Json(json!({ "success": true, "data": appointment })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    debug!("{} {} deleting appointment {}", principal.role, principal.id, id);

    let service = AppointmentService::new(&config);
    service.delete(&id).await?;

    Ok(Json(json!({ "success": true, "data": {} })))
}
