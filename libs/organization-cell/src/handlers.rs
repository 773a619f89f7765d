use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::extractor::session_cookie;
use shared_utils::payload::{JsonBody, QueryParams};

use crate::models::{LoginRequest, NearestQuery, OrganizationKind, RegistrationRequest};
use crate::services::{OrganizationAccountService, OrganizationDirectoryService};

// ==============================================================================
// ACCOUNTS
// ==============================================================================

async fn register(
    config: &AppConfig,
    kind: OrganizationKind,
    request: RegistrationRequest,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = OrganizationAccountService::new(config, kind);
    let registration = service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("{} registered successfully", kind.label()),
            "token": registration.token,
            kind.response_key(): registration.organization
        })),
    ))
}

async fn login(
    config: &AppConfig,
    kind: OrganizationKind,
    jar: CookieJar,
    request: LoginRequest,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let service = OrganizationAccountService::new(config, kind);
    let session = service.login(request).await?;

    let jar = jar.add(session_cookie(session.token.clone(), config.production));

    Ok((
        jar,
        Json(json!({
            "success": true,
            "message": "Login successful",
            "token": session.token,
            kind.response_key(): session.profile
        })),
    ))
}

#[axum::debug_handler]
pub async fn register_hospital(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<RegistrationRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    register(&config, OrganizationKind::Hospital, request).await
}

#[axum::debug_handler]
pub async fn login_hospital(
    State(config): State<Arc<AppConfig>>,
    jar: CookieJar,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    login(&config, OrganizationKind::Hospital, jar, request).await
}

#[axum::debug_handler]
pub async fn register_clinic(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<RegistrationRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    register(&config, OrganizationKind::Clinic, request).await
}

#[axum::debug_handler]
pub async fn login_clinic(
    State(config): State<Arc<AppConfig>>,
    jar: CookieJar,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    login(&config, OrganizationKind::Clinic, jar, request).await
}

// ==============================================================================
// CLINIC DIRECTORY
// ==============================================================================

#[axum::debug_handler]
pub async fn list_clinics(State(config): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = OrganizationDirectoryService::new(&config);
    let clinics = service.list(OrganizationKind::Clinic).await?;

    Ok(Json(json!({ "success": true, "data": clinics })))
}

#[axum::debug_handler]
pub async fn nearest_clinics(
    State(config): State<Arc<AppConfig>>,
    QueryParams(query): QueryParams<NearestQuery>,
) -> Result<Json<Value>, AppError> {
    let service = OrganizationDirectoryService::new(&config);
    let clinics = service.nearest_clinics(query).await?;

    Ok(Json(json!({ "success": true, "data": clinics })))
}

#[axum::debug_handler]
pub async fn clinic_doctors(
    State(config): State<Arc<AppConfig>>,
    Path(clinic_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = OrganizationDirectoryService::new(&config);
    let doctors = service.clinic_doctors(&clinic_id).await?;

    Ok(Json(json!({ "success": true, "doctors": doctors })))
}

// ==============================================================================
// HOSPITAL DIRECTORY
// ==============================================================================

#[axum::debug_handler]
pub async fn list_hospitals(State(config): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = OrganizationDirectoryService::new(&config);
    let hospitals = service.list(OrganizationKind::Hospital).await?;

    Ok(Json(json!({ "success": true, "data": hospitals })))
}

#[axum::debug_handler]
pub async fn nearest_hospitals(
    State(config): State<Arc<AppConfig>>,
    QueryParams(query): QueryParams<NearestQuery>,
) -> Result<Json<Value>, AppError> {
    let service = OrganizationDirectoryService::new(&config);
    let hospitals = service.nearest_hospitals(query).await?;

    Ok(Json(json!({ "success": true, "data": hospitals })))
}

#[axum::debug_handler]
pub async fn get_hospital(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = OrganizationDirectoryService::new(&config);
    let hospital = service.get(OrganizationKind::Hospital, &id).await?;

    Ok(Json(json!({ "success": true, "data": hospital })))
}
