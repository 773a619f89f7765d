use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::extractor::authenticate;
use shared_utils::payload::JsonBody;

use crate::models::{ConsultantLoginRequest, LoginRequest, PatientSignupRequest};
use crate::services::{ConsultantAuthService, PatientAuthService};

// ==============================================================================
// SESSION
// ==============================================================================

#[axum::debug_handler]
pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating session token");

    let principal = authenticate(&config, &headers).await?;

    Ok(Json(TokenResponse {
        success: true,
        message: "Token is valid".to_string(),
        role: principal.role,
        user: principal.account,
    }))
}

// ==============================================================================
// PATIENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn patient_signup(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<PatientSignupRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = PatientAuthService::new(&config);
    let session = service.signup(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "token": session.token,
            "user": session.account
        })),
    ))
}

#[axum::debug_handler]
pub async fn patient_login(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PatientAuthService::new(&config);
    let session = service.login(request).await?;

    Ok(Json(json!({
        "status": "success",
        "token": session.token,
        "user": session.account
    })))
}

// ==============================================================================
// CONSULTANTS
// ==============================================================================

#[axum::debug_handler]
pub async fn consultant_login(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<ConsultantLoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ConsultantAuthService::new(&config);
    let session = service.login(request).await?;

    Ok(Json(json!({
        "success": true,
        "token": session.token,
        "data": { "user": session.account }
    })))
}
