use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::OrganizationDashboard;
use crate::services::DashboardService;

#[axum::debug_handler]
pub async fn doctors_count(
    State(config): State<Arc<AppConfig>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = DashboardService::new(&config);
    let count = service.doctors_count(&email).await?;

    Ok(Json(json!({ "success": true, "count": count })))
}

#[axum::debug_handler]
pub async fn hospital_stats(
    State(config): State<Arc<AppConfig>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    organization_stats(&config, OrganizationDashboard::Hospital, &email).await
}

#[axum::debug_handler]
pub async fn clinic_stats(
    State(config): State<Arc<AppConfig>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    organization_stats(&config, OrganizationDashboard::Clinic, &email).await
}

async fn organization_stats(
    config: &AppConfig,
    dashboard: OrganizationDashboard,
    email: &str,
) -> Result<Json<Value>, AppError> {
    let service = DashboardService::new(config);
    let stats = service.organization_stats(dashboard, email).await?;

    Ok(Json(with_success(json!(stats))))
}

#[axum::debug_handler]
pub async fn consultant_dashboard(
    State(config): State<Arc<AppConfig>>,
    Path((email, organization_email)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let service = DashboardService::new(&config);
    let dashboard = service.consultant(&email, &organization_email).await?;

    Ok(Json(with_success(json!(dashboard))))
}

/// Flattens the figures into the body next to `success: true`.
fn with_success(mut body: Value) -> Value {
    if let Some(fields) = body.as_object_mut() {
        fields.insert("success".to_string(), Value::Bool(true));
    }
    body
}
