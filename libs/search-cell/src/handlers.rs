use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::payload::{JsonBody, QueryParams};

use crate::models::{
    NearbyRequest, RegistryField, RegistryRadiusQuery, RegistrySampleQuery, RegistrySearchQuery, SearchError,
    SearchQuery,
};
use crate::services::{NearbyService, NearbyTable, RegistryClient, SearchService};

fn results(rows: Vec<Value>) -> Json<Value> {
    let count = rows.len();
    Json(json!({
        "success": true,
        "results": rows,
        "count": count
    }))
}

// ==============================================================================
// DIRECTORY SEARCH HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn search(
    State(config): State<Arc<AppConfig>>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let service = SearchService::new(&config);
    Ok(results(service.unified(query).await?))
}

#[axum::debug_handler]
pub async fn search_specialty(
    State(config): State<Arc<AppConfig>>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let service = SearchService::new(&config);
    Ok(results(service.specialty(query).await?))
}

#[axum::debug_handler]
pub async fn search_doctors(
    State(config): State<Arc<AppConfig>>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let service = SearchService::new(&config);
    Ok(results(service.doctors(query).await?))
}

#[axum::debug_handler]
pub async fn search_hospitals(
    State(config): State<Arc<AppConfig>>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let service = SearchService::new(&config);
    Ok(results(service.hospitals(query).await?))
}

#[axum::debug_handler]
pub async fn search_clinics(
    State(config): State<Arc<AppConfig>>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let service = SearchService::new(&config);
    Ok(results(service.clinics(query).await?))
}

// ==============================================================================
// PROXIMITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn nearby_doctors(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<NearbyRequest>,
) -> Result<Json<Value>, AppError> {
    nearby(&config, NearbyTable::Doctors, request).await
}

#[axum::debug_handler]
pub async fn nearby_hospitals(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<NearbyRequest>,
) -> Result<Json<Value>, AppError> {
    nearby(&config, NearbyTable::Hospitals, request).await
}

#[axum::debug_handler]
pub async fn nearby_clinics(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<NearbyRequest>,
) -> Result<Json<Value>, AppError> {
    nearby(&config, NearbyTable::Clinics, request).await
}

async fn nearby(config: &AppConfig, table: NearbyTable, request: NearbyRequest) -> Result<Json<Value>, AppError> {
    let service = NearbyService::new(config);
    Ok(results(service.around(table, request).await?))
}

#[axum::debug_handler]
pub async fn registry_sample(
    State(config): State<Arc<AppConfig>>,
    QueryParams(query): QueryParams<RegistrySampleQuery>,
) -> Result<Json<Value>, AppError> {
    let service = NearbyService::new(&config);
    let hospitals = service.registry_sample(query).await?;

    Ok(Json(json!({ "success": true, "results": hospitals })))
}

// ==============================================================================
// REGISTRY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn registry_search(
    State(config): State<Arc<AppConfig>>,
    QueryParams(query): QueryParams<RegistrySearchQuery>,
) -> Result<Json<Value>, AppError> {
    let field = RegistryField::parse(query.kind.as_deref()).ok_or(SearchError::InvalidType)?;
    let text = query
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(SearchError::QueryRequired)?;

    let client = RegistryClient::new(&config);
    let hospitals = client.search(field, text).await.map_err(SearchError::from)?;

    Ok(Json(Value::Array(hospitals)))
}

#[axum::debug_handler]
pub async fn registry_details(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let client = RegistryClient::new(&config);
    let hospital = client
        .details(&id)
        .await
        .map_err(SearchError::from)?
        .ok_or(SearchError::HospitalNotFound)?;

    Ok(Json(hospital))
}

#[axum::debug_handler]
pub async fn registry_nearby(
    State(config): State<Arc<AppConfig>>,
    QueryParams(query): QueryParams<RegistryRadiusQuery>,
) -> Result<Json<Value>, AppError> {
    let service = NearbyService::new(&config);
    let hospitals = service.registry_radius(query).await?;

    Ok(Json(Value::Array(hospitals)))
}
