use std::sync::Arc;

use axum::{
    extract::State,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::payload::{JsonBody, QueryParams};
use shared_utils::validation::is_blank;

use crate::calories;
use crate::models::{DailyCaloriesRequest, ExerciseRequest, FoodSearchQuery, HealthError, NutritionRequest, UpcQuery};
use crate::services::nutritionix::list;
use crate::services::NutritionixClient;

fn required(value: Option<&str>, message: &'static str) -> Result<String, HealthError> {
    if is_blank(value) {
        return Err(HealthError::MissingInput(message));
    }
    Ok(value.unwrap_or_default().to_string())
}

#[axum::debug_handler]
pub async fn search_foods(
    State(config): State<Arc<AppConfig>>,
    QueryParams(params): QueryParams<FoodSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let query = required(params.query.as_deref(), "Search query is required")?;

    let body = NutritionixClient::new(&config)
        .search_instant(&query)
        .await
        .map_err(HealthError::upstream("Failed to fetch food suggestions"))?;

    Ok(Json(json!({
        "common": list(&body, "common"),
        "branded": list(&body, "branded"),
        "message": "Search results retrieved successfully"
    })))
}

#[axum::debug_handler]
pub async fn nutrition_info(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<NutritionRequest>,
) -> Result<Json<Value>, AppError> {
    let query = required(request.query.as_deref(), "Food query is required")?;

    let body = NutritionixClient::new(&config)
        .natural_nutrients(&query)
        .await
        .map_err(HealthError::upstream("Failed to fetch nutrition information"))?;

    Ok(Json(json!({
        "foods": list(&body, "foods"),
        "message": "Nutrition information retrieved successfully"
    })))
}

#[axum::debug_handler]
pub async fn food_by_upc(
    State(config): State<Arc<AppConfig>>,
    QueryParams(params): QueryParams<UpcQuery>,
) -> Result<Json<Value>, AppError> {
    let upc = required(params.upc.as_deref(), "UPC code is required")?;

    let body = NutritionixClient::new(&config)
        .item_by_upc(&upc)
        .await
        .map_err(HealthError::upstream("Failed to fetch food item"))?;

    let food = list(&body, "foods")
        .into_iter()
        .next()
        .ok_or(HealthError::FoodNotFound)?;

    Ok(Json(json!({
        "food": food,
        "message": "Food item retrieved successfully"
    })))
}

#[axum::debug_handler]
pub async fn exercise_calories(
    State(config): State<Arc<AppConfig>>,
    JsonBody(request): JsonBody<ExerciseRequest>,
) -> Result<Json<Value>, AppError> {
    required(request.query.as_deref(), "Exercise description is required")?;

    let body = NutritionixClient::new(&config)
        .natural_exercise(&request)
        .await
        .map_err(HealthError::upstream("Failed to calculate exercise calories"))?;

    Ok(Json(json!({
        "exercises": list(&body, "exercises"),
        "message": "Exercise calories calculated successfully"
    })))
}

#[axum::debug_handler]
pub async fn daily_calories(JsonBody(request): JsonBody<DailyCaloriesRequest>) -> Result<Json<Value>, AppError> {
    let profile = calories::validate(&request)?;
    let plan = calories::plan(&profile);

    Ok(Json(json!({
        "success": true,
        "data": plan,
        "message": "Daily calorie needs calculated successfully"
    })))
}
