use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use health_tracker_cell::router::health_tracker_routes;
use shared_utils::test_utils::TestConfig;

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

// ==============================================================================
// NUTRITION PASSTHROUGH
// ==============================================================================

#[tokio::test]
async fn test_food_search_sends_credentials_and_defaults_lists() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/nutritionix/v2/search/instant"))
        .and(query_param("query", "apple"))
        .and(header("x-app-id", "test-app-id"))
        .and(header("x-app-key", "test-app-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "common": [{"food_name": "apple"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = health_tracker_routes(config.to_arc());
    let (status, body) = send(app, "GET", "/food/search?query=apple", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["common"], json!([{"food_name": "apple"}]));
    assert_eq!(body["branded"], json!([]));
    assert_eq!(body["message"], "Search results retrieved successfully");
}

#[tokio::test]
async fn test_food_search_requires_query() {
    let config = TestConfig::default();
    let app = health_tracker_routes(config.to_arc());

    let (status, body) = send(app, "GET", "/food/search", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Search query is required");
}

#[tokio::test]
async fn test_nutrition_upstream_failure_is_bad_gateway() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/nutritionix/v2/natural/nutrients"))
        .and(body_json(json!({"query": "1 cup rice"})))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "unauthorized"})))
        .mount(&mock_server)
        .await;

    let app = health_tracker_routes(config.to_arc());
    let (status, body) = send(app, "POST", "/food/nutrition", Some(json!({"query": "1 cup rice"}))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Failed to fetch nutrition information");
    assert_eq!(body["details"], r#"{"message":"unauthorized"}"#);
}

#[tokio::test]
async fn test_upc_returns_first_food() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/nutritionix/v2/search/item"))
        .and(query_param("upc", "049000000443"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "foods": [{"food_name": "cola"}, {"food_name": "other"}]
        })))
        .mount(&mock_server)
        .await;

    let app = health_tracker_routes(config.to_arc());
    let (status, body) = send(app, "GET", "/food/upc?upc=049000000443", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["food"], json!({"food_name": "cola"}));
    assert_eq!(body["message"], "Food item retrieved successfully");
}

#[tokio::test]
async fn test_exercise_forwards_only_given_fields() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/nutritionix/v2/natural/exercise"))
        .and(body_json(json!({"query": "ran 3 miles", "weight_kg": 70.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "exercises": [{"name": "running", "nf_calories": 300}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = health_tracker_routes(config.to_arc());
    let (status, body) = send(
        app,
        "POST",
        "/exercise/calories",
        Some(json!({"query": "ran 3 miles", "weight_kg": "70"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exercises"][0]["name"], "running");
}

// ==============================================================================
// DAILY CALORIES
// ==============================================================================

#[tokio::test]
async fn test_daily_calories() {
    let app = health_tracker_routes(TestConfig::default().to_arc());

    let (status, body) = send(
        app,
        "POST",
        "/calculate/dailycalories",
        Some(json!({
            "gender": "male",
            "age": 30,
            "height_cm": 180,
            "weight_kg": 80,
            "activity_level": "Moderate"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["daily_calories"], 2759);
    assert_eq!(body["data"]["bmr"], 1780);
    assert_eq!(body["data"]["activity_level"], "moderate");
    assert_eq!(body["data"]["macronutrient_goals"]["fats"], json!({"grams": 77, "calories": 690}));
    assert_eq!(
        body["data"]["weight_goals"],
        json!({"weight_loss": 2259, "weight_gain": 3259, "maintenance": 2759})
    );
}

#[tokio::test]
async fn test_daily_calories_collects_every_failure() {
    let app = health_tracker_routes(TestConfig::default().to_arc());

    let (status, body) = send(app, "POST", "/calculate/dailycalories", Some(json!({"age": 90}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["details"].as_array().unwrap().len(), 5);
    assert_eq!(body["details"][1], "Age must be between 15 and 80 years");
}

#[tokio::test]
async fn test_daily_calories_with_mistyped_age() {
    let app = health_tracker_routes(TestConfig::default().to_arc());

    let (status, body) = send(
        app,
        "POST",
        "/calculate/dailycalories",
        Some(json!({"gender": "male", "age": "thirty", "height_cm": 180, "weight_kg": 80})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("age"));
}
