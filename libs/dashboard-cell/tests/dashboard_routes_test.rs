use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dashboard_cell::router::{clinic_dashboard_routes, consultant_dashboard_routes, hospital_dashboard_routes};
use shared_utils::test_utils::{MockStoreResponses, TestConfig};

const STATS_COLUMNS: &str = "id,status,fees,appointmentDate,createdAt";
const ACTIVITY_COLUMNS: &str = "id,firstName,lastName,status,createdAt";

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

fn appointments() -> Vec<Value> {
    let now = Utc::now().to_rfc3339();
    vec![
        MockStoreResponses::appointment_row("a1", "Completed", "2024-01-02T10:00:00Z", "2024-01-01T00:00:00Z"),
        MockStoreResponses::appointment_row("a2", "Completed", "2024-01-03T10:00:00Z", "2024-01-01T00:00:00Z"),
        MockStoreResponses::appointment_row("a3", "Pending", &now, &now),
        MockStoreResponses::appointment_row("a4", "Confirmed", "2024-01-04T10:00:00Z", "2024-01-01T00:00:00Z"),
    ]
}

async fn mount_appointments(mock_server: &MockServer, scope: (&str, &str), rows: Vec<Value>, recent: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param(scope.0, scope.1))
        .and(query_param("select", STATS_COLUMNS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(rows)))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param(scope.0, scope.1))
        .and(query_param("select", ACTIVITY_COLUMNS))
        .and(query_param("order", "createdAt.desc"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(recent)))
        .mount(mock_server)
        .await;
}

fn weekly_total(body: &Value, key: &str) -> u64 {
    body["weeklyStats"]
        .as_array()
        .unwrap()
        .iter()
        .map(|day| day[key].as_u64().unwrap())
        .sum()
}

#[tokio::test]
async fn test_hospital_doctor_count_reads_content_range() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("organizationEmail", "eq.city@hospital.org"))
        .and(header("prefer", "count=exact"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-range", "0-0/3")
                .set_body_json(json!([{"id": "d1"}])),
        )
        .mount(&mock_server)
        .await;

    let app = hospital_dashboard_routes(config.to_arc());
    let (status, body) = get(app, "/count/City@Hospital.org").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "count": 3}));
}

#[tokio::test]
async fn test_hospital_stats() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    let rows = appointments();
    mount_appointments(
        &mock_server,
        ("organizationEmail", "eq.city@hospital.org"),
        rows.clone(),
        vec![rows[2].clone()],
    )
    .await;

    let app = hospital_dashboard_routes(config.to_arc());
    let (status, body) = get(app, "/stats/city@hospital.org").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["pendingCount"], 1);
    assert_eq!(body["completedCount"], 2);
    assert_eq!(body["completedRevenue"], 1600.0);
    assert_eq!(weekly_total(&body, "appointments"), 1);
    assert_eq!(
        body["statusStats"],
        json!([
            {"name": "Completed", "value": 2, "color": "#34D399"},
            {"name": "Confirmed", "value": 1, "color": "#60A5FA"},
            {"name": "Pending", "value": 1, "color": "#FCD34D"}
        ])
    );
    assert_eq!(body["recentActivities"][0]["title"], "Appointment for Asha Rao");
    assert_eq!(body["recentActivities"][0]["description"], "Status: Pending");
}

#[tokio::test]
async fn test_clinic_stats_use_clinic_palette() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    mount_appointments(&mock_server, ("organizationEmail", "eq.care@clinic.org"), appointments(), vec![]).await;

    let app = clinic_dashboard_routes(config.to_arc());
    let (status, body) = get(app, "/stats/care@clinic.org").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statusStats"][1], json!({"name": "Confirmed", "value": 1, "color": "#9CA3AF"}));
    assert_eq!(body["recentActivities"], json!([]));
}

#[tokio::test]
async fn test_consultant_dashboard() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    mount_appointments(&mock_server, ("doctorEmail", "eq.meera@hospital.org"), appointments(), vec![]).await;

    let app = consultant_dashboard_routes(config.to_arc());
    let (status, body) = get(app, "/dashboard/Meera@Hospital.org/city@hospital.org").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["completedCount"], 2);
    assert_eq!(body["acceptedCount"], 1);
    assert_eq!(body["pendingCount"], 1);
    assert_eq!(body["totalEarnings"], 1600.0);
    assert_eq!(weekly_total(&body, "consultations"), 1);
}

#[tokio::test]
async fn test_store_failure_is_reported() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_json(MockStoreResponses::error_response("boom", "XX000")))
        .mount(&mock_server)
        .await;

    let app = hospital_dashboard_routes(config.to_arc());
    let (status, _) = get(app, "/stats/city@hospital.org").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
