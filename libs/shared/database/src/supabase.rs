use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::DatabaseError;
use crate::query::Query;

const RETURN_REPRESENTATION: &str = "return=representation";
const COUNT_EXACT: &str = "count=exact";

/// Thin PostgREST client. Every request authenticates with the service key;
/// end-user tokens are verified by the API layer and never forwarded.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.supabase_api_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap, DatabaseError> {
        let mut headers = HeaderMap::new();

        let key = HeaderValue::from_str(&self.api_key).map_err(|e| DatabaseError::Api {
            status: reqwest::StatusCode::UNAUTHORIZED,
            message: format!("Invalid API key header: {}", e),
        })?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(|e| {
            DatabaseError::Api {
                status: reqwest::StatusCode::UNAUTHORIZED,
                message: format!("Invalid authorization header: {}", e),
            }
        })?;

        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, DatabaseError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, HeaderMap::new()).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: HeaderMap,
    ) -> Result<T, DatabaseError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        headers.extend(extra_headers);

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("Store API error ({}): {}", status, text);
            return Err(DatabaseError::Api { status, message: text });
        }

        // 204 responses carry no body.
        let payload = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(payload)?)
    }

    pub async fn select<T>(&self, query: &Query) -> Result<Vec<T>, DatabaseError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, &query.to_path(), None).await
    }

    pub async fn select_one<T>(&self, query: Query) -> Result<Option<T>, DatabaseError>
    where
        T: DeserializeOwned,
    {
        let rows: Vec<T> = self.select(&query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Inserts one row and returns it as stored.
    pub async fn insert(&self, table: &str, row: Value) -> Result<Value, DatabaseError> {
        let path = Query::table(table).to_path();
        let rows: Vec<Value> = self
            .request_with_headers(Method::POST, &path, Some(row), representation())
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| DatabaseError::EmptyResult(table.to_string()))
    }

    /// Applies `changes` to every row matched by `query`, returning the updated rows.
    pub async fn update(&self, query: &Query, changes: Value) -> Result<Vec<Value>, DatabaseError> {
        self.request_with_headers(Method::PATCH, &query.to_path(), Some(changes), representation())
            .await
    }

    /// Deletes every row matched by `query`, returning the removed rows.
    pub async fn delete(&self, query: &Query) -> Result<Vec<Value>, DatabaseError> {
        self.request_with_headers(Method::DELETE, &query.to_path(), None, representation())
            .await
    }

    /// Exact number of rows matched by `query`, read from `Content-Range`.
    pub async fn count(&self, query: &Query) -> Result<u64, DatabaseError> {
        let url = format!("{}{}", self.base_url, query.clone().select("id").limit(1).to_path());
        debug!("Counting rows at {}", url);

        let mut headers = self.get_headers()?;
        headers.insert(
            HeaderName::from_static("prefer"),
            HeaderValue::from_static(COUNT_EXACT),
        );

        let response = self.client.get(&url).headers(headers).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            error!("Store API error ({}): {}", status, text);
            return Err(DatabaseError::Api { status, message: text });
        }

        let range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        parse_content_range_total(&range).ok_or_else(|| DatabaseError::Api {
            status,
            message: format!("Missing row count in Content-Range: {:?}", range),
        })
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

fn representation() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("prefer"),
        HeaderValue::from_static(RETURN_REPRESENTATION),
    );
    headers
}

/// `0-9/42` and `*/0` both yield the total after the slash.
fn parse_content_range_total(range: &str) -> Option<u64> {
    range.rsplit_once('/')?.1.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: &str) -> AppConfig {
        AppConfig {
            supabase_url: url.to_string(),
            supabase_api_key: "service-key".to_string(),
            jwt_secret: "secret".to_string(),
            cloudinary_cloud_name: String::new(),
            cloudinary_api_key: String::new(),
            cloudinary_api_secret: String::new(),
            cloudinary_base_url: String::new(),
            hospital_registry_url: String::new(),
            hospital_api_key: String::new(),
            nutritionix_base_url: String::new(),
            nutritionix_app_id: String::new(),
            nutritionix_api_key: String::new(),
            port: 8000,
            cors_origins: vec![],
            production: false,
        }
    }

    #[tokio::test]
    async fn test_select_sends_service_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/doctors"))
            .and(query_param("status", "eq.active"))
            .and(header("apikey", "service-key"))
            .and(header("authorization", "Bearer service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "d1"}])))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&config(&server.uri()));
        let rows: Vec<Value> = client
            .select(&Query::table("doctors").eq("status", "active"))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "d1");
    }

    #[tokio::test]
    async fn test_insert_returns_stored_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/web_reviews"))
            .and(header("prefer", "return=representation"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{"id": "w1", "rating": 5}])))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&config(&server.uri()));
        let row = client.insert("web_reviews", json!({"rating": 5})).await.unwrap();
        assert_eq!(row["id"], "w1");
    }

    #[tokio::test]
    async fn test_api_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&config(&server.uri()));
        let result: Result<Vec<Value>, _> = client.select(&Query::table("users")).await;

        match result {
            Err(DatabaseError::Api { status, message }) => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("0-0/42"), Some(42));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-0/*"), None);
        assert_eq!(parse_content_range_total(""), None);
    }

    #[tokio::test]
    async fn test_count_reads_content_range() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/doctors"))
            .and(query_param("organizationEmail", "eq.city@hospital.org"))
            .and(header("prefer", "count=exact"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-range", "0-0/7")
                    .set_body_json(json!([{"id": "d1"}])),
            )
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&config(&server.uri()));
        let total = client
            .count(&Query::table("doctors").eq("organizationEmail", "city@hospital.org"))
            .await
            .unwrap();
        assert_eq!(total, 7);
    }

    #[tokio::test]
    async fn test_empty_body_decodes_as_null() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/reviews"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&config(&server.uri()));
        let value: Value = client
            .request(Method::DELETE, "/rest/v1/reviews?id=eq.r1", None)
            .await
            .unwrap();
        assert!(value.is_null());
    }
}
