use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use shared_config::AppConfig;

#[derive(Error, Debug)]
pub enum NutritionixError {
    #[error("Nutrition API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Nutrition API error ({status}): {body}")]
    Api { status: u16, body: Value },
}

impl NutritionixError {
    /// What the caller is shown: the upstream body when there is one.
    pub fn details(&self) -> String {
        match self {
            NutritionixError::Api { body, .. } => match body {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
            NutritionixError::Request(e) => e.to_string(),
        }
    }
}

/// Thin client over the Nutritionix v2 API.
pub struct NutritionixClient {
    client: Client,
    base_url: String,
    app_id: String,
    api_key: String,
}

impl NutritionixClient {
    pub fn new(config: &AppConfig) -> Self {
        if !config.is_nutrition_configured() {
            warn!("Nutritionix credentials are not set; upstream calls will be rejected");
        }

        Self {
            client: Client::new(),
            base_url: config.nutritionix_base_url.trim_end_matches('/').to_string(),
            app_id: config.nutritionix_app_id.clone(),
            api_key: config.nutritionix_api_key.clone(),
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("x-app-id", &self.app_id)
            .header("x-app-key", &self.api_key)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, NutritionixError> {
        let response = self.authorized(builder).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("Nutritionix request failed: {} - {}", status, text);
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(NutritionixError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&text).map_err(|e| NutritionixError::Api {
            status: status.as_u16(),
            body: Value::String(format!("Invalid JSON from nutrition API: {}", e)),
        })
    }

    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, NutritionixError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Nutritionix GET {}", url);
        self.send(self.client.get(&url).query(params)).await
    }

    async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value, NutritionixError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Nutritionix POST {}", url);
        self.send(self.client.post(&url).json(body)).await
    }

    /// `/search/instant`: raw response with `common` and `branded` lists.
    pub async fn search_instant(&self, query: &str) -> Result<Value, NutritionixError> {
        self.get("/search/instant", &[("query", query)]).await
    }

    /// `/natural/nutrients`: raw response with a `foods` list.
    pub async fn natural_nutrients(&self, query: &str) -> Result<Value, NutritionixError> {
        self.post("/natural/nutrients", &serde_json::json!({ "query": query })).await
    }

    /// `/natural/exercise`: raw response with an `exercises` list.
    pub async fn natural_exercise<B: Serialize + ?Sized>(&self, body: &B) -> Result<Value, NutritionixError> {
        self.post("/natural/exercise", body).await
    }

    /// `/search/item`: raw response with a `foods` list.
    pub async fn item_by_upc(&self, upc: &str) -> Result<Value, NutritionixError> {
        self.get("/search/item", &[("upc", upc)]).await
    }
}

/// The array under `key`, or an empty one.
pub fn list(body: &Value, key: &str) -> Vec<Value> {
    body.get(key).and_then(Value::as_array).cloned().unwrap_or_default()
}
