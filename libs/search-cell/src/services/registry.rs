use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_utils::geo::haversine_km;

use crate::models::RegistryField;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Registry request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Registry API error: {0}")]
    Api(String),
}

#[derive(Debug, Default, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Vec<Value>,
}

/// Client for the government hospital directory (data.gov.in resource API).
pub struct RegistryClient {
    client: Client,
    url: String,
    api_key: String,
}

impl RegistryClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            url: config.hospital_registry_url.clone(),
            api_key: config.hospital_api_key.clone(),
        }
    }

    /// Records matching `filters`; `limit` is left to the registry default when `None`.
    pub async fn records(&self, filters: &[(&str, &str)], limit: Option<usize>) -> Result<Vec<Value>, RegistryError> {
        let limit = limit.map(|l| l.to_string());
        let mut params: Vec<(&str, &str)> = vec![("api-key", self.api_key.as_str()), ("format", "json")];
        params.extend_from_slice(filters);
        if let Some(limit) = limit.as_deref() {
            params.push(("limit", limit));
        }

        debug!("Registry lookup with {} filter(s)", filters.len());
        let response = self.client.get(&self.url).query(&params).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("Registry request failed: {} - {}", status, text);
            return Err(RegistryError::Api(format!("HTTP {}: {}", status, text)));
        }

        let parsed: RecordsResponse = serde_json::from_str(&text)
            .map_err(|e| RegistryError::Api(format!("Failed to parse registry response: {}", e)))?;
        Ok(parsed.records)
    }

    pub async fn search(&self, field: RegistryField, query: &str) -> Result<Vec<Value>, RegistryError> {
        self.records(&[(field.filter_param(), query)], None).await
    }

    pub async fn details(&self, serial_no: &str) -> Result<Option<Value>, RegistryError> {
        let records = self.records(&[("filters[_sr_no]", serial_no)], None).await?;
        Ok(records.into_iter().next())
    }
}

/// `"lat, lng"` from a record's `_location_coordinates`.
pub fn record_coordinates(record: &Value) -> Option<(f64, f64)> {
    let raw = record.get("_location_coordinates")?.as_str()?;
    let (lat, lng) = raw.split_once(',')?;
    let lat = lat.trim().parse::<f64>().ok()?;
    let lng = lng.trim().parse::<f64>().ok()?;
    (lat.is_finite() && lng.is_finite()).then_some((lat, lng))
}

/// Records within `max_km` of `origin`, nearest first, each with a
/// `distance` field (km, rounded to `precision` decimals when given).
pub fn records_within(records: Vec<Value>, origin: (f64, f64), max_km: f64, precision: Option<i32>) -> Vec<Value> {
    let mut ranked: Vec<(Value, f64)> = records
        .into_iter()
        .filter_map(|mut record| {
            let (lat, lng) = record_coordinates(&record)?;
            let distance = haversine_km(origin.0, origin.1, lat, lng);
            if distance > max_km {
                return None;
            }
            let shown = match precision {
                Some(p) => {
                    let factor = 10f64.powi(p);
                    (distance * factor).round() / factor
                }
                None => distance,
            };
            if let Some(fields) = record.as_object_mut() {
                fields.insert("distance".to_string(), json!(shown));
            }
            Some((record, distance))
        })
        .collect();

    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.into_iter().map(|(record, _)| record).collect()
}
