use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{Query, SupabaseClient};
use shared_utils::geo::{nearest, validate_coordinates, BoundingBox};
use shared_utils::password::without_password;

use crate::models::{
    NearbyRequest, RegistryRadiusQuery, RegistrySampleQuery, SearchError, DEFAULT_NEARBY_RADIUS_KM,
    DEFAULT_REGISTRY_RADIUS_KM, MAX_NEARBY_RESULTS, REGISTRY_SAMPLE_MAX_KM, REGISTRY_SAMPLE_SIZE,
};
use crate::services::registry::{records_within, RegistryClient};

/// Directory tables searchable by proximity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearbyTable {
    Doctors,
    Hospitals,
    Clinics,
}

impl NearbyTable {
    fn name(&self) -> &'static str {
        match self {
            NearbyTable::Doctors => "doctors",
            NearbyTable::Hospitals => "hospitals",
            NearbyTable::Clinics => "clinics",
        }
    }
}

/// Proximity lookups over the directory and the government registry.
pub struct NearbyService {
    supabase: SupabaseClient,
    registry: RegistryClient,
}

impl NearbyService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            registry: RegistryClient::new(config),
        }
    }

    /// Up to twenty rows of `table` within `radius` km, nearest first.
    pub async fn around(&self, table: NearbyTable, request: NearbyRequest) -> Result<Vec<Value>, SearchError> {
        let (lat, lng) = match (request.latitude, request.longitude) {
            (Some(lat), Some(lng)) if validate_coordinates(lat, lng) => (lat, lng),
            _ => return Err(SearchError::MissingLocation),
        };
        let radius = request.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_KM).max(0.0);
        debug!("{} within {} km of ({}, {})", table.name(), radius, lat, lng);

        let bbox = BoundingBox::around(lat, lng, radius);
        let rows: Vec<Value> = self.supabase.select(&bbox.apply(Query::table(table.name()))).await?;

        Ok(nearest(rows, (lat, lng), Some(radius), MAX_NEARBY_RESULTS)
            .into_iter()
            .map(without_password)
            .collect())
    }

    /// A registry sample around the caller, nearest first.
    pub async fn registry_sample(&self, query: RegistrySampleQuery) -> Result<Vec<Value>, SearchError> {
        let origin = match (query.latitude, query.longitude) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err(SearchError::MissingLocation),
        };

        let records = self.registry.records(&[], Some(REGISTRY_SAMPLE_SIZE)).await?;
        Ok(records_within(records, origin, REGISTRY_SAMPLE_MAX_KM, None))
    }

    /// Registry hospitals within `radius` km, distances rounded to 0.1 km.
    pub async fn registry_radius(&self, query: RegistryRadiusQuery) -> Result<Vec<Value>, SearchError> {
        let parse = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<f64>().ok()).filter(|v| v.is_finite());
        let origin = match (parse(query.lat.as_deref()), parse(query.lng.as_deref())) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err(SearchError::InvalidCoordinates),
        };
        let radius = query.radius.unwrap_or(DEFAULT_REGISTRY_RADIUS_KM);

        let records = self.registry.records(&[], None).await?;
        Ok(records_within(records, origin, radius, Some(1)))
    }
}
