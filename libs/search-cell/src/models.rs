use serde::Deserialize;

use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_utils::geo::validate_coordinates;
use shared_utils::lenient;

use crate::services::RegistryError;

/// Text searches with an origin keep results within this radius.
pub const SEARCH_RADIUS_KM: f64 = 10.0;
pub const MAX_SEARCH_RESULTS: usize = 20;
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;
pub const MAX_NEARBY_RESULTS: usize = 20;

/// Registry records fetched for the patient-app nearby view.
pub const REGISTRY_SAMPLE_SIZE: usize = 20;
pub const REGISTRY_SAMPLE_MAX_KM: f64 = 200.0;
pub const DEFAULT_REGISTRY_RADIUS_KM: f64 = 10.0;

/// Hospital columns safe to show in search results.
pub const HOSPITAL_PUBLIC_COLUMNS: &str =
    "id,hospitalName,email,phone,address,state,city,pincode,image,latitude,longitude";

// ==============================================================================
// SEARCH QUERIES
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Specialty,
    Doctor,
    Hospital,
    Clinic,
}

impl SearchKind {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw? {
            "specialty" => Some(SearchKind::Specialty),
            "doctor" => Some(SearchKind::Doctor),
            "hospital" => Some(SearchKind::Hospital),
            "clinic" => Some(SearchKind::Clinic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub query: Option<String>,
    pub specialty: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub lng: Option<f64>,
}

impl SearchQuery {
    /// Search origin, when both coordinates are present and in range.
    pub fn origin(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if validate_coordinates(lat, lng) => Some((lat, lng)),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        non_blank(self.query.as_deref())
    }

    pub fn specialty(&self) -> Option<&str> {
        non_blank(self.specialty.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearbyRequest {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub longitude: Option<f64>,
    /// Kilometres.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub radius: Option<f64>,
}

// ==============================================================================
// REGISTRY QUERIES
// ==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrySampleQuery {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrySearchQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub query: Option<String>,
}

/// Registry column filtered on by each search type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryField {
    Name,
    Location,
    Pincode,
}

impl RegistryField {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw? {
            "name" => Some(RegistryField::Name),
            "location" => Some(RegistryField::Location),
            "pincode" => Some(RegistryField::Pincode),
            _ => None,
        }
    }

    pub fn filter_param(&self) -> &'static str {
        match self {
            RegistryField::Name => "filters[hospital_name]",
            RegistryField::Location => "filters[_location]",
            RegistryField::Pincode => "filters[_pincode]",
        }
    }
}

/// Coordinates are kept as strings so that unparsable input can be
/// reported as a 400 instead of a query rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryRadiusQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub radius: Option<f64>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Specialty is required for specialty search")]
    SpecialtyRequired,

    #[error("Search query is required")]
    QueryRequired,

    #[error("Invalid search type")]
    InvalidType,

    #[error("Latitude and longitude are required")]
    MissingLocation,

    #[error("Invalid coordinates")]
    InvalidCoordinates,

    #[error("Hospital not found")]
    HospitalNotFound,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::SpecialtyRequired
            | SearchError::QueryRequired
            | SearchError::InvalidType
            | SearchError::MissingLocation
            | SearchError::InvalidCoordinates => AppError::BadRequest(err.to_string()),
            SearchError::HospitalNotFound => AppError::NotFound(err.to_string()),
            SearchError::Registry(e) => AppError::external("Failed to fetch hospital data", e),
            SearchError::Pattern(e) => AppError::Internal(e.to_string()),
            SearchError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_search_kind_parsing() {
        assert_eq!(SearchKind::parse(Some("clinic")), Some(SearchKind::Clinic));
        assert_eq!(SearchKind::parse(Some("pharmacy")), None);
        assert_eq!(SearchKind::parse(None), None);
    }

    #[test]
    fn test_origin_needs_both_coordinates() {
        let query: SearchQuery = serde_json::from_value(json!({"lat": "18.52", "lng": "73.85"})).unwrap();
        assert_eq!(query.origin(), Some((18.52, 73.85)));

        let query: SearchQuery = serde_json::from_value(json!({"lat": "18.52"})).unwrap();
        assert_eq!(query.origin(), None);

        let query: SearchQuery = serde_json::from_value(json!({"lat": 95, "lng": 10})).unwrap();
        assert_eq!(query.origin(), None);
    }

    #[test]
    fn test_blank_text_is_absent() {
        let query = SearchQuery {
            query: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.text(), None);
    }

    #[test]
    fn test_registry_field_params() {
        assert_eq!(RegistryField::parse(Some("pincode")).unwrap().filter_param(), "filters[_pincode]");
        assert_eq!(RegistryField::parse(Some("city")), None);
    }

    #[test]
    fn test_registry_failures_are_bad_gateway() {
        let err: AppError = SearchError::Registry(RegistryError::Api("HTTP 503".to_string())).into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
