use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared_database::cloudinary::MediaError;
use shared_database::DatabaseError;
use shared_models::auth::AccountRole;
use shared_models::error::AppError;
use shared_utils::lenient;

// ==============================================================================
// ORGANIZATION KIND
// ==============================================================================

/// Hospitals and clinics share one account shape; they differ in table,
/// name column and wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizationKind {
    Hospital,
    Clinic,
}

impl OrganizationKind {
    pub fn role(self) -> AccountRole {
        match self {
            OrganizationKind::Hospital => AccountRole::Hospital,
            OrganizationKind::Clinic => AccountRole::Clinic,
        }
    }

    pub fn table(self) -> &'static str {
        self.role().table()
    }

    pub fn name_field(self) -> &'static str {
        match self {
            OrganizationKind::Hospital => "hospitalName",
            OrganizationKind::Clinic => "clinicName",
        }
    }

    pub fn image_folder(self) -> &'static str {
        match self {
            OrganizationKind::Hospital => "hospitals",
            OrganizationKind::Clinic => "clinics",
        }
    }

    /// Key wrapping the account in responses.
    pub fn response_key(self) -> &'static str {
        match self {
            OrganizationKind::Hospital => "hospital",
            OrganizationKind::Clinic => "clinic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrganizationKind::Hospital => "Hospital",
            OrganizationKind::Clinic => "Clinic",
        }
    }
}

// ==============================================================================
// REQUESTS
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    #[serde(rename = "hospitalName", alias = "clinicName")]
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub alternate_phone: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub pincode: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub established_year: Option<f64>,
    pub website: Option<String>,
    /// Number or numeric string; anything else is rejected by the service.
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
    /// Base64 data URI.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestQuery {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub longitude: Option<f64>,
    /// Metres.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub max_distance: Option<f64>,
}

pub const DEFAULT_MAX_DISTANCE_M: f64 = 10_000.0;

pub const NEAREST_HOSPITALS_LIMIT: usize = 10;

// ==============================================================================
// RESPONSES
// ==============================================================================

/// Summary returned after registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredOrganization {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub token: String,
    pub organization: RegisteredOrganization,
}

/// Token plus the stored profile, password removed and role attached.
#[derive(Debug, Clone)]
pub struct OrganizationSession {
    pub token: String,
    pub profile: Value,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrganizationError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("{0} already registered")]
    AlreadyRegistered(&'static str),

    #[error("Invalid coordinates")]
    InvalidCoordinates,

    #[error("Latitude and longitude are required")]
    MissingLocation,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrganizationError> for AppError {
    fn from(err: OrganizationError) -> Self {
        match err {
            OrganizationError::MissingFields
            | OrganizationError::AlreadyRegistered(_)
            | OrganizationError::InvalidCoordinates
            | OrganizationError::MissingLocation => AppError::BadRequest(err.to_string()),
            OrganizationError::InvalidCredentials => AppError::Auth(err.to_string()),
            OrganizationError::NotFound(_) => AppError::NotFound(err.to_string()),
            OrganizationError::Validation(msg) => AppError::ValidationError(msg),
            OrganizationError::Media(e) => e.into(),
            OrganizationError::Database(e) => e.into(),
            OrganizationError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_registration_accepts_either_name_field() {
        let hospital: RegistrationRequest =
            serde_json::from_value(json!({"hospitalName": "City Hospital"})).unwrap();
        let clinic: RegistrationRequest =
            serde_json::from_value(json!({"clinicName": "Care Clinic", "pincode": 411001})).unwrap();

        assert_eq!(hospital.name.as_deref(), Some("City Hospital"));
        assert_eq!(clinic.name.as_deref(), Some("Care Clinic"));
        assert_eq!(clinic.pincode.as_deref(), Some("411001"));
    }

    #[test]
    fn test_kind_wording() {
        assert_eq!(OrganizationKind::Clinic.table(), "clinics");
        assert_eq!(
            OrganizationError::AlreadyRegistered(OrganizationKind::Clinic.label()).to_string(),
            "Clinic already registered"
        );
        assert_eq!(
            AppError::from(OrganizationError::NotFound("Hospital")).status(),
            StatusCode::NOT_FOUND
        );
    }
}
