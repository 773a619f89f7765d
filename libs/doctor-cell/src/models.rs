use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared_database::cloudinary::MediaError;
use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_models::schedule::TimeSlot;
use shared_utils::lenient;

// ==============================================================================
// SCHEMA CONSTANTS
// ==============================================================================

pub const DEGREES: [&str; 13] = [
    "MBBS", "MD", "MS", "DNB", "DM", "MCh", "BDS", "MDS", "BHMS", "BAMS", "BUMS", "DHMS", "PhD",
];

pub const SPECIALTIES: [&str; 11] = [
    "Cardiology",
    "Neurology",
    "Orthopedics",
    "Pediatrics",
    "Gynecology",
    "Dermatology",
    "ENT",
    "Ophthalmology",
    "Psychiatry",
    "Dental",
    "General Medicine",
];

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const STATUSES: [&str; 4] = ["active", "inactive", "pending", "suspended"];

pub const MAX_EXPERIENCE_YEARS: f64 = 50.0;
pub const DESCRIPTION_LEN: (usize, usize) = (5, 1000);
pub const MIN_USER_ID_LEN: usize = 4;
pub const MIN_PASSWORD_LEN: usize = 6;

pub const IMAGE_FOLDER: &str = "doctors";

/// Fields echoed back after a doctor is added.
pub const ADDED_DOCTOR_FIELDS: [&str; 7] = [
    "id",
    "name",
    "email",
    "organizationName",
    "specialties",
    "consultationFees",
    "profileImage",
];

// ==============================================================================
// REQUESTS
// ==============================================================================

/// Doctor as submitted by an organization. Arrays may arrive JSON-encoded
/// and numbers as strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDoctorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub alternate_phone: Option<String>,
    pub organization_id: Option<String>,
    pub organization_type: Option<String>,
    pub organization_name: Option<String>,
    pub organization_email: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
    #[serde(default, deserialize_with = "lenient::opt_string_vec")]
    pub degrees: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub experience: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string_vec")]
    pub specialties: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub consultation_fees: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string_vec")]
    pub available_days: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub time_slots: Option<TimeSlot>,
    pub user_id: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    /// Base64 data URI.
    pub profile_image: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorFilterQuery {
    pub specialty: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub max_fee: Option<f64>,
    /// `Hospital` or `Clinic`.
    pub organization: Option<String>,
    pub sort_by: Option<String>,
}

impl DoctorFilterQuery {
    /// Unrecognised values fall back to insertion order.
    pub fn sort(&self) -> Option<DoctorSort> {
        match self.sort_by.as_deref() {
            Some("fees") => Some(DoctorSort::Fees),
            Some("experience") => Some(DoctorSort::Experience),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorSort {
    /// Cheapest first.
    Fees,
    /// Most experienced first.
    Experience,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestDoctorsQuery {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub longitude: Option<f64>,
    /// Metres.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub max_distance: Option<f64>,
}

pub const DEFAULT_MAX_DISTANCE_M: f64 = 10_000.0;

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DoctorError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Profile image is required")]
    MissingImage,

    #[error("Password and confirm password are required")]
    MissingPassword,

    #[error("Passwords don't match")]
    PasswordMismatch,

    #[error("User ID already exists")]
    UserIdTaken,

    #[error("Invalid doctor details")]
    InvalidFields(Vec<String>),

    #[error("Latitude and longitude are required")]
    MissingLocation,

    #[error("Doctor not found")]
    NotFound,

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::MissingFields(_)
            | DoctorError::MissingImage
            | DoctorError::MissingPassword
            | DoctorError::PasswordMismatch
            | DoctorError::UserIdTaken
            | DoctorError::MissingLocation => AppError::BadRequest(err.to_string()),
            DoctorError::InvalidFields(details) => AppError::InvalidFields(details),
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::Media(e) => e.into(),
            DoctorError::Database(e) => e.into(),
            DoctorError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_request_parses_form_encoded_fields() {
        let request: AddDoctorRequest = serde_json::from_value(json!({
            "degrees": "[\"MBBS\",\"MD\"]",
            "specialties": ["Cardiology"],
            "availableDays": "[\"Monday\"]",
            "timeSlots": "{\"start\":\"09:00\",\"end\":\"13:00\"}",
            "experience": "12",
            "consultationFees": 800,
            "phone": 9876543210u64
        }))
        .unwrap();

        assert_eq!(request.degrees.unwrap(), vec!["MBBS", "MD"]);
        assert_eq!(request.available_days.unwrap(), vec!["Monday"]);
        assert_eq!(request.time_slots.unwrap().end, "13:00");
        assert_eq!(request.experience, Some(12.0));
        assert_eq!(request.phone.as_deref(), Some("9876543210"));
    }

    #[test]
    fn test_missing_fields_message() {
        let err = DoctorError::MissingFields(vec!["name", "userId"]);
        assert_eq!(err.to_string(), "Missing required fields: name, userId");
    }

    #[test]
    fn test_sort_parses_known_values() {
        let query: DoctorFilterQuery = serde_json::from_value(json!({"sortBy": "experience"})).unwrap();
        assert_eq!(query.sort(), Some(DoctorSort::Experience));

        let query: DoctorFilterQuery = serde_json::from_value(json!({"sortBy": "rating"})).unwrap();
        assert_eq!(query.sort(), None);
    }
}
