use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared_database::cloudinary::MediaError;
use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_utils::lenient;

// ==============================================================================
// REQUESTS
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub phone: Option<String>,
    pub password: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub address: Option<PatientAddress>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub notification_preferences: Option<NotificationPreferences>,
    /// Base64 data URI.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientAddress {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    #[serde(default = "enabled")]
    pub email: bool,
    #[serde(default = "enabled")]
    pub sms: bool,
    #[serde(default)]
    pub whatsapp: bool,
}

fn enabled() -> bool {
    true
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            sms: true,
            whatsapp: false,
        }
    }
}

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultantLoginRequest {
    pub user_id: Option<String>,
    pub password: Option<String>,
}

// ==============================================================================
// RESPONSES
// ==============================================================================

/// Token plus the stored account with its password removed.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub account: Value,
}

/// Fields a consultant sees about themselves after login.
pub const CONSULTANT_PROFILE_FIELDS: [&str; 18] = [
    "id",
    "name",
    "email",
    "phone",
    "organizationEmail",
    "organizationName",
    "organizationType",
    "state",
    "city",
    "address",
    "degrees",
    "specialties",
    "experience",
    "consultationFees",
    "availableDays",
    "timeSlots",
    "userId",
    "profileImage",
];

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Please provide email and password")]
    MissingCredentials,

    #[error("Please provide email or user ID")]
    MissingUserId,

    #[error("User ID not found!")]
    UserIdNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists with this email or phone")]
    UserExists,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials
            | AuthError::MissingUserId
            | AuthError::UserIdNotFound
            | AuthError::UserExists => AppError::BadRequest(err.to_string()),
            AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::Validation(msg) => AppError::ValidationError(msg),
            AuthError::Media(e) => e.into(),
            AuthError::Database(e) => e.into(),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_notification_preferences_defaults() {
        let prefs: NotificationPreferences = serde_json::from_value(json!({})).unwrap();
        assert_eq!(prefs, NotificationPreferences::default());

        let prefs: NotificationPreferences =
            serde_json::from_value(json!({"whatsapp": true, "sms": false})).unwrap();
        assert!(prefs.email);
        assert!(!prefs.sms);
        assert!(prefs.whatsapp);
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(AppError::from(AuthError::InvalidCredentials).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::from(AuthError::UserIdNotFound).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::from(AuthError::UserExists).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::from(AuthError::Media(MediaError::NotConfigured)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_signup_accepts_stringified_nested_objects() {
        let req: PatientSignupRequest = serde_json::from_value(json!({
            "firstName": "Asha",
            "phone": 9876543210u64,
            "address": "{\"city\":\"Pune\"}",
            "notificationPreferences": {"email": false}
        }))
        .unwrap();

        assert_eq!(req.phone.as_deref(), Some("9876543210"));
        assert_eq!(req.address.unwrap().city.as_deref(), Some("Pune"));
        assert!(!req.notification_preferences.unwrap().email);
    }
}
