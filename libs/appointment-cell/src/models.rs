use serde::{Deserialize, Serialize};

use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_models::schedule::TimeSlot;
use shared_utils::lenient;

// ==============================================================================
// REQUESTS
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    // Patient
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub age: Option<f64>,
    pub image: Option<String>,

    // Organization
    pub organization_type: Option<String>,
    pub organization_name: Option<String>,
    pub organization_email: Option<String>,

    // Doctor
    pub doctor_name: Option<String>,
    pub doctor_email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub fees: Option<f64>,

    pub appointment_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub time_slots: Option<TimeSlot>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorAppointmentsQuery {
    pub email: Option<String>,
    pub organization_email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizationAppointmentsQuery {
    pub email: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("{}", .0.join(", "))]
    Invalid(Vec<String>),

    #[error("Status must be either Confirmed, Cancelled or Completed")]
    InvalidStatus,

    #[error("{0}")]
    MissingParameter(&'static str),

    #[error("Appointment not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::Invalid(_)
            | AppointmentError::InvalidStatus
            | AppointmentError::MissingParameter(_) => AppError::BadRequest(err.to_string()),
            AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::Database(e) => e.into(),
        }
    }
}
