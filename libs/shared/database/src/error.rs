use reqwest::StatusCode;
use thiserror::Error;

use shared_models::error::AppError;

/// PostgREST error code for a violated unique constraint.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Store API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("Failed to decode store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Store returned no rows for {0}")]
    EmptyResult(String),
}

impl DatabaseError {
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::Api { status, message } => {
                *status == StatusCode::CONFLICT || message.contains(UNIQUE_VIOLATION)
            }
            _ => false,
        }
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        if err.is_unique_violation() {
            return AppError::BadRequest("Record already exists".to_string());
        }
        AppError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_detection() {
        let conflict = DatabaseError::Api {
            status: StatusCode::CONFLICT,
            message: "duplicate".to_string(),
        };
        assert!(conflict.is_unique_violation());

        let coded = DatabaseError::Api {
            status: StatusCode::BAD_REQUEST,
            message: r#"{"code":"23505","message":"duplicate key value"}"#.to_string(),
        };
        assert!(coded.is_unique_violation());

        let other = DatabaseError::EmptyResult("users".to_string());
        assert!(!other.is_unique_violation());
    }

    #[test]
    fn test_conversion_to_app_error() {
        let err: AppError = DatabaseError::EmptyResult("doctors".to_string()).into();
        assert!(matches!(err, AppError::Database(_)));

        let err: AppError = DatabaseError::Api {
            status: StatusCode::CONFLICT,
            message: "duplicate".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
