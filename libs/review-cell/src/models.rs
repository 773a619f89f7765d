use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_utils::lenient;

pub const MAX_REVIEW_LEN: usize = 500;
pub const RATING_RANGE: (f64, f64) = (1.0, 5.0);
pub const GUEST_EMAIL: &str = "guest@guest.com";
pub const LATEST_WEB_REVIEWS: usize = 10;

// ==============================================================================
// REVIEWERS AND SUBJECTS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReviewerType {
    User,
    #[default]
    Guest,
}

impl fmt::Display for ReviewerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewerType::User => write!(f, "User"),
            ReviewerType::Guest => write!(f, "Guest"),
        }
    }
}

impl FromStr for ReviewerType {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(ReviewerType::User),
            "Guest" => Ok(ReviewerType::Guest),
            other => Err(ReviewError::Invalid(vec![format!("{} is not a valid user type", other)])),
        }
    }
}

/// What a review is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewSubject {
    Hospital,
    Clinic,
    Doctor,
}

impl ReviewSubject {
    /// Lower-case noun used in "No reviews found for this ..." messages.
    pub fn noun(&self) -> &'static str {
        match self {
            ReviewSubject::Hospital => "hospital",
            ReviewSubject::Clinic => "clinic",
            ReviewSubject::Doctor => "doctor",
        }
    }
}

impl fmt::Display for ReviewSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewSubject::Hospital => write!(f, "Hospital"),
            ReviewSubject::Clinic => write!(f, "Clinic"),
            ReviewSubject::Doctor => write!(f, "Doctor"),
        }
    }
}

impl FromStr for ReviewSubject {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Hospital" => Ok(ReviewSubject::Hospital),
            "Clinic" => Ok(ReviewSubject::Clinic),
            "Doctor" => Ok(ReviewSubject::Doctor),
            other => Err(ReviewError::Invalid(vec![format!("{} is not a valid entity type", other)])),
        }
    }
}

// ==============================================================================
// REQUESTS
// ==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub reviewer_email: Option<String>,
    pub user_type: Option<String>,
    pub entity_type: Option<String>,
    pub entity_email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub rating: Option<f64>,
    pub text: Option<String>,
    pub recommended: Option<bool>,
}

/// Editable review fields; anything omitted is left as stored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub rating: Option<f64>,
    pub text: Option<String>,
    pub recommended: Option<bool>,
    pub user_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebReviewRequest {
    pub email: Option<String>,
    pub user_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub rating: Option<f64>,
    pub review: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Please provide all required fields")]
    MissingFields,

    #[error("{}", .0.join(", "))]
    Invalid(Vec<String>),

    #[error("No reviews found for this {0}")]
    NoReviews(&'static str),

    #[error("Review not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::MissingFields | ReviewError::Invalid(_) => AppError::BadRequest(err.to_string()),
            ReviewError::NoReviews(_) | ReviewError::NotFound => AppError::NotFound(err.to_string()),
            ReviewError::Database(e) => e.into(),
        }
    }
}

// ==============================================================================
// FIELD RULES
// ==============================================================================

/// Appends a message when the rating falls outside 1..=5.
pub fn check_rating(rating: f64, errors: &mut Vec<String>) {
    if !(RATING_RANGE.0..=RATING_RANGE.1).contains(&rating) {
        errors.push("Rating must be between 1 and 5".to_string());
    }
}

pub fn check_length(text: &str, message: &str, errors: &mut Vec<String>) {
    if text.trim().chars().count() > MAX_REVIEW_LEN {
        errors.push(message.to_string());
    }
}
