use std::str::FromStr;

use serde::{Deserialize, Serialize};

use shared_models::error::AppError;
use shared_utils::lenient;

use crate::services::NutritionixError;

pub const AGE_RANGE: (f64, f64) = (15.0, 80.0);
pub const HEIGHT_RANGE_CM: (f64, f64) = (130.0, 230.0);
pub const WEIGHT_RANGE_KG: (f64, f64) = (40.0, 160.0);
pub const WEIGHT_GOAL_DELTA: i64 = 500;

// ==============================================================================
// REQUESTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct FoodSearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpcQuery {
    pub upc: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NutritionRequest {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub query: Option<String>,
}

/// Forwarded to the exercise endpoint as given; absent fields stay absent.
#[derive(Debug, Deserialize, Serialize)]
pub struct ExerciseRequest {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyCaloriesRequest {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub age: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub height_cm: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub weight_kg: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub activity_level: Option<String>,
}

// ==============================================================================
// CALORIE MODEL
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    pub fn factor(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise, desk job",
            ActivityLevel::Light => "Light exercise 1-3 days/week",
            ActivityLevel::Moderate => "Moderate exercise 3-5 days/week",
            ActivityLevel::Active => "Heavy exercise 6-7 days/week",
            ActivityLevel::VeryActive => "Very heavy exercise, physical job or training twice/day",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        ActivityLevel::ALL.into_iter().find(|level| level.as_str() == s).ok_or(())
    }
}

/// A validated daily-calories request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProfile {
    pub gender: Gender,
    pub age: f64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity: ActivityLevel,
}

// ==============================================================================
// RESPONSES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroGoal {
    pub grams: i64,
    pub calories: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacronutrientGoals {
    pub protein: MacroGoal,
    pub carbs: MacroGoal,
    pub fats: MacroGoal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightGoals {
    pub weight_loss: i64,
    pub weight_gain: i64,
    pub maintenance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaloriePlan {
    pub daily_calories: i64,
    pub bmr: i64,
    pub activity_level: ActivityLevel,
    pub activity_description: &'static str,
    pub macronutrient_goals: MacronutrientGoals,
    pub weight_goals: WeightGoals,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("{0}")]
    MissingInput(&'static str),

    #[error("Validation failed")]
    Invalid(Vec<String>),

    #[error("Food item not found")]
    FoodNotFound,

    #[error("{message}")]
    Upstream {
        message: &'static str,
        #[source]
        source: NutritionixError,
    },
}

impl HealthError {
    pub fn upstream(message: &'static str) -> impl FnOnce(NutritionixError) -> HealthError {
        move |source| HealthError::Upstream { message, source }
    }
}

impl From<HealthError> for AppError {
    fn from(err: HealthError) -> Self {
        match err {
            HealthError::MissingInput(msg) => AppError::BadRequest(msg.to_string()),
            HealthError::Invalid(details) => AppError::InvalidFields(details),
            HealthError::FoodNotFound => AppError::NotFound("Food item not found".to_string()),
            HealthError::Upstream { message, source } => AppError::external(message, source.details()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_level_parsing_ignores_case() {
        assert_eq!("Very_Active".parse::<ActivityLevel>(), Ok(ActivityLevel::VeryActive));
        assert_eq!("light".parse::<ActivityLevel>(), Ok(ActivityLevel::Light));
        assert!("couch".parse::<ActivityLevel>().is_err());
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!("FEMALE".parse::<Gender>(), Ok(Gender::Female));
        assert!("other".parse::<Gender>().is_err());
    }
}
