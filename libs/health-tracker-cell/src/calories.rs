//! Daily energy needs from the Mifflin-St Jeor equation.

use crate::models::{
    ActivityLevel, BodyProfile, CaloriePlan, DailyCaloriesRequest, Gender, HealthError, MacroGoal,
    MacronutrientGoals, WeightGoals, AGE_RANGE, HEIGHT_RANGE_CM, WEIGHT_GOAL_DELTA, WEIGHT_RANGE_KG,
};

fn within(value: Option<f64>, (min, max): (f64, f64)) -> Option<f64> {
    value.filter(|v| *v != 0.0 && *v >= min && *v <= max)
}

/// Checks every field and reports all failures at once.
pub fn validate(request: &DailyCaloriesRequest) -> Result<BodyProfile, HealthError> {
    let mut errors = Vec::new();

    let gender = request.gender.as_deref().and_then(|g| g.parse::<Gender>().ok());
    if gender.is_none() {
        errors.push("Valid gender (male/female) is required".to_string());
    }

    let age = within(request.age, AGE_RANGE);
    if age.is_none() {
        errors.push("Age must be between 15 and 80 years".to_string());
    }

    let height_cm = within(request.height_cm, HEIGHT_RANGE_CM);
    if height_cm.is_none() {
        errors.push("Height must be between 130cm and 230cm".to_string());
    }

    let weight_kg = within(request.weight_kg, WEIGHT_RANGE_KG);
    if weight_kg.is_none() {
        errors.push("Weight must be between 40kg and 160kg".to_string());
    }

    let activity = request
        .activity_level
        .as_deref()
        .and_then(|a| a.parse::<ActivityLevel>().ok());
    if activity.is_none() {
        let levels: Vec<&str> = ActivityLevel::ALL.iter().map(ActivityLevel::as_str).collect();
        errors.push(format!("Activity level must be one of: {}", levels.join(", ")));
    }

    match (gender, age, height_cm, weight_kg, activity) {
        (Some(gender), Some(age), Some(height_cm), Some(weight_kg), Some(activity)) => {
            Ok(BodyProfile {
                gender,
                age,
                height_cm,
                weight_kg,
                activity,
            })
        }
        _ => Err(HealthError::Invalid(errors)),
    }
}

pub fn basal_metabolic_rate(profile: &BodyProfile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * profile.age;
    match profile.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

fn macro_goal(daily: i64, share: f64, kcal_per_gram: f64) -> MacroGoal {
    let calories = daily as f64 * share;
    MacroGoal {
        grams: (calories / kcal_per_gram).round() as i64,
        calories: calories.round() as i64,
    }
}

pub fn plan(profile: &BodyProfile) -> CaloriePlan {
    let bmr = basal_metabolic_rate(profile);
    let daily = (bmr * profile.activity.factor()).round() as i64;

    CaloriePlan {
        daily_calories: daily,
        bmr: bmr.round() as i64,
        activity_level: profile.activity,
        activity_description: profile.activity.description(),
        macronutrient_goals: MacronutrientGoals {
            protein: macro_goal(daily, 0.30, 4.0),
            carbs: macro_goal(daily, 0.45, 4.0),
            fats: macro_goal(daily, 0.25, 9.0),
        },
        weight_goals: WeightGoals {
            weight_loss: daily - WEIGHT_GOAL_DELTA,
            weight_gain: daily + WEIGHT_GOAL_DELTA,
            maintenance: daily,
        },
    }
}
