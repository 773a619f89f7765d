use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{Order, Query, SupabaseClient};
use shared_utils::validation::{is_blank, normalize_email};

use crate::models::{
    check_length, check_rating, CreateWebReviewRequest, ReviewError, ReviewerType, GUEST_EMAIL,
    LATEST_WEB_REVIEWS,
};

const WEB_REVIEWS_TABLE: &str = "web_reviews";

/// Feedback about the site itself, shown on the landing page.
pub struct WebReviewService {
    supabase: SupabaseClient,
}

impl WebReviewService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create(&self, request: CreateWebReviewRequest) -> Result<Value, ReviewError> {
        let row = web_review_row(request)?;
        let created = self.supabase.insert(WEB_REVIEWS_TABLE, row).await?;
        info!("Web review stored: {}", created["id"].as_str().unwrap_or_default());
        Ok(created)
    }

    pub async fn latest(&self) -> Result<Vec<Value>, ReviewError> {
        let rows = self
            .supabase
            .select(
                &Query::table(WEB_REVIEWS_TABLE)
                    .order("createdAt", Order::Desc)
                    .limit(LATEST_WEB_REVIEWS),
            )
            .await?;
        Ok(rows)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ReviewError> {
        let deleted = self
            .supabase
            .delete(&Query::table(WEB_REVIEWS_TABLE).eq("id", id))
            .await?;
        if deleted.is_empty() {
            return Err(ReviewError::NotFound);
        }
        Ok(())
    }
}

fn web_review_row(request: CreateWebReviewRequest) -> Result<Value, ReviewError> {
    let mut errors = Vec::new();

    let user_type = match request.user_type.as_deref().filter(|t| !t.trim().is_empty()) {
        None => Some(ReviewerType::default()),
        Some(raw) => match raw.trim().parse::<ReviewerType>() {
            Ok(user_type) => Some(user_type),
            Err(err) => {
                errors.push(err.to_string());
                None
            }
        },
    };

    match request.rating {
        None => errors.push("Rating is required".to_string()),
        Some(rating) => check_rating(rating, &mut errors),
    }

    let review = request.review.as_deref().unwrap_or_default();
    if is_blank(Some(review)) {
        errors.push("Review text is required".to_string());
    } else {
        check_length(review, "Review cannot exceed 500 characters", &mut errors);
    }

    let email = request
        .email
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .map(normalize_email)
        .unwrap_or_else(|| GUEST_EMAIL.to_string());

    match user_type {
        Some(user_type) if errors.is_empty() => {
            let now = Utc::now().to_rfc3339();
            Ok(json!({
                "id": Uuid::new_v4().to_string(),
                "email": email,
                "userType": user_type,
                "rating": request.rating,
                "review": review.trim(),
                "createdAt": now,
                "updatedAt": now
            }))
        }
        _ => Err(ReviewError::Invalid(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_anonymous_review_defaults_to_guest() {
        let row = web_review_row(CreateWebReviewRequest {
            rating: Some(5.0),
            review: Some("Easy to book".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(row["email"], GUEST_EMAIL);
        assert_eq!(row["userType"], "Guest");
    }

    #[test]
    fn test_signed_in_reviewer_kept() {
        let row = web_review_row(CreateWebReviewRequest {
            email: Some("Asha@Example.com".to_string()),
            user_type: Some("User".to_string()),
            rating: Some(4.0),
            review: Some("Good".to_string()),
        })
        .unwrap();

        assert_eq!(row["email"], "asha@example.com");
        assert_eq!(row["userType"], "User");
    }

    #[test]
    fn test_missing_rating_and_text() {
        assert_matches!(
            web_review_row(CreateWebReviewRequest::default()),
            Err(ReviewError::Invalid(errors)) if errors == vec!["Rating is required", "Review text is required"]
        );
    }

    #[test]
    fn test_overlong_review() {
        let result = web_review_row(CreateWebReviewRequest {
            rating: Some(3.0),
            review: Some("x".repeat(501)),
            ..Default::default()
        });
        assert_matches!(
            result,
            Err(ReviewError::Invalid(errors)) if errors == vec!["Review cannot exceed 500 characters"]
        );
    }
}
