use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{Order, Query, SupabaseClient};
use shared_utils::validation::{is_blank, normalize_email};

use crate::models::{
    check_length, check_rating, CreateReviewRequest, ReviewError, ReviewSubject, ReviewerType,
    UpdateReviewRequest,
};

const REVIEWS_TABLE: &str = "reviews";
const TEXT_TOO_LONG: &str = "Review text cannot exceed 500 characters";

/// Reviews of hospitals, clinics and doctors.
pub struct ReviewService {
    supabase: SupabaseClient,
}

impl ReviewService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create(&self, request: CreateReviewRequest) -> Result<Value, ReviewError> {
        let row = review_row(request)?;
        let created = self.supabase.insert(REVIEWS_TABLE, row).await?;
        info!(
            "Review stored for {} {}",
            created["entityType"].as_str().unwrap_or_default(),
            created["entityEmail"].as_str().unwrap_or_default()
        );
        Ok(created)
    }

    /// Reviews of one hospital or clinic; an empty result is an error.
    pub async fn for_subject(&self, subject: ReviewSubject, email: &str) -> Result<Vec<Value>, ReviewError> {
        let reviews = self.for_entity(subject, email).await?;
        if reviews.is_empty() {
            return Err(ReviewError::NoReviews(subject.noun()));
        }
        Ok(reviews)
    }

    pub async fn for_entity(&self, subject: ReviewSubject, email: &str) -> Result<Vec<Value>, ReviewError> {
        debug!("Loading reviews for {} {}", subject, email);
        self.list(
            Query::table(REVIEWS_TABLE)
                .eq("entityEmail", normalize_email(email))
                .eq("entityType", subject),
        )
        .await
    }

    pub async fn all(&self) -> Result<Vec<Value>, ReviewError> {
        self.list(Query::table(REVIEWS_TABLE)).await
    }

    pub async fn update(&self, id: &str, request: UpdateReviewRequest) -> Result<Value, ReviewError> {
        let changes = review_changes(request)?;
        let updated = self
            .supabase
            .update(&Query::table(REVIEWS_TABLE).eq("id", id), changes)
            .await?;

        updated.into_iter().next().ok_or(ReviewError::NotFound)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ReviewError> {
        let deleted = self.supabase.delete(&Query::table(REVIEWS_TABLE).eq("id", id)).await?;
        if deleted.is_empty() {
            return Err(ReviewError::NotFound);
        }
        info!("Review deleted: {}", id);
        Ok(())
    }

    async fn list(&self, query: Query) -> Result<Vec<Value>, ReviewError> {
        let rows = self.supabase.select(&query.order("createdAt", Order::Desc)).await?;
        Ok(rows)
    }
}

fn review_row(request: CreateReviewRequest) -> Result<Value, ReviewError> {
    let rating = request.rating.filter(|r| *r != 0.0);
    let (reviewer_email, user_type, entity_type, entity_email, rating, text) = match (
        request.reviewer_email.as_deref(),
        request.user_type.as_deref(),
        request.entity_type.as_deref(),
        request.entity_email.as_deref(),
        rating,
        request.text.as_deref(),
    ) {
        (Some(r), Some(u), Some(t), Some(e), Some(rating), Some(text))
            if ![r, u, t, e, text].iter().any(|v| is_blank(Some(*v))) =>
        {
            (r, u, t, e, rating, text)
        }
        _ => return Err(ReviewError::MissingFields),
    };

    let mut errors = Vec::new();
    let user_type = collect(user_type.trim().parse::<ReviewerType>(), &mut errors);
    let entity_type = collect(entity_type.trim().parse::<ReviewSubject>(), &mut errors);
    check_rating(rating, &mut errors);
    check_length(text, TEXT_TOO_LONG, &mut errors);

    let (Some(user_type), Some(entity_type)) = (user_type, entity_type) else {
        return Err(ReviewError::Invalid(errors));
    };
    if !errors.is_empty() {
        return Err(ReviewError::Invalid(errors));
    }

    let now = Utc::now().to_rfc3339();
    Ok(json!({
        "id": Uuid::new_v4().to_string(),
        "reviewerEmail": normalize_email(reviewer_email),
        "userType": user_type,
        "entityType": entity_type,
        "entityEmail": normalize_email(entity_email),
        "rating": rating,
        "text": text.trim(),
        "recommended": request.recommended.unwrap_or(false),
        "createdAt": now,
        "updatedAt": now
    }))
}

fn review_changes(request: UpdateReviewRequest) -> Result<Value, ReviewError> {
    let mut errors = Vec::new();
    let mut changes = Map::new();

    if let Some(rating) = request.rating {
        check_rating(rating, &mut errors);
        changes.insert("rating".to_string(), json!(rating));
    }
    if let Some(text) = request.text.as_deref() {
        check_length(text, TEXT_TOO_LONG, &mut errors);
        changes.insert("text".to_string(), json!(text.trim()));
    }
    if let Some(recommended) = request.recommended {
        changes.insert("recommended".to_string(), json!(recommended));
    }
    if let Some(raw) = request.user_type.as_deref() {
        if let Some(user_type) = collect(raw.trim().parse::<ReviewerType>(), &mut errors) {
            changes.insert("userType".to_string(), json!(user_type));
        }
    }

    if !errors.is_empty() {
        return Err(ReviewError::Invalid(errors));
    }
    changes.insert("updatedAt".to_string(), json!(Utc::now().to_rfc3339()));
    Ok(Value::Object(changes))
}

fn collect<T>(parsed: Result<T, ReviewError>, errors: &mut Vec<String>) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(ReviewError::Invalid(messages)) => {
            errors.extend(messages);
            None
        }
        Err(other) => {
            errors.push(other.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request() -> CreateReviewRequest {
        CreateReviewRequest {
            reviewer_email: Some(" Asha@Example.com ".to_string()),
            user_type: Some("User".to_string()),
            entity_type: Some("Hospital".to_string()),
            entity_email: Some("City@Hospital.org".to_string()),
            rating: Some(4.0),
            text: Some("  Helpful staff ".to_string()),
            recommended: None,
        }
    }

    #[test]
    fn test_review_row_normalizes_fields() {
        let row = review_row(request()).unwrap();
        assert_eq!(row["reviewerEmail"], "asha@example.com");
        assert_eq!(row["entityEmail"], "city@hospital.org");
        assert_eq!(row["entityType"], "Hospital");
        assert_eq!(row["text"], "Helpful staff");
        assert_eq!(row["recommended"], false);
    }

    #[test]
    fn test_zero_rating_counts_as_missing() {
        let req = CreateReviewRequest { rating: Some(0.0), ..request() };
        assert_matches!(review_row(req), Err(ReviewError::MissingFields));

        let req = CreateReviewRequest { text: Some("  ".to_string()), ..request() };
        assert_matches!(review_row(req), Err(ReviewError::MissingFields));
    }

    #[test]
    fn test_schema_violations_reported_together() {
        let req = CreateReviewRequest {
            entity_type: Some("Pharmacy".to_string()),
            rating: Some(7.0),
            ..request()
        };
        assert_matches!(
            review_row(req),
            Err(ReviewError::Invalid(errors)) if errors == vec![
                "Pharmacy is not a valid entity type",
                "Rating must be between 1 and 5",
            ]
        );
    }

    #[test]
    fn test_changes_only_touch_given_fields() {
        let changes = review_changes(UpdateReviewRequest {
            recommended: Some(true),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(changes["recommended"], true);
        assert!(changes.get("rating").is_none());
        assert!(changes.get("updatedAt").is_some());
    }

    #[test]
    fn test_changes_validate_rating() {
        let result = review_changes(UpdateReviewRequest {
            rating: Some(9.0),
            ..Default::default()
        });
        assert_matches!(result, Err(ReviewError::Invalid(_)));
    }
}
