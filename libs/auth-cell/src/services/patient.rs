use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::cloudinary::CloudinaryClient;
use shared_database::{Condition, Query, SupabaseClient};
use shared_models::auth::{AccountRole, TokenIdentity};
use shared_utils::jwt::issue_token;
use shared_utils::password::{hash_password, password_matches, without_password};
use shared_utils::validation::{is_blank, is_valid_email, normalize_email, parse_date};

use crate::models::{
    AuthError, LoginRequest, PatientSignupRequest, Session, GENDERS, MIN_PASSWORD_LEN,
};

const USERS_TABLE: &str = "users";
const IMAGE_FOLDER: &str = "user_images";

pub struct PatientAuthService<'a> {
    config: &'a AppConfig,
    supabase: SupabaseClient,
}

impl<'a> PatientAuthService<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn signup(&self, request: PatientSignupRequest) -> Result<Session, AuthError> {
        validate_signup(&request)?;

        let email = normalize_email(request.email.as_deref().unwrap_or_default());
        let phone = request.phone.clone().unwrap_or_default().trim().to_string();
        debug!("Registering patient {}", email);

        let existing: Option<Value> = self
            .supabase
            .select_one(
                Query::table(USERS_TABLE)
                    .select("id")
                    .any_of(&[Condition::eq("email", &email), Condition::eq("phone", &phone)]),
            )
            .await?;

        if existing.is_some() {
            return Err(AuthError::UserExists);
        }

        let image = match request.image.as_deref().filter(|i| !i.trim().is_empty()) {
            Some(data_uri) => {
                let cloudinary = CloudinaryClient::new(self.config)?;
                cloudinary.upload(data_uri, IMAGE_FOLDER).await?.secure_url
            }
            None => String::new(),
        };

        let password = request.password.as_deref().unwrap_or_default();
        let hashed = hash_password(password).map_err(|e| AuthError::Internal(e.to_string()))?;

        let now = Utc::now().to_rfc3339();
        let row = json!({
            "id": Uuid::new_v4().to_string(),
            "firstName": request.first_name.as_deref().map(str::trim),
            "lastName": request.last_name.as_deref().map(str::trim),
            "email": email,
            "phone": phone,
            "password": hashed,
            "dateOfBirth": request.date_of_birth,
            "gender": request.gender,
            "address": request.address.unwrap_or_default(),
            "notificationPreferences": request.notification_preferences.unwrap_or_default(),
            "image": image,
            "isVerified": false,
            "createdAt": now,
            "updatedAt": now
        });

        let created = self.supabase.insert(USERS_TABLE, row).await?;
        let session = self.open_session(created)?;

        info!("Patient registered: {}", email);
        Ok(session)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<Session, AuthError> {
        if is_blank(request.email.as_deref()) || is_blank(request.password.as_deref()) {
            return Err(AuthError::MissingCredentials);
        }

        let email = normalize_email(request.email.as_deref().unwrap_or_default());
        let password = request.password.as_deref().unwrap_or_default();

        let user: Option<Value> = self
            .supabase
            .select_one(Query::table(USERS_TABLE).eq("email", &email))
            .await?;

        let user = user.ok_or(AuthError::InvalidCredentials)?;
        check_password(password, &user)?;

        debug!("Patient logged in: {}", email);
        self.open_session(user)
    }

    fn open_session(&self, account: Value) -> Result<Session, AuthError> {
        let identity = TokenIdentity {
            id: account["id"].as_str().unwrap_or_default().to_string(),
            role: AccountRole::Patient,
            email: account["email"].as_str().map(String::from),
        };

        let token = issue_token(&identity, &self.config.jwt_secret).map_err(AuthError::Internal)?;

        Ok(Session {
            token,
            account: without_password(account),
        })
    }
}

/// Verifies `password` against the row's stored hash.
pub(crate) fn check_password(password: &str, account: &Value) -> Result<(), AuthError> {
    if password_matches(password, account) {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

fn validate_signup(request: &PatientSignupRequest) -> Result<(), AuthError> {
    let required = [
        ("firstName", request.first_name.as_deref()),
        ("lastName", request.last_name.as_deref()),
        ("email", request.email.as_deref()),
        ("phone", request.phone.as_deref()),
        ("password", request.password.as_deref()),
        ("dateOfBirth", request.date_of_birth.as_deref()),
        ("gender", request.gender.as_deref()),
    ];

    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| is_blank(*value))
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        return Err(AuthError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    if !is_valid_email(&normalize_email(request.email.as_deref().unwrap_or_default())) {
        return Err(AuthError::Validation("Please provide a valid email".to_string()));
    }

    if request.password.as_deref().unwrap_or_default().chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if parse_date(request.date_of_birth.as_deref().unwrap_or_default()).is_none() {
        return Err(AuthError::Validation("Invalid date of birth".to_string()));
    }

    let gender = request.gender.as_deref().unwrap_or_default();
    if !GENDERS.contains(&gender) {
        return Err(AuthError::Validation(format!(
            "Gender must be one of: {}",
            GENDERS.join(", ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_request() -> PatientSignupRequest {
        PatientSignupRequest {
            first_name: Some("Asha".to_string()),
            last_name: Some("Rao".to_string()),
            email: Some("Asha@Example.com".to_string()),
            phone: Some("9876543210".to_string()),
            password: Some("supersecret".to_string()),
            date_of_birth: Some("1990-01-01".to_string()),
            gender: Some("Female".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_signup_passes() {
        assert!(validate_signup(&valid_request()).is_ok());
    }

    #[test]
    fn test_missing_fields_are_listed() {
        let request = PatientSignupRequest {
            phone: None,
            gender: Some(" ".to_string()),
            ..valid_request()
        };
        assert_matches!(
            validate_signup(&request),
            Err(AuthError::Validation(msg)) if msg == "Missing required fields: phone, gender"
        );
    }

    #[test]
    fn test_short_password_rejected() {
        let request = PatientSignupRequest {
            password: Some("short".to_string()),
            ..valid_request()
        };
        assert_matches!(validate_signup(&request), Err(AuthError::Validation(_)));
    }

    #[test]
    fn test_unknown_gender_rejected() {
        let request = PatientSignupRequest {
            gender: Some("female".to_string()),
            ..valid_request()
        };
        assert_matches!(validate_signup(&request), Err(AuthError::Validation(_)));
    }

    #[test]
    fn test_check_password_treats_bad_hash_as_mismatch() {
        let row = serde_json::json!({"password": "plaintext"});
        assert_matches!(check_password("plaintext", &row), Err(AuthError::InvalidCredentials));
    }
}
