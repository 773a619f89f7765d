use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{Query, SupabaseClient};
use shared_models::auth::{AccountRole, TokenIdentity};
use shared_utils::jwt::issue_token;
use shared_utils::projection::pick;
use shared_utils::validation::is_blank;

use crate::models::{AuthError, ConsultantLoginRequest, Session, CONSULTANT_PROFILE_FIELDS};
use crate::services::patient::check_password;

const DOCTORS_TABLE: &str = "doctors";

/// Login for doctors by the user id their organization assigned.
pub struct ConsultantAuthService<'a> {
    config: &'a AppConfig,
    supabase: SupabaseClient,
}

impl<'a> ConsultantAuthService<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn login(&self, request: ConsultantLoginRequest) -> Result<Session, AuthError> {
        if is_blank(request.user_id.as_deref()) {
            return Err(AuthError::MissingUserId);
        }

        let user_id = request.user_id.as_deref().unwrap_or_default().trim();
        debug!("Consultant login attempt for {}", user_id);

        let doctor: Option<Value> = self
            .supabase
            .select_one(Query::table(DOCTORS_TABLE).eq("userId", user_id))
            .await?;

        let doctor = doctor.ok_or(AuthError::UserIdNotFound)?;
        check_password(request.password.as_deref().unwrap_or_default(), &doctor)?;

        let identity = TokenIdentity {
            id: doctor["id"].as_str().unwrap_or_default().to_string(),
            role: AccountRole::Doctor,
            email: doctor["email"].as_str().map(String::from),
        };
        let token = issue_token(&identity, &self.config.jwt_secret).map_err(AuthError::Internal)?;

        let mut profile = pick(&doctor, &CONSULTANT_PROFILE_FIELDS);
        if let Some(obj) = profile.as_object_mut() {
            obj.insert("role".to_string(), Value::String(AccountRole::Doctor.to_string()));
        }

        Ok(Session {
            token,
            account: profile,
        })
    }
}
