use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::cloudinary::CloudinaryClient;
use shared_database::{Query, SupabaseClient};
use shared_models::auth::TokenIdentity;
use shared_utils::geo::{number_value, validate_coordinates};
use shared_utils::jwt::issue_token;
use shared_utils::password::{hash_password, password_matches, without_password};
use shared_utils::validation::{is_blank, normalize_email};

use crate::models::{
    LoginRequest, OrganizationError, OrganizationKind, OrganizationSession, RegisteredOrganization,
    Registration, RegistrationRequest,
};

/// Registration and login for hospital and clinic accounts.
pub struct OrganizationAccountService<'a> {
    config: &'a AppConfig,
    supabase: SupabaseClient,
    kind: OrganizationKind,
}

impl<'a> OrganizationAccountService<'a> {
    pub fn new(config: &'a AppConfig, kind: OrganizationKind) -> Self {
        Self {
            config,
            supabase: SupabaseClient::new(config),
            kind,
        }
    }

    pub async fn register(&self, request: RegistrationRequest) -> Result<Registration, OrganizationError> {
        if is_blank(request.name.as_deref())
            || is_blank(request.email.as_deref())
            || is_blank(request.password.as_deref())
        {
            return Err(OrganizationError::MissingFields);
        }

        let email = normalize_email(request.email.as_deref().unwrap_or_default());
        debug!("Registering {} {}", self.kind.label(), email);

        let existing: Option<Value> = self
            .supabase
            .select_one(Query::table(self.kind.table()).select("id").eq("email", &email))
            .await?;

        if existing.is_some() {
            return Err(OrganizationError::AlreadyRegistered(self.kind.label()));
        }

        let (latitude, longitude) = parse_location(request.latitude.as_ref(), request.longitude.as_ref())?;
        validate_profile(&request)?;

        let image = match request.image.as_deref().filter(|i| !i.trim().is_empty()) {
            Some(data_uri) => {
                let cloudinary = CloudinaryClient::new(self.config)?;
                cloudinary.upload(data_uri, self.kind.image_folder()).await?.secure_url
            }
            None => String::new(),
        };

        let password = request.password.as_deref().unwrap_or_default();
        let hashed = hash_password(password).map_err(|e| OrganizationError::Internal(e.to_string()))?;

        let name = request.name.as_deref().unwrap_or_default().trim().to_string();
        let now = Utc::now().to_rfc3339();
        let mut row = json!({
            "id": Uuid::new_v4().to_string(),
            "email": email,
            "password": hashed,
            "phone": request.phone.as_deref().map(str::trim),
            "alternatePhone": request.alternate_phone,
            "state": request.state.as_deref().map(str::trim),
            "city": request.city.as_deref().map(str::trim),
            "pincode": request.pincode.as_deref().map(str::trim),
            "address": request.address.as_deref().map(str::trim),
            "description": request.description.as_deref().map(str::trim),
            "establishedYear": request.established_year.map(|y| y as i64),
            "website": request.website,
            "image": image,
            "latitude": latitude,
            "longitude": longitude,
            "createdAt": now,
            "updatedAt": now
        });
        row[self.kind.name_field()] = json!(name);

        let created = self.supabase.insert(self.kind.table(), row).await?;
        let id = created["id"].as_str().unwrap_or_default().to_string();

        let token = self.issue(&id, &email)?;
        info!("{} registered: {}", self.kind.label(), email);

        Ok(Registration {
            token,
            organization: RegisteredOrganization {
                id,
                name,
                email,
                image: created["image"].as_str().unwrap_or_default().to_string(),
            },
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<OrganizationSession, OrganizationError> {
        let email = normalize_email(request.email.as_deref().unwrap_or_default());
        let password = request.password.as_deref().unwrap_or_default();

        if email.is_empty() || password.is_empty() {
            return Err(OrganizationError::InvalidCredentials);
        }

        let account: Option<Value> = self
            .supabase
            .select_one(Query::table(self.kind.table()).eq("email", &email))
            .await?;

        let account = account.ok_or(OrganizationError::InvalidCredentials)?;
        if !password_matches(password, &account) {
            return Err(OrganizationError::InvalidCredentials);
        }

        let id = account["id"].as_str().unwrap_or_default().to_string();
        let token = self.issue(&id, &email)?;

        let mut profile = without_password(account);
        profile["role"] = json!(self.kind.role().to_string());

        debug!("{} logged in: {}", self.kind.label(), email);
        Ok(OrganizationSession { token, profile })
    }

    fn issue(&self, id: &str, email: &str) -> Result<String, OrganizationError> {
        let identity = TokenIdentity {
            id: id.to_string(),
            role: self.kind.role(),
            email: Some(email.to_string()),
        };
        issue_token(&identity, &self.config.jwt_secret).map_err(OrganizationError::Internal)
    }
}

/// Both coordinates must be present and numeric (numbers or numeric strings).
fn parse_location(latitude: Option<&Value>, longitude: Option<&Value>) -> Result<(f64, f64), OrganizationError> {
    let lat = latitude.and_then(number_value).ok_or(OrganizationError::InvalidCoordinates)?;
    let lng = longitude.and_then(number_value).ok_or(OrganizationError::InvalidCoordinates)?;

    if !validate_coordinates(lat, lng) {
        return Err(OrganizationError::Validation(
            "Latitude must be between -90 and 90 and longitude between -180 and 180".to_string(),
        ));
    }

    Ok((lat, lng))
}

fn validate_profile(request: &RegistrationRequest) -> Result<(), OrganizationError> {
    let required = [
        ("phone", request.phone.as_deref()),
        ("state", request.state.as_deref()),
        ("city", request.city.as_deref()),
        ("pincode", request.pincode.as_deref()),
        ("address", request.address.as_deref()),
        ("description", request.description.as_deref()),
    ];

    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| is_blank(*value))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(OrganizationError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}
