use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{AccountRole, TokenIdentity};

pub const TEST_CLOUD_NAME: &str = "test-cloud";

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_api_key: String,
    /// Base URL for the image host, registry and nutrition API.
    pub upstream_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_api_key: "test-service-key".to_string(),
            upstream_url: "http://localhost:54322".to_string(),
        }
    }
}

impl TestConfig {
    /// Points the store and every upstream service at one mock server.
    pub fn with_mock_server(uri: &str) -> Self {
        Self {
            supabase_url: uri.to_string(),
            upstream_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_api_key: self.supabase_api_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            cloudinary_cloud_name: TEST_CLOUD_NAME.to_string(),
            cloudinary_api_key: "test-cloudinary-key".to_string(),
            cloudinary_api_secret: "test-cloudinary-secret".to_string(),
            cloudinary_base_url: format!("{}/cloudinary", self.upstream_url),
            hospital_registry_url: format!("{}/resource/hospitals", self.upstream_url),
            hospital_api_key: "test-registry-key".to_string(),
            nutritionix_base_url: format!("{}/nutritionix/v2", self.upstream_url),
            nutritionix_app_id: "test-app-id".to_string(),
            nutritionix_api_key: "test-app-key".to_string(),
            port: 8000,
            cors_origins: vec!["http://localhost:5173".to_string()],
            production: false,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: AccountRole,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::patient("test@example.com")
    }
}

impl TestUser {
    pub fn new(email: &str, role: AccountRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, AccountRole::Patient)
    }

    pub fn hospital(email: &str) -> Self {
        Self::new(email, AccountRole::Hospital)
    }

    pub fn clinic(email: &str) -> Self {
        Self::new(email, AccountRole::Clinic)
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, AccountRole::Doctor)
    }

    pub fn to_identity(&self) -> TokenIdentity {
        TokenIdentity {
            id: self.id.clone(),
            role: self.role,
            email: Some(self.email.clone()),
        }
    }

    /// Stored account row for this user, in the shape its table holds.
    pub fn account_row(&self) -> Value {
        match self.role {
            AccountRole::Patient => MockStoreResponses::user_row(&self.id, &self.email),
            AccountRole::Hospital => MockStoreResponses::hospital_row(&self.id, &self.email),
            AccountRole::Clinic => MockStoreResponses::clinic_row(&self.id, &self.email),
            AccountRole::Doctor => {
                MockStoreResponses::doctor_row(&self.id, &self.email, "city@hospital.org")
            }
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned store rows in the camelCase column layout of each table.
pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn user_row(id: &str, email: &str) -> Value {
        json!({
            "id": id,
            "firstName": "Asha",
            "lastName": "Rao",
            "email": email,
            "phone": "9876543210",
            "password": "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g",
            "dateOfBirth": "1990-01-01",
            "gender": "Female",
            "address": {"city": "Pune", "state": "Maharashtra", "country": "India"},
            "image": "",
            "isVerified": false,
            "notificationPreferences": {"email": true, "sms": true, "whatsapp": false},
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        })
    }

    pub fn hospital_row(id: &str, email: &str) -> Value {
        json!({
            "id": id,
            "hospitalName": "City Hospital",
            "email": email,
            "password": "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g",
            "phone": "9876543210",
            "alternatePhone": null,
            "state": "Maharashtra",
            "city": "Pune",
            "pincode": "411001",
            "address": "1 Main Road",
            "establishedYear": 1990,
            "website": null,
            "description": "Multi-speciality hospital",
            "image": "https://res.cloudinary.com/test-cloud/image/upload/v1/hospitals/city.jpg",
            "latitude": 18.5204,
            "longitude": 73.8567,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        })
    }

    pub fn clinic_row(id: &str, email: &str) -> Value {
        json!({
            "id": id,
            "clinicName": "Care Clinic",
            "email": email,
            "password": "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g",
            "phone": "9876543211",
            "alternatePhone": null,
            "state": "Maharashtra",
            "city": "Pune",
            "pincode": "411002",
            "address": "2 Side Street",
            "establishedYear": 2005,
            "website": null,
            "description": "Family clinic",
            "image": "",
            "latitude": 18.53,
            "longitude": 73.85,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        })
    }

    pub fn doctor_row(id: &str, email: &str, organization_email: &str) -> Value {
        json!({
            "id": id,
            "name": "Dr. Meera Shah",
            "email": email,
            "phone": "9876543212",
            "alternatePhone": null,
            "organizationId": "org-1",
            "organizationType": "Hospital",
            "organizationName": "City Hospital",
            "organizationEmail": organization_email,
            "state": "Maharashtra",
            "city": "Pune",
            "address": "1 Main Road",
            "latitude": 18.5204,
            "longitude": 73.8567,
            "degrees": ["MBBS", "MD"],
            "experience": 12,
            "specialties": ["Cardiology"],
            "consultationFees": 800,
            "availableDays": ["Monday", "Wednesday"],
            "timeSlots": {"start": "09:00", "end": "13:00"},
            "profileImage": "https://res.cloudinary.com/test-cloud/image/upload/v1/doctors/meera.jpg",
            "userId": "meera01",
            "password": "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g",
            "description": "Interventional cardiologist",
            "status": "active",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(id: &str, status: &str, appointment_date: &str, created_at: &str) -> Value {
        json!({
            "id": id,
            "firstName": "Asha",
            "lastName": "Rao",
            "email": "asha@example.com",
            "phone": "9876543210",
            "dateOfBirth": "1990-01-01",
            "age": 34,
            "image": "",
            "organizationType": "Hospital",
            "organizationName": "City Hospital",
            "organizationEmail": "city@hospital.org",
            "doctorName": "Dr. Meera Shah",
            "doctorEmail": "meera@hospital.org",
            "fees": 800,
            "appointmentDate": appointment_date,
            "timeSlots": {"start": "10:00", "end": "10:30"},
            "status": status,
            "createdAt": created_at,
            "updatedAt": created_at
        })
    }

    pub fn review_row(id: &str, entity_type: &str, entity_email: &str) -> Value {
        json!({
            "id": id,
            "reviewerEmail": "asha@example.com",
            "userType": "User",
            "entityType": entity_type,
            "entityEmail": entity_email,
            "rating": 4,
            "text": "Helpful staff",
            "recommended": true,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "message": message,
            "code": code,
            "details": null,
            "hint": null
        })
    }
}
