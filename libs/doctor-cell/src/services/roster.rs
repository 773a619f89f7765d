use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::cloudinary::{public_id_from_url, CloudinaryClient};
use shared_database::{Order, Query, SupabaseClient};
use shared_models::schedule::ORGANIZATION_TYPES;
use shared_utils::geo::{number_value, validate_coordinates};
use shared_utils::password::{hash_password, without_password};
use shared_utils::projection::pick;
use shared_utils::validation::{is_blank, is_valid_phone, is_valid_time, normalize_email};

use crate::models::{
    AddDoctorRequest, DoctorError, ADDED_DOCTOR_FIELDS, DEGREES, DESCRIPTION_LEN, IMAGE_FOLDER,
    MAX_EXPERIENCE_YEARS, MIN_PASSWORD_LEN, MIN_USER_ID_LEN, SPECIALTIES, STATUSES, WEEKDAYS,
};

const DOCTORS_TABLE: &str = "doctors";

/// Doctors as managed by the organization that employs them.
pub struct DoctorRosterService<'a> {
    config: &'a AppConfig,
    supabase: SupabaseClient,
}

impl<'a> DoctorRosterService<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn add(&self, request: AddDoctorRequest) -> Result<Value, DoctorError> {
        check_required(&request)?;

        let data_uri = request
            .profile_image
            .as_deref()
            .filter(|i| !i.trim().is_empty())
            .ok_or(DoctorError::MissingImage)?;

        let password = match (request.password.as_deref(), request.confirm_password.as_deref()) {
            (Some(p), Some(c)) if !p.is_empty() && !c.is_empty() => {
                if p != c {
                    return Err(DoctorError::PasswordMismatch);
                }
                p
            }
            _ => return Err(DoctorError::MissingPassword),
        };

        let (latitude, longitude) = check_schema(&request, password)?;

        let user_id = request.user_id.as_deref().unwrap_or_default().trim();
        let taken: Option<Value> = self
            .supabase
            .select_one(Query::table(DOCTORS_TABLE).select("id").eq("userId", user_id))
            .await?;
        if taken.is_some() {
            return Err(DoctorError::UserIdTaken);
        }

        debug!("Adding doctor {} to {:?}", user_id, request.organization_name);

        let cloudinary = CloudinaryClient::new(self.config)?;
        let image = cloudinary.upload(data_uri, IMAGE_FOLDER).await?;

        let hashed = hash_password(password).map_err(|e| DoctorError::Internal(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        let row = json!({
            "id": Uuid::new_v4().to_string(),
            "name": trimmed(&request.name),
            "email": normalize_email(request.email.as_deref().unwrap_or_default()),
            "phone": trimmed(&request.phone),
            "alternatePhone": request.alternate_phone.as_deref().map(str::trim).filter(|p| !p.is_empty()),
            "organizationId": trimmed(&request.organization_id),
            "organizationType": trimmed(&request.organization_type),
            "organizationName": trimmed(&request.organization_name),
            "organizationEmail": normalize_email(request.organization_email.as_deref().unwrap_or_default()),
            "state": trimmed(&request.state),
            "city": trimmed(&request.city),
            "address": trimmed(&request.address),
            "latitude": latitude,
            "longitude": longitude,
            "degrees": request.degrees,
            "experience": request.experience,
            "specialties": request.specialties,
            "consultationFees": request.consultation_fees,
            "availableDays": request.available_days,
            "timeSlots": request.time_slots,
            "userId": user_id,
            "password": hashed,
            "description": trimmed(&request.description),
            "status": request.status.as_deref().unwrap_or("active"),
            "profileImage": image.secure_url,
            "createdAt": now,
            "updatedAt": now
        });

        let created = self.supabase.insert(DOCTORS_TABLE, row).await?;
        info!("Doctor added: {}", user_id);

        Ok(pick(&created, &ADDED_DOCTOR_FIELDS))
    }

    pub async fn for_organization(&self, organization_id: &str) -> Result<Vec<Value>, DoctorError> {
        let rows: Vec<Value> = self
            .supabase
            .select(
                &Query::table(DOCTORS_TABLE)
                    .eq("organizationId", organization_id)
                    .order("createdAt", Order::Asc),
            )
            .await?;

        Ok(rows.into_iter().map(without_password).collect())
    }

    /// Removes the doctor and, best effort, the hosted profile image.
    pub async fn delete(&self, id: &str) -> Result<(), DoctorError> {
        let query = Query::table(DOCTORS_TABLE).eq("id", id);
        let doctor: Option<Value> = self.supabase.select_one(query.clone()).await?;
        let doctor = doctor.ok_or(DoctorError::NotFound)?;

        if let Some(url) = doctor["profileImage"].as_str().filter(|u| !u.is_empty()) {
            self.delete_image(url).await;
        }

        self.supabase.delete(&query).await?;
        info!("Doctor deleted: {}", id);
        Ok(())
    }

    async fn delete_image(&self, url: &str) {
        let Some(public_id) = public_id_from_url(url, IMAGE_FOLDER) else {
            warn!("Could not derive image id from {}", url);
            return;
        };

        let result = match CloudinaryClient::new(self.config) {
            Ok(cloudinary) => cloudinary.destroy(&public_id).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            warn!("Failed to delete image {}: {}", public_id, e);
        }
    }
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim)
}

fn check_required(request: &AddDoctorRequest) -> Result<(), DoctorError> {
    fn list_missing(list: &Option<Vec<String>>) -> bool {
        list.as_ref().map_or(true, |items| items.is_empty())
    }

    let missing: Vec<&'static str> = [
        ("name", is_blank(request.name.as_deref())),
        ("email", is_blank(request.email.as_deref())),
        ("phone", is_blank(request.phone.as_deref())),
        ("organizationId", is_blank(request.organization_id.as_deref())),
        ("organizationType", is_blank(request.organization_type.as_deref())),
        ("organizationName", is_blank(request.organization_name.as_deref())),
        ("organizationEmail", is_blank(request.organization_email.as_deref())),
        ("state", is_blank(request.state.as_deref())),
        ("city", is_blank(request.city.as_deref())),
        ("address", is_blank(request.address.as_deref())),
        ("latitude", request.latitude.as_ref().map_or(true, Value::is_null)),
        ("longitude", request.longitude.as_ref().map_or(true, Value::is_null)),
        ("degrees", list_missing(&request.degrees)),
        ("experience", request.experience.is_none()),
        ("specialties", list_missing(&request.specialties)),
        ("consultationFees", request.consultation_fees.is_none()),
        ("availableDays", list_missing(&request.available_days)),
        ("timeSlots", request.time_slots.is_none()),
        ("userId", is_blank(request.user_id.as_deref())),
        ("description", is_blank(request.description.as_deref())),
    ]
    .into_iter()
    .filter(|(_, missing)| *missing)
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DoctorError::MissingFields(missing))
    }
}

/// Field constraints of the doctor record. Returns the parsed coordinates.
fn check_schema(request: &AddDoctorRequest, password: &str) -> Result<(f64, f64), DoctorError> {
    let mut errors = Vec::new();

    let latitude = request.latitude.as_ref().and_then(number_value);
    let longitude = request.longitude.as_ref().and_then(number_value);
    let coordinates = match (latitude, longitude) {
        (Some(lat), Some(lng)) if validate_coordinates(lat, lng) => Some((lat, lng)),
        _ => {
            errors.push("Latitude must be between -90 and 90 and longitude between -180 and 180".to_string());
            None
        }
    };

    let organization_type = request.organization_type.as_deref().unwrap_or_default();
    if !ORGANIZATION_TYPES.contains(&organization_type) {
        errors.push(format!("Organization type must be one of: {}", ORGANIZATION_TYPES.join(", ")));
    }

    if !is_valid_phone(request.phone.as_deref().unwrap_or_default().trim()) {
        errors.push("Phone number must be 10 digits".to_string());
    }
    if let Some(alternate) = request.alternate_phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        if !is_valid_phone(alternate) {
            errors.push("Alternate phone number must be 10 digits".to_string());
        }
    }

    check_members("degree", request.degrees.as_deref(), &DEGREES, &mut errors);
    check_members("specialty", request.specialties.as_deref(), &SPECIALTIES, &mut errors);
    check_members("available day", request.available_days.as_deref(), &WEEKDAYS, &mut errors);

    if let Some(experience) = request.experience {
        if !(0.0..=MAX_EXPERIENCE_YEARS).contains(&experience) {
            errors.push(format!("Experience must be between 0 and {} years", MAX_EXPERIENCE_YEARS));
        }
    }

    if request.consultation_fees.is_some_and(|fees| fees < 0.0) {
        errors.push("Consultation fees cannot be negative".to_string());
    }

    let description_len = request.description.as_deref().unwrap_or_default().trim().chars().count();
    let (min_len, max_len) = DESCRIPTION_LEN;
    if description_len < min_len || description_len > max_len {
        errors.push(format!("Description must be between {} and {} characters", min_len, max_len));
    }

    if let Some(slot) = &request.time_slots {
        if !is_valid_time(&slot.start) {
            errors.push("Start time must be in HH:mm format".to_string());
        }
        if !is_valid_time(&slot.end) {
            errors.push("End time must be in HH:mm format".to_string());
        }
    }

    if request.user_id.as_deref().unwrap_or_default().trim().chars().count() < MIN_USER_ID_LEN {
        errors.push(format!("User ID must be at least {} characters", MIN_USER_ID_LEN));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(format!("Password must be at least {} characters", MIN_PASSWORD_LEN));
    }

    if let Some(status) = request.status.as_deref() {
        if !STATUSES.contains(&status) {
            errors.push(format!("Status must be one of: {}", STATUSES.join(", ")));
        }
    }

    match coordinates {
        Some(coordinates) if errors.is_empty() => Ok(coordinates),
        _ => Err(DoctorError::InvalidFields(errors)),
    }
}

fn check_members(label: &str, values: Option<&[String]>, allowed: &[&str], errors: &mut Vec<String>) {
    for value in values.unwrap_or_default() {
        if !allowed.contains(&value.as_str()) {
            errors.push(format!("Invalid {}: {}", label, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_models::schedule::TimeSlot;

    fn strings(items: &[&str]) -> Option<Vec<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    fn valid_request() -> AddDoctorRequest {
        AddDoctorRequest {
            name: Some("Dr. Meera Shah".to_string()),
            email: Some("Meera@Hospital.org".to_string()),
            phone: Some("9876543212".to_string()),
            organization_id: Some("org-1".to_string()),
            organization_type: Some("Hospital".to_string()),
            organization_name: Some("City Hospital".to_string()),
            organization_email: Some("city@hospital.org".to_string()),
            state: Some("Maharashtra".to_string()),
            city: Some("Pune".to_string()),
            address: Some("1 Main Road".to_string()),
            latitude: Some(json!("18.5204")),
            longitude: Some(json!(73.8567)),
            degrees: strings(&["MBBS", "MD"]),
            experience: Some(12.0),
            specialties: strings(&["Cardiology"]),
            consultation_fees: Some(800.0),
            available_days: strings(&["Monday", "Wednesday"]),
            time_slots: Some(TimeSlot {
                start: "09:00".to_string(),
                end: "13:00".to_string(),
            }),
            user_id: Some("meera01".to_string()),
            description: Some("Interventional cardiologist".to_string()),
            profile_image: Some("data:image/png;base64,aGVsbG8=".to_string()),
            password: Some("secret12".to_string()),
            confirm_password: Some("secret12".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_request_passes_checks() {
        let request = valid_request();
        assert!(check_required(&request).is_ok());
        assert_eq!(check_schema(&request, "secret12").unwrap(), (18.5204, 73.8567));
    }

    #[test]
    fn test_zero_experience_is_present() {
        let request = AddDoctorRequest {
            experience: Some(0.0),
            ..valid_request()
        };
        assert!(check_required(&request).is_ok());
    }

    #[test]
    fn test_required_fields_listed_in_order() {
        let request = AddDoctorRequest {
            name: None,
            specialties: Some(vec![]),
            user_id: Some("  ".to_string()),
            ..valid_request()
        };
        assert_matches!(
            check_required(&request),
            Err(DoctorError::MissingFields(fields)) if fields == vec!["name", "specialties", "userId"]
        );
    }

    #[test]
    fn test_schema_collects_every_violation() {
        let request = AddDoctorRequest {
            degrees: strings(&["MBBS", "Witchcraft"]),
            experience: Some(51.0),
            phone: Some("12345".to_string()),
            time_slots: Some(TimeSlot {
                start: "9:00".to_string(),
                end: "13:00".to_string(),
            }),
            status: Some("retired".to_string()),
            ..valid_request()
        };

        let errors = match check_schema(&request, "secret12") {
            Err(DoctorError::InvalidFields(errors)) => errors,
            other => panic!("expected InvalidFields, got {:?}", other),
        };

        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&"Invalid degree: Witchcraft".to_string()));
        assert!(errors.contains(&"Start time must be in HH:mm format".to_string()));
    }

    #[test]
    fn test_schema_rejects_short_user_id_and_password() {
        let request = AddDoctorRequest {
            user_id: Some("abc".to_string()),
            ..valid_request()
        };
        assert_matches!(
            check_schema(&request, "12345"),
            Err(DoctorError::InvalidFields(errors)) if errors.len() == 2
        );
    }

    #[test]
    fn test_schema_rejects_out_of_range_coordinates() {
        let request = AddDoctorRequest {
            latitude: Some(json!(123.0)),
            ..valid_request()
        };
        assert_matches!(check_schema(&request, "secret12"), Err(DoctorError::InvalidFields(_)));
    }
}
