use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{Order, Query, SupabaseClient};
use shared_models::schedule::{AppointmentStatus, ORGANIZATION_TYPES};
use shared_utils::validation::{capitalize_first, is_blank, is_valid_time, normalize_email, parse_date};

use crate::models::{
    AppointmentError, CreateAppointmentRequest, DoctorAppointmentsQuery, OrganizationAppointmentsQuery,
    StatusUpdateRequest,
};

const APPOINTMENTS_TABLE: &str = "appointments";

pub struct AppointmentService {
    supabase: SupabaseClient,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create(&self, request: CreateAppointmentRequest) -> Result<Value, AppointmentError> {
        let checked = validate_appointment(&request, Utc::now())?;
        let now = Utc::now().to_rfc3339();

        let row = json!({
            "id": Uuid::new_v4().to_string(),
            "firstName": trimmed(&request.first_name),
            "lastName": trimmed(&request.last_name),
            "email": normalize_email(request.email.as_deref().unwrap_or_default()),
            "phone": trimmed(&request.phone),
            "dateOfBirth": checked.date_of_birth.to_rfc3339(),
            "age": request.age,
            "image": request.image.unwrap_or_default(),
            "organizationType": trimmed(&request.organization_type),
            "organizationName": trimmed(&request.organization_name),
            "organizationEmail": normalize_email(request.organization_email.as_deref().unwrap_or_default()),
            "doctorName": trimmed(&request.doctor_name),
            "doctorEmail": normalize_email(request.doctor_email.as_deref().unwrap_or_default()),
            "fees": request.fees,
            "appointmentDate": checked.appointment_date.to_rfc3339(),
            "timeSlots": request.time_slots,
            "status": checked.status,
            "createdAt": now,
            "updatedAt": now
        });

        let created = self.supabase.insert(APPOINTMENTS_TABLE, row).await?;
        info!(
            "Appointment booked with {} on {}",
            created["doctorEmail"].as_str().unwrap_or_default(),
            checked.appointment_date
        );
        Ok(created)
    }

    pub async fn update_status(&self, id: &str, request: StatusUpdateRequest) -> Result<Value, AppointmentError> {
        let status = parse_status_update(request.status.as_deref())?;
        debug!("Setting appointment {} to {}", id, status);

        let updated = self
            .supabase
            .update(
                &Query::table(APPOINTMENTS_TABLE).eq("id", id),
                json!({ "status": status, "updatedAt": Utc::now().to_rfc3339() }),
            )
            .await?;

        updated.into_iter().next().ok_or(AppointmentError::NotFound)
    }

    /// A doctor's appointments at one organization, latest date first.
    pub async fn for_doctor(&self, query: DoctorAppointmentsQuery) -> Result<Vec<Value>, AppointmentError> {
        let (email, organization_email) = match (query.email.as_deref(), query.organization_email.as_deref()) {
            (Some(e), Some(o)) if !e.trim().is_empty() && !o.trim().is_empty() => {
                (normalize_email(e), normalize_email(o))
            }
            _ => {
                return Err(AppointmentError::MissingParameter(
                    "Email and organization email are required",
                ))
            }
        };

        self.list(
            Query::table(APPOINTMENTS_TABLE)
                .eq("doctorEmail", email)
                .eq("organizationEmail", organization_email),
        )
        .await
    }

    /// A patient's appointments, latest date first.
    pub async fn for_user(&self, email: &str) -> Result<Vec<Value>, AppointmentError> {
        self.list(Query::table(APPOINTMENTS_TABLE).eq("email", normalize_email(email)))
            .await
    }

    pub async fn for_organization(
        &self,
        query: OrganizationAppointmentsQuery,
    ) -> Result<Vec<Value>, AppointmentError> {
        let email = query
            .email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(AppointmentError::MissingParameter("Email is required"))?;

        self.list(Query::table(APPOINTMENTS_TABLE).eq("organizationEmail", normalize_email(email)))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Value, AppointmentError> {
        let row: Option<Value> = self
            .supabase
            .select_one(Query::table(APPOINTMENTS_TABLE).eq("id", id))
            .await?;
        row.ok_or(AppointmentError::NotFound)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppointmentError> {
        let deleted = self
            .supabase
            .delete(&Query::table(APPOINTMENTS_TABLE).eq("id", id))
            .await?;

        if deleted.is_empty() {
            return Err(AppointmentError::NotFound);
        }
        info!("Appointment deleted: {}", id);
        Ok(())
    }

    async fn list(&self, query: Query) -> Result<Vec<Value>, AppointmentError> {
        let rows = self
            .supabase
            .select(&query.order("appointmentDate", Order::Desc))
            .await?;
        Ok(rows)
    }
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim)
}

/// Parsed values of a booking that passed validation.
#[derive(Debug)]
struct CheckedAppointment {
    date_of_birth: DateTime<Utc>,
    appointment_date: DateTime<Utc>,
    status: AppointmentStatus,
}

fn validate_appointment(
    request: &CreateAppointmentRequest,
    now: DateTime<Utc>,
) -> Result<CheckedAppointment, AppointmentError> {
    let mut errors = Vec::new();

    let required_text = [
        ("First name", &request.first_name),
        ("Last name", &request.last_name),
        ("Email", &request.email),
        ("Phone number", &request.phone),
        ("Organization name", &request.organization_name),
        ("Organization email", &request.organization_email),
        ("Doctor name", &request.doctor_name),
        ("Doctor email", &request.doctor_email),
    ];
    for (label, value) in required_text {
        if is_blank(value.as_deref()) {
            errors.push(format!("{} is required", label));
        }
    }

    if request.age.is_none() {
        errors.push("Age is required".to_string());
    }
    if request.fees.is_none() {
        errors.push("Fees is required".to_string());
    }

    match request.organization_type.as_deref().map(str::trim) {
        None | Some("") => errors.push("Organization type is required".to_string()),
        Some(kind) if !ORGANIZATION_TYPES.contains(&kind) => {
            errors.push(format!("Organization type must be one of: {}", ORGANIZATION_TYPES.join(", ")))
        }
        Some(_) => {}
    }

    let date_of_birth = required_date(&request.date_of_birth, "Date of birth", &mut errors);

    let appointment_date = required_date(&request.appointment_date, "Appointment date", &mut errors);
    if appointment_date.is_some_and(|date| date <= now) {
        errors.push("Appointment date must be in the future".to_string());
    }

    match &request.time_slots {
        None => errors.push("Time slot is required".to_string()),
        Some(slot) => {
            if !is_valid_time(&slot.start) {
                errors.push("Start time must be in HH:mm format".to_string());
            }
            if !is_valid_time(&slot.end) {
                errors.push("End time must be in HH:mm format".to_string());
            }
        }
    }

    let status = match request.status.as_deref().filter(|s| !s.trim().is_empty()) {
        None => Some(AppointmentStatus::Pending),
        Some(raw) => {
            let parsed = capitalize_first(raw.trim()).parse::<AppointmentStatus>().ok();
            if parsed.is_none() {
                errors.push(format!("{} is not a valid status", raw));
            }
            parsed
        }
    };

    match (date_of_birth, appointment_date, status) {
        (Some(date_of_birth), Some(appointment_date), Some(status)) if errors.is_empty() => {
            Ok(CheckedAppointment {
                date_of_birth,
                appointment_date,
                status,
            })
        }
        _ => Err(AppointmentError::Invalid(errors)),
    }
}

fn required_date(value: &Option<String>, label: &str, errors: &mut Vec<String>) -> Option<DateTime<Utc>> {
    match value.as_deref().filter(|v| !v.trim().is_empty()) {
        None => {
            errors.push(format!("{} is required", label));
            None
        }
        Some(raw) => {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                errors.push(format!("{} is not a valid date", label));
            }
            parsed
        }
    }
}

/// First letter is upper-cased before matching, so `completed` is accepted.
fn parse_status_update(raw: Option<&str>) -> Result<AppointmentStatus, AppointmentError> {
    let status = capitalize_first(raw.unwrap_or_default().trim())
        .parse::<AppointmentStatus>()
        .map_err(|_| AppointmentError::InvalidStatus)?;

    if !status.is_provider_settable() {
        return Err(AppointmentError::InvalidStatus);
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;
    use shared_models::schedule::TimeSlot;

    fn booking(appointment_date: DateTime<Utc>) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            first_name: Some("Asha".to_string()),
            last_name: Some("Rao".to_string()),
            email: Some("Asha@Example.com".to_string()),
            phone: Some("9876543210".to_string()),
            date_of_birth: Some("1990-01-01".to_string()),
            age: Some(34.0),
            organization_type: Some("Hospital".to_string()),
            organization_name: Some("City Hospital".to_string()),
            organization_email: Some("city@hospital.org".to_string()),
            doctor_name: Some("Dr. Meera Shah".to_string()),
            doctor_email: Some("meera@hospital.org".to_string()),
            fees: Some(800.0),
            appointment_date: Some(appointment_date.to_rfc3339()),
            time_slots: Some(TimeSlot {
                start: "10:00".to_string(),
                end: "10:30".to_string(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_booking_defaults_to_pending() {
        let now = Utc::now();
        let checked = validate_appointment(&booking(now + Duration::days(2)), now).unwrap();
        assert_eq!(checked.status, AppointmentStatus::Pending);
    }

    #[test]
    fn test_past_date_rejected() {
        let now = Utc::now();
        assert_matches!(
            validate_appointment(&booking(now - Duration::hours(1)), now),
            Err(AppointmentError::Invalid(errors)) if errors == vec!["Appointment date must be in the future"]
        );
    }

    #[test]
    fn test_missing_fields_and_bad_slot_reported_together() {
        let now = Utc::now();
        let request = CreateAppointmentRequest {
            first_name: None,
            fees: None,
            time_slots: Some(TimeSlot {
                start: "10am".to_string(),
                end: "10:30".to_string(),
            }),
            ..booking(now + Duration::days(1))
        };

        assert_matches!(
            validate_appointment(&request, now),
            Err(AppointmentError::Invalid(errors)) if errors == vec![
                "First name is required",
                "Fees is required",
                "Start time must be in HH:mm format",
            ]
        );
    }

    #[test]
    fn test_unknown_organization_type_rejected() {
        let now = Utc::now();
        let request = CreateAppointmentRequest {
            organization_type: Some("Pharmacy".to_string()),
            ..booking(now + Duration::days(1))
        };
        assert_matches!(validate_appointment(&request, now), Err(AppointmentError::Invalid(_)));
    }

    #[test]
    fn test_status_update_capitalizes_first_letter() {
        assert_eq!(parse_status_update(Some("completed")).unwrap(), AppointmentStatus::Completed);
        assert_eq!(parse_status_update(Some("Confirmed")).unwrap(), AppointmentStatus::Confirmed);
    }

    #[test]
    fn test_status_update_rejects_pending_and_unknown() {
        assert_matches!(parse_status_update(Some("pending")), Err(AppointmentError::InvalidStatus));
        assert_matches!(parse_status_update(Some("done")), Err(AppointmentError::InvalidStatus));
        assert_matches!(parse_status_update(None), Err(AppointmentError::InvalidStatus));
    }
}
