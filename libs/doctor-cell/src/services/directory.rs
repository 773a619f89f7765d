use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{Order, Query, SupabaseClient};
use shared_utils::geo::{nearest, validate_coordinates, BoundingBox};
use shared_utils::password::without_password;

use crate::models::{DoctorError, DoctorFilterQuery, DoctorSort, NearestDoctorsQuery, DEFAULT_MAX_DISTANCE_M};

const DOCTORS_TABLE: &str = "doctors";

/// Public doctor listings for patients.
pub struct DoctorDirectoryService {
    supabase: SupabaseClient,
}

impl DoctorDirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn all(&self) -> Result<Vec<Value>, DoctorError> {
        self.fetch(Query::table(DOCTORS_TABLE).order("createdAt", Order::Asc)).await
    }

    pub async fn filter(&self, filter: DoctorFilterQuery) -> Result<Vec<Value>, DoctorError> {
        self.fetch(filter_query(&filter)).await
    }

    /// Doctors within `maxDistance` metres, nearest first.
    pub async fn nearest(&self, query: NearestDoctorsQuery) -> Result<Vec<Value>, DoctorError> {
        let (lat, lng) = match (query.latitude, query.longitude) {
            (Some(lat), Some(lng)) if validate_coordinates(lat, lng) => (lat, lng),
            _ => return Err(DoctorError::MissingLocation),
        };
        let max_km = query.max_distance.unwrap_or(DEFAULT_MAX_DISTANCE_M).max(0.0) / 1000.0;
        debug!("Doctors within {} km of ({}, {})", max_km, lat, lng);

        let bbox = BoundingBox::around(lat, lng, max_km);
        let rows = self.fetch(bbox.apply(Query::table(DOCTORS_TABLE))).await?;

        Ok(nearest(rows, (lat, lng), Some(max_km), usize::MAX))
    }

    pub async fn get(&self, id: &str) -> Result<Value, DoctorError> {
        let row: Option<Value> = self.supabase.select_one(Query::table(DOCTORS_TABLE).eq("id", id)).await?;
        row.map(without_password).ok_or(DoctorError::NotFound)
    }

    async fn fetch(&self, query: Query) -> Result<Vec<Value>, DoctorError> {
        let rows: Vec<Value> = self.supabase.select(&query).await?;
        Ok(rows.into_iter().map(without_password).collect())
    }
}

fn filter_query(filter: &DoctorFilterQuery) -> Query {
    let mut query = Query::table(DOCTORS_TABLE);

    if let Some(specialty) = filter.specialty.as_deref().filter(|s| !s.is_empty()) {
        query = query.contains("specialties", &[specialty]);
    }
    if let Some(max_fee) = filter.max_fee {
        query = query.lte("consultationFees", max_fee);
    }
    if let Some(organization) = filter.organization.as_deref().filter(|s| !s.is_empty()) {
        query = query.eq("organizationType", organization);
    }

    match filter.sort() {
        Some(DoctorSort::Fees) => query.order("consultationFees", Order::Asc),
        Some(DoctorSort::Experience) => query.order("experience", Order::Desc),
        None => query.order("createdAt", Order::Asc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_combines_conditions() {
        let filter = DoctorFilterQuery {
            specialty: Some("Cardiology".to_string()),
            max_fee: Some(1000.0),
            organization: Some("Clinic".to_string()),
            sort_by: Some("fees".to_string()),
        };

        let path = filter_query(&filter).to_path();
        assert!(path.contains("consultationFees=lte.1000"));
        assert!(path.contains("organizationType=eq.Clinic"));
        assert!(path.contains("specialties=cs."));
        assert!(path.ends_with("order=consultationFees.asc"));
    }

    #[test]
    fn test_filter_query_defaults_to_insertion_order() {
        let path = filter_query(&DoctorFilterQuery::default()).to_path();
        assert_eq!(path, "/rest/v1/doctors?order=createdAt.asc");
    }
}
