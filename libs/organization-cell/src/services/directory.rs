use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{Order, Query, SupabaseClient};
use shared_utils::geo::{nearest, validate_coordinates, BoundingBox};
use shared_utils::password::without_password;

use crate::models::{
    NearestQuery, OrganizationError, OrganizationKind, DEFAULT_MAX_DISTANCE_M, NEAREST_HOSPITALS_LIMIT,
};

const DOCTORS_TABLE: &str = "doctors";

/// Public, read-only listings of hospitals and clinics.
pub struct OrganizationDirectoryService {
    supabase: SupabaseClient,
}

impl OrganizationDirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list(&self, kind: OrganizationKind) -> Result<Vec<Value>, OrganizationError> {
        let rows: Vec<Value> = self
            .supabase
            .select(&Query::table(kind.table()).order("createdAt", Order::Desc))
            .await?;

        Ok(rows.into_iter().map(without_password).collect())
    }

    pub async fn get(&self, kind: OrganizationKind, id: &str) -> Result<Value, OrganizationError> {
        let row: Option<Value> = self.supabase.select_one(Query::table(kind.table()).eq("id", id)).await?;

        row.map(without_password).ok_or(OrganizationError::NotFound(kind.label()))
    }

    /// Clinics within `maxDistance` metres, nearest first.
    pub async fn nearest_clinics(&self, query: NearestQuery) -> Result<Vec<Value>, OrganizationError> {
        let (lat, lng) = origin(&query)?;
        let max_km = query.max_distance.unwrap_or(DEFAULT_MAX_DISTANCE_M).max(0.0) / 1000.0;
        debug!("Clinics within {} km of ({}, {})", max_km, lat, lng);

        let bbox = BoundingBox::around(lat, lng, max_km);
        let rows: Vec<Value> = self
            .supabase
            .select(&bbox.apply(Query::table(OrganizationKind::Clinic.table())))
            .await?;

        Ok(nearest(rows, (lat, lng), Some(max_km), usize::MAX)
            .into_iter()
            .map(without_password)
            .collect())
    }

    /// The closest hospitals regardless of distance.
    pub async fn nearest_hospitals(&self, query: NearestQuery) -> Result<Vec<Value>, OrganizationError> {
        let (lat, lng) = origin(&query)?;

        let rows: Vec<Value> = self
            .supabase
            .select(
                &Query::table(OrganizationKind::Hospital.table())
                    .not_null("latitude")
                    .not_null("longitude"),
            )
            .await?;

        Ok(nearest(rows, (lat, lng), None, NEAREST_HOSPITALS_LIMIT)
            .into_iter()
            .map(without_password)
            .collect())
    }

    pub async fn clinic_doctors(&self, clinic_id: &str) -> Result<Vec<Value>, OrganizationError> {
        let rows: Vec<Value> = self
            .supabase
            .select(
                &Query::table(DOCTORS_TABLE)
                    .eq("organizationId", clinic_id)
                    .eq("organizationType", OrganizationKind::Clinic.label()),
            )
            .await?;

        Ok(rows.into_iter().map(without_password).collect())
    }
}

fn origin(query: &NearestQuery) -> Result<(f64, f64), OrganizationError> {
    let (lat, lng) = match (query.latitude, query.longitude) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => return Err(OrganizationError::MissingLocation),
    };

    if !validate_coordinates(lat, lng) {
        return Err(OrganizationError::InvalidCoordinates);
    }
    Ok((lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_origin_requires_both_coordinates() {
        let query = NearestQuery {
            latitude: Some(18.5),
            ..Default::default()
        };
        assert_matches!(origin(&query), Err(OrganizationError::MissingLocation));
    }

    #[test]
    fn test_origin_rejects_out_of_range() {
        let query = NearestQuery {
            latitude: Some(-91.0),
            longitude: Some(0.0),
            max_distance: None,
        };
        assert_matches!(origin(&query), Err(OrganizationError::InvalidCoordinates));
    }
}
