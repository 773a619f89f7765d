use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{Query, SupabaseClient};
use shared_utils::geo::{nearest, BoundingBox};
use shared_utils::password::without_password;

use crate::fuzzy::name_conditions;
use crate::models::{
    SearchError, SearchKind, SearchQuery, HOSPITAL_PUBLIC_COLUMNS, MAX_SEARCH_RESULTS, SEARCH_RADIUS_KM,
};

const DOCTORS_TABLE: &str = "doctors";
const HOSPITALS_TABLE: &str = "hospitals";

/// Text and specialty search over the directory tables.
pub struct SearchService {
    supabase: SupabaseClient,
}

impl SearchService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// The `type`-dispatched search behind `GET /api/search`.
    pub async fn unified(&self, query: SearchQuery) -> Result<Vec<Value>, SearchError> {
        let kind = SearchKind::parse(query.kind.as_deref());

        if kind == Some(SearchKind::Specialty) {
            let specialty = query.specialty().ok_or(SearchError::SpecialtyRequired)?;
            return self.by_specialty(specialty, query.origin(), Some(MAX_SEARCH_RESULTS)).await;
        }

        let text = query.text().ok_or(SearchError::QueryRequired)?;
        let table_query = match kind {
            Some(SearchKind::Doctor) => doctors_named(text),
            Some(SearchKind::Hospital) => doctors_at(SearchKind::Hospital, text),
            Some(SearchKind::Clinic) => doctors_at(SearchKind::Clinic, text),
            _ => return Err(SearchError::InvalidType),
        };

        let rows = self.within_reach(table_query, query.origin(), Some(MAX_SEARCH_RESULTS)).await?;
        Ok(rows.into_iter().map(without_password).collect())
    }

    pub async fn specialty(&self, query: SearchQuery) -> Result<Vec<Value>, SearchError> {
        let specialty = query.specialty().ok_or(SearchError::SpecialtyRequired)?;
        self.by_specialty(specialty, query.origin(), None).await
    }

    pub async fn doctors(&self, query: SearchQuery) -> Result<Vec<Value>, SearchError> {
        let text = query.text().ok_or(SearchError::QueryRequired)?;
        let rows = self.within_reach(doctors_named(text), query.origin(), None).await?;
        Ok(rows.into_iter().map(without_password).collect())
    }

    /// Registered hospitals by name, public columns only.
    pub async fn hospitals(&self, query: SearchQuery) -> Result<Vec<Value>, SearchError> {
        let text = query.text().ok_or(SearchError::QueryRequired)?;
        let table_query = Query::table(HOSPITALS_TABLE)
            .select(HOSPITAL_PUBLIC_COLUMNS)
            .any_of(&name_conditions("hospitalName", text));
        self.within_reach(table_query, query.origin(), None).await
    }

    pub async fn clinics(&self, query: SearchQuery) -> Result<Vec<Value>, SearchError> {
        let text = query.text().ok_or(SearchError::QueryRequired)?;
        let rows = self
            .within_reach(doctors_at(SearchKind::Clinic, text), query.origin(), None)
            .await?;
        Ok(rows.into_iter().map(without_password).collect())
    }

    /// Doctors with a specialty containing `specialty`, ignoring case.
    async fn by_specialty(
        &self,
        specialty: &str,
        origin: Option<(f64, f64)>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, SearchError> {
        let matcher = specialty_matcher(specialty)?;
        let rows = self.within_reach(Query::table(DOCTORS_TABLE), origin, None).await?;

        Ok(rows
            .into_iter()
            .filter(|row| has_specialty(row, &matcher))
            .take(limit.unwrap_or(usize::MAX))
            .map(without_password)
            .collect())
    }

    /// Runs `query`; with an origin, keeps rows within the search radius, nearest first.
    async fn within_reach(
        &self,
        query: Query,
        origin: Option<(f64, f64)>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, SearchError> {
        match origin {
            Some((lat, lng)) => {
                debug!("Searching {} near ({}, {})", query.table_name(), lat, lng);
                let bbox = BoundingBox::around(lat, lng, SEARCH_RADIUS_KM);
                let rows: Vec<Value> = self.supabase.select(&bbox.apply(query)).await?;
                Ok(nearest(
                    rows,
                    (lat, lng),
                    Some(SEARCH_RADIUS_KM),
                    limit.unwrap_or(usize::MAX),
                ))
            }
            None => {
                let query = match limit {
                    Some(limit) => query.limit(limit),
                    None => query,
                };
                Ok(self.supabase.select(&query).await?)
            }
        }
    }
}

fn doctors_named(text: &str) -> Query {
    Query::table(DOCTORS_TABLE).any_of(&name_conditions("name", text))
}

/// Doctors whose employing organization of `kind` matches `text`.
fn doctors_at(kind: SearchKind, text: &str) -> Query {
    let organization_type = match kind {
        SearchKind::Clinic => "Clinic",
        _ => "Hospital",
    };
    Query::table(DOCTORS_TABLE)
        .eq("organizationType", organization_type)
        .any_of(&name_conditions("organizationName", text))
}

fn specialty_matcher(specialty: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(specialty)).case_insensitive(true).build()
}

fn has_specialty(row: &Value, matcher: &Regex) -> bool {
    row.get("specialties")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).any(|s| matcher.is_match(s)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_specialty_matching_ignores_case() {
        let matcher = specialty_matcher("cardio").unwrap();
        assert!(has_specialty(&json!({"specialties": ["Neurology", "Cardiology"]}), &matcher));
        assert!(!has_specialty(&json!({"specialties": ["Dental"]}), &matcher));
        assert!(!has_specialty(&json!({"specialties": "Cardiology"}), &matcher));
    }

    #[test]
    fn test_specialty_input_is_literal() {
        let matcher = specialty_matcher("E.T").unwrap();
        assert!(!has_specialty(&json!({"specialties": ["ENT"]}), &matcher));
    }

    #[test]
    fn test_clinic_search_filters_organization_type() {
        let path = doctors_at(SearchKind::Clinic, "care").to_path();
        assert!(path.starts_with("/rest/v1/doctors?organizationType=eq.Clinic&or="));
    }
}
