use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{Order, Query, SupabaseClient};
use shared_utils::validation::normalize_email;

use crate::aggregate::{
    consultant_activities, count_status, fees_total, organization_activities, status_distribution, weekly_counts,
    weekly_series,
};
use crate::models::{
    ConsultantDashboard, DashboardError, OrganizationDashboard, OrganizationStats, CONSULTANT_PALETTE,
    RECENT_ACTIVITY_LIMIT,
};

const APPOINTMENTS_TABLE: &str = "appointments";
const DOCTORS_TABLE: &str = "doctors";
const STATS_COLUMNS: &str = "id,status,fees,appointmentDate,createdAt";
const ACTIVITY_COLUMNS: &str = "id,firstName,lastName,status,createdAt";

pub struct DashboardService {
    supabase: SupabaseClient,
}

impl DashboardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Doctors employed by the organization with `organization_email`.
    pub async fn doctors_count(&self, organization_email: &str) -> Result<u64, DashboardError> {
        let count = self
            .supabase
            .count(&Query::table(DOCTORS_TABLE).eq("organizationEmail", normalize_email(organization_email)))
            .await?;
        Ok(count)
    }

    pub async fn organization_stats(
        &self,
        dashboard: OrganizationDashboard,
        organization_email: &str,
    ) -> Result<OrganizationStats, DashboardError> {
        let scope = Query::table(APPOINTMENTS_TABLE).eq("organizationEmail", normalize_email(organization_email));
        debug!("Building {:?} dashboard for {}", dashboard, organization_email);

        let (rows, recent) = self.load(scope).await?;

        Ok(OrganizationStats {
            pending_count: count_status(&rows, "Pending"),
            completed_count: count_status(&rows, "Completed"),
            completed_revenue: fees_total(&rows, "Completed"),
            weekly_stats: weekly_series(
                weekly_counts(&rows, dashboard.weekly_field(), Utc::now()),
                "appointments",
            ),
            status_stats: status_distribution(&rows, dashboard.palette()),
            recent_activities: organization_activities(&recent),
        })
    }

    /// Figures for one doctor's appointments at one organization.
    pub async fn consultant(
        &self,
        doctor_email: &str,
        organization_email: &str,
    ) -> Result<ConsultantDashboard, DashboardError> {
        let scope = Query::table(APPOINTMENTS_TABLE)
            .eq("doctorEmail", normalize_email(doctor_email))
            .eq("organizationEmail", normalize_email(organization_email));

        let (rows, recent) = self.load(scope).await?;

        Ok(ConsultantDashboard {
            completed_count: count_status(&rows, "Completed"),
            accepted_count: count_status(&rows, "Confirmed"),
            pending_count: count_status(&rows, "Pending"),
            total_earnings: fees_total(&rows, "Completed"),
            weekly_stats: weekly_series(weekly_counts(&rows, "createdAt", Utc::now()), "consultations"),
            status_stats: status_distribution(&rows, CONSULTANT_PALETTE),
            recent_activities: consultant_activities(&recent),
        })
    }

    /// Every appointment in `scope` plus the newest few, fetched together.
    async fn load(&self, scope: Query) -> Result<(Vec<Value>, Vec<Value>), DashboardError> {
        let all = scope.clone().select(STATS_COLUMNS);
        let recent = scope
            .select(ACTIVITY_COLUMNS)
            .order("createdAt", Order::Desc)
            .limit(RECENT_ACTIVITY_LIMIT);

        let (rows, recent) = futures::try_join!(
            self.supabase.select::<Value>(&all),
            self.supabase.select::<Value>(&recent),
        )?;
        Ok((rows, recent))
    }
}
