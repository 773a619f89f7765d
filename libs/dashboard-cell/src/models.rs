use serde::Serialize;
use serde_json::Value;

use shared_database::DatabaseError;
use shared_models::error::AppError;

pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
pub const RECENT_ACTIVITY_LIMIT: usize = 5;
pub const UNKNOWN_STATUS_COLOR: &str = "#9CA3AF";

/// Status name to chart color.
pub type Palette = &'static [(&'static str, &'static str)];

pub const HOSPITAL_PALETTE: Palette = &[
    ("Pending", "#FCD34D"),
    ("Completed", "#34D399"),
    ("Cancelled", "#F87171"),
    ("Confirmed", "#60A5FA"),
];

pub const CLINIC_PALETTE: Palette = &[
    ("Pending", "#FCD34D"),
    ("Completed", "#34D399"),
    ("Cancelled", "#F87171"),
];

/// Confirmed bookings are what the consultant view calls accepted.
pub const CONSULTANT_PALETTE: Palette = &[
    ("Completed", "#10B981"),
    ("Accepted", "#F59E0B"),
    ("Confirmed", "#F59E0B"),
    ("Pending", "#6366F1"),
    ("Cancelled", "#EF4444"),
];

/// Which organization dashboard is being built. They differ in palette
/// and in the date the weekly chart is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizationDashboard {
    Hospital,
    Clinic,
}

impl OrganizationDashboard {
    pub fn palette(&self) -> Palette {
        match self {
            OrganizationDashboard::Hospital => HOSPITAL_PALETTE,
            OrganizationDashboard::Clinic => CLINIC_PALETTE,
        }
    }

    pub fn weekly_field(&self) -> &'static str {
        match self {
            OrganizationDashboard::Hospital => "appointmentDate",
            OrganizationDashboard::Clinic => "createdAt",
        }
    }
}

// ==============================================================================
// RESPONSES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSlice {
    pub name: String,
    pub value: u64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub title: String,
    pub description: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationStats {
    pub pending_count: u64,
    pub completed_count: u64,
    pub completed_revenue: f64,
    pub weekly_stats: Vec<Value>,
    pub status_stats: Vec<StatusSlice>,
    pub recent_activities: Vec<Activity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultantDashboard {
    pub completed_count: u64,
    pub accepted_count: u64,
    pub pending_count: u64,
    pub total_earnings: f64,
    pub weekly_stats: Vec<Value>,
    pub status_stats: Vec<StatusSlice>,
    pub recent_activities: Vec<Activity>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Database(e) => e.into(),
        }
    }
}
