//! Dashboard figures computed from appointment rows.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde_json::{json, Value};

use shared_utils::geo::number_value;
use shared_utils::validation::parse_date;

use crate::models::{Activity, Palette, StatusSlice, UNKNOWN_STATUS_COLOR, WEEKDAYS};

fn status_of(row: &Value) -> &str {
    row.get("status").and_then(Value::as_str).unwrap_or_default()
}

fn date_of(row: &Value, field: &str) -> Option<DateTime<Utc>> {
    row.get(field).and_then(Value::as_str).and_then(parse_date)
}

pub fn count_status(rows: &[Value], status: &str) -> u64 {
    rows.iter().filter(|row| status_of(row) == status).count() as u64
}

/// Sum of `fees` over rows with `status`; missing or non-numeric fees count as zero.
pub fn fees_total(rows: &[Value], status: &str) -> f64 {
    rows.iter()
        .filter(|row| status_of(row) == status)
        .filter_map(|row| row.get("fees").and_then(number_value))
        .sum()
}

/// Rows per weekday (Sun..Sat, UTC) whose `field` falls on or after seven days before `now`.
pub fn weekly_counts(rows: &[Value], field: &str, now: DateTime<Utc>) -> [u64; 7] {
    let since = now - Duration::days(7);
    let mut counts = [0u64; 7];
    for date in rows.iter().filter_map(|row| date_of(row, field)) {
        if date >= since {
            counts[date.weekday().num_days_from_sunday() as usize] += 1;
        }
    }
    counts
}

/// `[{name: "Sun", <key>: n}, ...]`
pub fn weekly_series(counts: [u64; 7], key: &str) -> Vec<Value> {
    WEEKDAYS
        .iter()
        .zip(counts)
        .map(|(day, count)| json!({ "name": day, key: count }))
        .collect()
}

/// One slice per status present in `rows`, in name order.
pub fn status_distribution(rows: &[Value], palette: Palette) -> Vec<StatusSlice> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for row in rows {
        *counts.entry(status_of(row)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(name, value)| StatusSlice {
            name: name.to_string(),
            value,
            color: palette
                .iter()
                .find(|(status, _)| *status == name)
                .map(|(_, color)| *color)
                .unwrap_or(UNKNOWN_STATUS_COLOR),
        })
        .collect()
}

fn patient_name(row: &Value) -> String {
    let first = row.get("firstName").and_then(Value::as_str).unwrap_or_default();
    let last = row.get("lastName").and_then(Value::as_str).unwrap_or_default();
    format!("{} {}", first, last)
}

/// `M/D/YYYY`
pub fn short_date(date: DateTime<Utc>) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// `M/D/YYYY, h:mm:ss AM`
pub fn short_date_time(date: DateTime<Utc>) -> String {
    date.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Activity feed entries for an organization dashboard.
pub fn organization_activities(rows: &[Value]) -> Vec<Activity> {
    rows.iter()
        .map(|row| Activity {
            title: format!("Appointment for {}", patient_name(row)),
            description: format!("Status: {}", status_of(row)),
            time: date_of(row, "createdAt").map(short_date).unwrap_or_default(),
        })
        .collect()
}

/// Activity feed entries for a consultant dashboard.
pub fn consultant_activities(rows: &[Value]) -> Vec<Activity> {
    rows.iter()
        .map(|row| Activity {
            title: format!("New consultation {}", status_of(row).to_lowercase()),
            description: format!("Patient: {}", patient_name(row)),
            time: date_of(row, "createdAt").map(short_date_time).unwrap_or_default(),
        })
        .collect()
}
