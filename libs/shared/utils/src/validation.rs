use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

fn time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid time regex"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// 24-hour `HH:mm` with a two-digit hour.
pub fn is_valid_time(value: &str) -> bool {
    time_regex().is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    phone_regex().is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Upper-cases the first character and leaves the rest untouched.
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// RFC 3339 timestamp, zone-less `YYYY-MM-DDTHH:MM[:SS]` (read as UTC) or
/// bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// True when the value is absent or only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_format() {
        assert!(is_valid_time("09:30"));
        assert!(!is_valid_time("9:30"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("24:00"));
        assert!(!is_valid_time("12:60"));
        assert!(!is_valid_time("noon"));
    }

    #[test]
    fn test_phone_format() {
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("98765"));
        assert!(!is_valid_phone("98765432101"));
        assert!(!is_valid_phone("98765abcde"));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("confirmed"), "Confirmed");
        assert_eq!(capitalize_first("cANCELLED"), "CANCELLED");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_parse_date() {
        let ts = parse_date("2030-05-01T10:30:00+05:30").unwrap();
        assert_eq!(ts.to_rfc3339(), "2030-05-01T05:00:00+00:00");

        let local = parse_date("2030-05-01T10:30").unwrap();
        assert_eq!(local.to_rfc3339(), "2030-05-01T10:30:00+00:00");

        let day = parse_date("2030-05-01").unwrap();
        assert_eq!(day.to_rfc3339(), "2030-05-01T00:00:00+00:00");

        assert!(parse_date("01/05/2030").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("   ")));
        assert!(!is_blank(Some("x")));
    }
}
