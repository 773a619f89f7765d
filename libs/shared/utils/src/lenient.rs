//! Deserializers for form-style payloads where numbers may arrive as
//! strings and arrays as JSON-encoded strings.
//!
//! Use with `#[serde(default, deserialize_with = "...")]`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Number or numeric string. Empty strings and `null` are `None`; anything
/// else that does not parse is an error.
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {:?}", s))),
        Some(other) => Err(serde::de::Error::custom(format!("expected a number, got {}", other))),
    }
}

/// String or bare number (phone numbers and pincodes are often sent as numbers).
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("expected a string, got {}", other))),
    }
}

/// Array of strings, a JSON-encoded array string, or a single string.
pub fn opt_string_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => strings_of(items).map(Some),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.starts_with('[') {
                let items: Vec<Value> = serde_json::from_str(trimmed).map_err(serde::de::Error::custom)?;
                strings_of(items).map(Some)
            } else if trimmed.is_empty() {
                Ok(Some(Vec::new()))
            } else {
                Ok(Some(vec![trimmed.to_string()]))
            }
        }
        Some(other) => Err(serde::de::Error::custom(format!("expected a list, got {}", other))),
    }
}

/// Object, or a JSON-encoded object string.
pub fn opt_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => serde_json::from_str(&s).map(Some).map_err(serde::de::Error::custom),
        Some(other) => serde_json::from_value(other).map(Some).map_err(serde::de::Error::custom),
    }
}

fn strings_of<E: serde::de::Error>(items: Vec<Value>) -> Result<Vec<String>, E> {
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(E::custom(format!("expected a string item, got {}", other))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Slot {
        start: String,
        end: String,
    }

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "opt_f64")]
        fees: Option<f64>,
        #[serde(default, deserialize_with = "opt_string")]
        phone: Option<String>,
        #[serde(default, deserialize_with = "opt_string_vec")]
        days: Option<Vec<String>>,
        #[serde(default, deserialize_with = "opt_object")]
        slot: Option<Slot>,
    }

    #[test]
    fn test_accepts_native_types() {
        let form: Form = serde_json::from_value(json!({
            "fees": 500,
            "phone": "9876543210",
            "days": ["Monday", "Friday"],
            "slot": {"start": "09:00", "end": "17:00"}
        }))
        .unwrap();

        assert_eq!(form.fees, Some(500.0));
        assert_eq!(form.phone.as_deref(), Some("9876543210"));
        assert_eq!(form.days.unwrap(), vec!["Monday", "Friday"]);
        assert_eq!(form.slot.unwrap().start, "09:00");
    }

    #[test]
    fn test_accepts_stringified_values() {
        let form: Form = serde_json::from_value(json!({
            "fees": " 750.5 ",
            "phone": 9876543210u64,
            "days": "[\"Monday\",\"Tuesday\"]",
            "slot": "{\"start\":\"10:00\",\"end\":\"12:00\"}"
        }))
        .unwrap();

        assert_eq!(form.fees, Some(750.5));
        assert_eq!(form.phone.as_deref(), Some("9876543210"));
        assert_eq!(form.days.unwrap(), vec!["Monday", "Tuesday"]);
        assert_eq!(
            form.slot.unwrap(),
            Slot { start: "10:00".to_string(), end: "12:00".to_string() }
        );
    }

    #[test]
    fn test_missing_and_empty_values() {
        let form: Form = serde_json::from_value(json!({"fees": "", "days": null})).unwrap();
        assert_eq!(form.fees, None);
        assert_eq!(form.days, None);
        assert_eq!(form.phone, None);
        assert!(form.slot.is_none());
    }

    #[test]
    fn test_rejects_non_numeric_string() {
        let result: Result<Form, _> = serde_json::from_value(json!({"fees": "free"}));
        assert!(result.is_err());
    }
}
