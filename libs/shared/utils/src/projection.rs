use serde_json::{Map, Value};

/// Copies the listed keys out of a row. Missing keys are skipped.
pub fn pick(row: &Value, fields: &[&str]) -> Value {
    let mut out = Map::new();
    for field in fields {
        if let Some(value) = row.get(*field) {
            out.insert((*field).to_string(), value.clone());
        }
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pick_keeps_listed_fields() {
        let row = json!({"id": "h1", "hospitalName": "City", "password": "x"});
        let picked = pick(&row, &["id", "hospitalName", "image"]);
        assert_eq!(picked, json!({"id": "h1", "hospitalName": "City"}));
    }
}
