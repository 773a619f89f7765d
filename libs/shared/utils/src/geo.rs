use serde_json::Value;

use shared_database::Query;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

const KM_PER_DEGREE_LAT: f64 = 111.32;

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn validate_coordinates(lat: f64, lng: f64) -> bool {
    lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// Rectangle enclosing a search circle, used to narrow store queries
/// before exact distances are computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn around(lat: f64, lng: f64, radius_km: f64) -> Self {
        let d_lat = radius_km / KM_PER_DEGREE_LAT;
        let min_lat = (lat - d_lat).max(-90.0);
        let max_lat = (lat + d_lat).min(90.0);

        let cos_lat = lat.to_radians().cos();
        // Near the poles every longitude is in range.
        let (min_lng, max_lng) = if cos_lat < 1e-6 || max_lat >= 90.0 || min_lat <= -90.0 {
            (-180.0, 180.0)
        } else {
            let d_lng = radius_km / (KM_PER_DEGREE_LAT * cos_lat);
            // A circle crossing the antimeridian spans both ends of the range.
            if lng - d_lng < -180.0 || lng + d_lng > 180.0 {
                (-180.0, 180.0)
            } else {
                (lng - d_lng, lng + d_lng)
            }
        };

        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// Restricts `query` to rows whose `latitude`/`longitude` fall inside the box.
    pub fn apply(&self, query: Query) -> Query {
        query
            .gte("latitude", self.min_lat)
            .lte("latitude", self.max_lat)
            .gte("longitude", self.min_lng)
            .lte("longitude", self.max_lng)
    }
}

/// Reads `latitude`/`longitude` from a row, accepting numbers or numeric strings.
pub fn row_coordinates(row: &Value) -> Option<(f64, f64)> {
    let lat = number_value(row.get("latitude")?)?;
    let lng = number_value(row.get("longitude")?)?;
    validate_coordinates(lat, lng).then_some((lat, lng))
}

/// A JSON number, or a string holding one.
pub fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Rows with coordinates, paired with their distance from `origin`, nearest
/// first. Rows farther than `max_km` are dropped.
pub fn rank_by_distance(rows: Vec<Value>, origin: (f64, f64), max_km: Option<f64>) -> Vec<(Value, f64)> {
    let mut ranked: Vec<(Value, f64)> = rows
        .into_iter()
        .filter_map(|row| {
            let (lat, lng) = row_coordinates(&row)?;
            let distance = haversine_km(origin.0, origin.1, lat, lng);
            match max_km {
                Some(max) if distance > max => None,
                _ => Some((row, distance)),
            }
        })
        .collect();

    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked
}

/// Same as [`rank_by_distance`] but keeps at most `limit` rows and drops the distances.
pub fn nearest(rows: Vec<Value>, origin: (f64, f64), max_km: Option<f64>, limit: usize) -> Vec<Value> {
    rank_by_distance(rows, origin, max_km)
        .into_iter()
        .take(limit)
        .map(|(row, _)| row)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_haversine_known_distance() {
        // Mumbai to Pune is roughly 120 km.
        let d = haversine_km(19.0760, 72.8777, 18.5204, 73.8567);
        assert!((d - 120.0).abs() < 5.0, "got {}", d);
        assert_eq!(haversine_km(10.0, 10.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = haversine_km(12.97, 77.59, 28.61, 77.20);
        let b = haversine_km(28.61, 77.20, 12.97, 77.59);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(90.0, -180.0));
        assert!(!validate_coordinates(90.1, 0.0));
        assert!(!validate_coordinates(0.0, 180.5));
        assert!(!validate_coordinates(f64::NAN, 0.0));
    }

    #[test]
    fn test_bounding_box_contains_radius() {
        let bbox = BoundingBox::around(19.0, 72.8, 10.0);
        assert!(bbox.min_lat < 19.0 && bbox.max_lat > 19.0);
        assert!(bbox.min_lng < 72.8 && bbox.max_lng > 72.8);

        let north = haversine_km(19.0, 72.8, bbox.max_lat, 72.8);
        assert!((north - 10.0).abs() < 0.1);
    }

    #[test]
    fn test_bounding_box_near_pole_spans_all_longitudes() {
        let bbox = BoundingBox::around(89.99, 0.0, 50.0);
        assert_eq!(bbox.min_lng, -180.0);
        assert_eq!(bbox.max_lng, 180.0);
    }

    #[test]
    fn test_bounding_box_across_antimeridian_spans_all_longitudes() {
        let bbox = BoundingBox::around(0.0, 179.95, 10.0);
        assert_eq!(bbox.min_lng, -180.0);
        assert_eq!(bbox.max_lng, 180.0);

        // About 7.8 km away on the far side of the date line.
        assert!(haversine_km(0.0, 179.95, 0.0, -179.98) < 10.0);
        assert!(bbox.min_lng <= -179.98 && -179.98 <= bbox.max_lng);

        let west = BoundingBox::around(0.0, -179.95, 10.0);
        assert_eq!((west.min_lng, west.max_lng), (-180.0, 180.0));
    }

    #[test]
    fn test_bounding_box_applies_range_filters() {
        let bbox = BoundingBox {
            min_lat: 1.0,
            max_lat: 2.0,
            min_lng: 3.0,
            max_lng: 4.0,
        };
        let path = bbox.apply(Query::table("clinics")).to_path();
        assert_eq!(
            path,
            "/rest/v1/clinics?latitude=gte.1&latitude=lte.2&longitude=gte.3&longitude=lte.4"
        );
    }

    #[test]
    fn test_number_value() {
        assert_eq!(number_value(&json!(12.5)), Some(12.5));
        assert_eq!(number_value(&json!(" 7 ")), Some(7.0));
        assert_eq!(number_value(&json!("abc")), None);
        assert_eq!(number_value(&json!(null)), None);
    }

    #[test]
    fn test_nearest_sorts_filters_and_limits() {
        let rows = vec![
            json!({"id": "far", "latitude": 19.5, "longitude": 72.8}),
            json!({"id": "near", "latitude": "19.01", "longitude": "72.8"}),
            json!({"id": "mid", "latitude": 19.05, "longitude": 72.8}),
            json!({"id": "nowhere"}),
        ];

        let ranked = nearest(rows.clone(), (19.0, 72.8), Some(10.0), 20);
        let ids: Vec<&str> = ranked.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["near", "mid"]);

        let limited = nearest(rows, (19.0, 72.8), None, 1);
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0]["id"], "near");
    }
}
