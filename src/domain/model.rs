use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One CSV data row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// 1-based data row number (the header is not counted).
    pub row: usize,
    pub data: HashMap<String, String>,
}

impl RawRecord {
    /// Missing columns read as empty, like a short CSV row.
    pub fn get(&self, column: &str) -> &str {
        self.data.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Output of the extract phase: the header as read plus every data row.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// A sighting in the shape the map app loads from `sightings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sighting {
    pub date_time: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub shape: String,
    pub duration: String,
    pub summary: String,
    pub posted: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub rows_scanned: usize,
    pub rows_skipped: usize,
    pub coordinate_fallbacks: usize,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub sightings: Vec<Sighting>,
    pub stats: TransformStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sighting_uses_app_field_names() {
        let sighting = Sighting {
            date_time: "10/10/1949 20:30".to_string(),
            city: "san marcos".to_string(),
            state: "tx".to_string(),
            country: "us".to_string(),
            shape: "cylinder".to_string(),
            duration: "45 minutes".to_string(),
            summary: "This event took place in early fall around 1949-50.".to_string(),
            posted: "4/27/2004".to_string(),
            latitude: 29.8830556,
            longitude: -97.9411111,
        };

        let value = serde_json::to_value(&sighting).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected = vec![
            "dateTime", "city", "state", "country", "shape", "duration", "summary", "posted",
            "latitude", "longitude",
        ];
        let mut actual = keys.clone();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
        assert_eq!(value["dateTime"], "10/10/1949 20:30");
    }

    #[test]
    fn test_raw_record_missing_column_reads_empty() {
        let record = RawRecord {
            row: 1,
            data: HashMap::from([("city".to_string(), "dayton".to_string())]),
        };
        assert_eq!(record.get("city"), "dayton");
        assert_eq!(record.get("state"), "");
    }
}
