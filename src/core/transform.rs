use crate::core::columns::{
    ColumnMap, CITY, COMMENTS, COUNTRY, DATETIME, DATE_POSTED, DURATION, LATITUDE, SHAPE, STATE,
};
use crate::domain::model::{RawRecord, Sighting, TransformResult, TransformStats};

pub const UNKNOWN: &str = "Unknown";

const PROGRESS_INTERVAL: usize = 10_000;

/// Local date in the `YYYY-MM-DD` form used when `date posted` is blank.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Maps raw CSV rows to [`Sighting`]s, applying the per-field fallbacks.
#[derive(Debug, Clone)]
pub struct SightingTransformer {
    columns: ColumnMap,
    posted_fallback: String,
}

impl SightingTransformer {
    pub fn with_posted_fallback(columns: ColumnMap, posted_fallback: impl Into<String>) -> Self {
        Self {
            columns,
            posted_fallback: posted_fallback.into(),
        }
    }

    /// Transforms `records` in order, stopping once `limit` sightings exist.
    pub fn transform_all<'a, I>(&self, records: I, limit: Option<usize>) -> TransformResult
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let mut stats = TransformStats::default();
        let mut sightings = Vec::new();

        for record in records {
            if limit.is_some_and(|max| sightings.len() >= max) {
                tracing::debug!("Record limit reached after {} rows", stats.rows_scanned);
                break;
            }

            stats.rows_scanned += 1;
            match self.transform_row(record, &mut stats) {
                Some(sighting) => sightings.push(sighting),
                None => stats.rows_skipped += 1,
            }

            if stats.rows_scanned % PROGRESS_INTERVAL == 0 {
                tracing::info!("Processed {} rows...", stats.rows_scanned);
            }
        }

        TransformResult { sightings, stats }
    }

    /// Returns `None` for rows without a datetime or city. Bad coordinates
    /// never drop a row.
    pub fn transform_row(&self, record: &RawRecord, stats: &mut TransformStats) -> Option<Sighting> {
        let date_time = record.get(DATETIME);
        let city = record.get(CITY);
        if date_time.is_empty() || city.is_empty() {
            tracing::trace!("Skipping row {}: missing datetime or city", record.row);
            return None;
        }

        let latitude = self.coordinate(record, LATITUDE, stats);
        let longitude = self.coordinate(record, &self.columns.longitude, stats);

        Some(Sighting {
            date_time: date_time.to_string(),
            city: city.to_string(),
            state: record.get(STATE).to_string(),
            country: or_default(record.get(COUNTRY), UNKNOWN),
            shape: or_default(record.get(SHAPE), UNKNOWN),
            duration: or_default(record.get(DURATION), UNKNOWN),
            summary: record.get(COMMENTS).to_string(),
            posted: or_default(record.get(DATE_POSTED), &self.posted_fallback),
            latitude,
            longitude,
        })
    }

    fn coordinate(&self, record: &RawRecord, column: &str, stats: &mut TransformStats) -> f64 {
        let raw = record.get(column);
        match parse_coordinate(raw) {
            Some(value) => value,
            None => {
                if !raw.trim().is_empty() {
                    stats.coordinate_fallbacks += 1;
                    tracing::warn!(
                        "Error parsing {} in row {}: {:?} is not a number, using 0.0",
                        column.trim_end(),
                        record.row,
                        raw
                    );
                }
                0.0
            }
        }
    }
}

/// Parses a coordinate, returning `None` for blank, malformed or
/// non-finite input.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
