//! Header inspection for the sightings CSV.
//!
//! The scrubbed NUFORC export ships its longitude header as `"longitude "`
//! (with a trailing space) while hand-edited copies usually drop the space.
//! [`ColumnMap::resolve`] picks whichever variant is present once per run so
//! row extraction never has to look it up again.

use crate::utils::error::{EtlError, Result};

pub const DATETIME: &str = "datetime";
pub const CITY: &str = "city";
pub const STATE: &str = "state";
pub const COUNTRY: &str = "country";
pub const SHAPE: &str = "shape";
pub const DURATION: &str = "duration (hours/min)";
pub const COMMENTS: &str = "comments";
pub const DATE_POSTED: &str = "date posted";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE_SPACED: &str = "longitude ";
pub const LONGITUDE: &str = "longitude";

/// Columns that must appear verbatim in the header. Longitude is checked
/// separately because of its two spellings.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    DATETIME,
    CITY,
    STATE,
    COUNTRY,
    SHAPE,
    DURATION,
    COMMENTS,
    DATE_POSTED,
    LATITUDE,
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Reads only the header row of `bytes` and returns the column names as
/// written, including any stray whitespace.
pub fn detect_columns(bytes: &[u8]) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(strip_bom(bytes));

    let headers = reader.headers()?;
    Ok(headers.iter().map(str::to_string).collect())
}

/// Resolved names of the columns the transformer reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    /// Header name actually used for longitude.
    pub longitude: String,
}

impl ColumnMap {
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let has = |name: &str| headers.iter().any(|h| h == name);

        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|&&column| !has(column)) {
            return Err(EtlError::missing_column(*missing));
        }

        let longitude = if has(LONGITUDE_SPACED) {
            LONGITUDE_SPACED
        } else if has(LONGITUDE) {
            LONGITUDE
        } else {
            return Err(EtlError::missing_column(LONGITUDE));
        };

        tracing::debug!("Using longitude column {:?}", longitude);

        Ok(Self {
            longitude: longitude.to_string(),
        })
    }
}

/// Header check used by dry runs: the columns as read and the resolved map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderReport {
    pub columns: Vec<String>,
    pub map: ColumnMap,
}

/// Reads the header of `bytes` and verifies every required column is there.
pub fn inspect_header(bytes: &[u8]) -> Result<HeaderReport> {
    let columns = detect_columns(bytes)?;
    let map = ColumnMap::resolve(&columns)?;
    Ok(HeaderReport { columns, map })
}
