use crate::core::columns::{self, ColumnMap};
use crate::core::transform::{self, SightingTransformer};
use crate::core::{
    ConfigProvider, Pipeline, RawRecord, RawTable, Sighting, Storage, TransformResult,
};
use crate::utils::error::Result;
use std::collections::HashMap;

/// CSV → JSON pipeline for sighting exports.
pub struct SightingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    posted_fallback: String,
}

impl<S: Storage, C: ConfigProvider> SightingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            posted_fallback: transform::today(),
        }
    }

    /// Overrides the date written for rows with a blank `date posted`.
    pub fn with_posted_fallback(mut self, date: impl Into<String>) -> Self {
        self.posted_fallback = date.into();
        self
    }
}

/// Parses CSV bytes into a header plus keyed rows. Short rows are accepted
/// and their missing trailing fields read as empty.
pub fn parse_table(bytes: &[u8]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(columns::strip_bom(bytes));

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut records = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let row = result?;
        let data: HashMap<String, String> = headers
            .iter()
            .cloned()
            .zip(row.iter().map(str::to_string))
            .collect();
        records.push(RawRecord { row: idx + 1, data });
    }

    Ok(RawTable { headers, records })
}

/// Encodes the sightings as a single JSON array.
pub fn serialize_sightings(sightings: &[Sighting], pretty: bool) -> Result<Vec<u8>> {
    let data = if pretty {
        serde_json::to_vec_pretty(sightings)?
    } else {
        serde_json::to_vec(sightings)?
    };
    Ok(data)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SightingPipeline<S, C> {
    async fn extract(&self) -> Result<RawTable> {
        let input = self.config.input_path();
        tracing::debug!("Reading sightings from: {}", input);

        let bytes = self.storage.read_file(input).await?;

        let table = parse_table(&bytes)?;
        tracing::info!("CSV columns: {:?}", table.headers);
        if let Some(first) = table.records.first() {
            tracing::debug!("First row: {:?}", first.data);
        }

        Ok(table)
    }

    async fn transform(&self, table: RawTable) -> Result<TransformResult> {
        let columns = ColumnMap::resolve(&table.headers)?;
        let transformer =
            SightingTransformer::with_posted_fallback(columns, self.posted_fallback.clone());

        if let Some(limit) = self.config.limit() {
            tracing::debug!("Emitting at most {} sightings", limit);
        }

        let result = transformer.transform_all(&table.records, self.config.limit());

        if result.stats.coordinate_fallbacks > 0 {
            tracing::warn!(
                "{} coordinate values could not be parsed and were set to 0.0",
                result.stats.coordinate_fallbacks
            );
        }
        tracing::debug!(
            "Scanned {} rows, skipped {} without datetime or city",
            result.stats.rows_scanned,
            result.stats.rows_skipped
        );

        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path();
        let data = serialize_sightings(&result.sightings, self.config.pretty())?;

        tracing::debug!(
            "Writing {} sightings ({} bytes) to {}",
            result.sightings.len(),
            data.len(),
            output_path
        );
        self.storage.write_file(output_path, &data).await?;

        Ok(output_path.to_string())
    }
}
