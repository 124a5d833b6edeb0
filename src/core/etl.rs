use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        println!("Starting ETL process...");
        self.monitor.log_stats("Start");

        // Extract
        println!("Reading sightings CSV...");
        let table = self.pipeline.extract().await?;
        println!("Read {} rows", table.records.len());
        self.monitor.log_stats("Extract");

        // Transform
        println!("Converting rows to sightings...");
        let result = self.pipeline.transform(table).await?;
        println!(
            "Converted {} sightings ({} rows skipped)",
            result.sightings.len(),
            result.stats.rows_skipped
        );
        self.monitor.log_stats("Transform");

        // Load
        println!("Writing JSON...");
        let count = result.sightings.len();
        let output_path = self.pipeline.load(result).await?;
        println!("Successfully converted {} records to JSON format", count);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
