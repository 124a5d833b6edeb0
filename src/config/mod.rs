pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_distinct_paths, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "ufo-etl")]
#[command(about = "Convert UFO sightings CSV to JSON format for the UFO Sighting Map app")]
pub struct CliConfig {
    #[arg(long, default_value = "scrubbed.csv", help = "Input CSV file")]
    pub input: String,

    #[arg(
        long,
        default_value = "app/src/main/assets/sightings.json",
        help = "Output JSON file"
    )]
    pub output: String,

    #[arg(long, help = "Limit the number of records")]
    pub limit: Option<usize>,

    #[arg(long, help = "Write indented JSON")]
    pub pretty: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn limit(&self) -> Option<usize> {
        self.limit
    }

    fn pretty(&self) -> bool {
        self.pretty
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_path("output", &self.output)?;
        validate_distinct_paths("output", &self.input, &self.output)
    }
}
