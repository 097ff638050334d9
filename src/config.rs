use crate::error::Result;
use crate::readers::DatasetOptions;
use crate::utils::constants::{
    DEFAULT_BATCH_SIZE, LATITUDE_COLUMN, LONGITUDE_COLUMN, PRESSURE_COLUMN, QC_GOOD, TIME_COLUMN,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Environment variables with this prefix override file settings,
/// e.g. `ARGO_MAX_WORKERS=4`.
pub const ENV_PREFIX: &str = "ARGO";

/// Settings shared by every pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    #[validate(range(min = 1))]
    pub max_workers: usize,

    #[validate(range(min = 1))]
    pub batch_size: usize,

    pub recursive: bool,

    #[validate(length(min = 1))]
    pub latitude_column: String,

    #[validate(length(min = 1))]
    pub longitude_column: String,

    #[validate(length(min = 1))]
    pub time_column: String,

    #[validate(length(min = 1))]
    pub pressure_column: String,

    #[validate(length(min = 1))]
    pub accepted_qc_codes: Vec<i64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_workers: num_cpus::get(),
            batch_size: DEFAULT_BATCH_SIZE,
            recursive: false,
            latitude_column: LATITUDE_COLUMN.to_string(),
            longitude_column: LONGITUDE_COLUMN.to_string(),
            time_column: TIME_COLUMN.to_string(),
            pressure_column: PRESSURE_COLUMN.to_string(),
            accepted_qc_codes: vec![QC_GOOD],
        }
    }
}

impl PipelineConfig {
    /// Defaults, then the optional TOML/YAML/JSON file, then `ARGO_*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn dataset_options(&self) -> DatasetOptions {
        DatasetOptions::default()
            .with_recursive(self.recursive)
            .with_max_workers(self.max_workers)
            .with_batch_size(self.batch_size)
    }
}
