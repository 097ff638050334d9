use crate::analyzers::SummaryAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::filters::{BoundingBox, Predicate, Scalar};
use crate::models::ColumnKind;
use crate::processors::SpatialAggregator;
use crate::readers::DatasetHandle;
use crate::utils::progress::ProgressReporter;
use crate::utils::{generate_default_output_filename, measurement_column, qc_column, DatasetName};
use crate::writers::ParquetWriter;
use arrow::datatypes::Schema;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, Level};

/// Row selection for the `map` command.
#[derive(Debug, Clone, Default)]
pub struct MapRequest {
    pub variable: String,
    pub adjusted: bool,
    pub pres_min: Option<f64>,
    pub pres_max: Option<f64>,
    pub qc_codes: Option<Vec<i64>>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub bbox: Option<BoundingBox>,
}

impl MapRequest {
    /// Column averaged per location.
    pub fn target_column(&self) -> String {
        measurement_column(&self.variable, self.adjusted)
    }

    /// Columns to read: coordinates, the target, and whatever the filter needs.
    pub fn columns(&self, config: &PipelineConfig) -> Vec<String> {
        let target = self.target_column();
        let mut columns = vec![
            config.latitude_column.clone(),
            config.longitude_column.clone(),
            qc_column(&target),
            target,
        ];
        if self.pres_min.is_some() || self.pres_max.is_some() {
            columns.push(config.pressure_column.clone());
        }
        if self.start.is_some() || self.end.is_some() {
            columns.push(config.time_column.clone());
        }
        columns
    }

    /// Conjunction of every requested condition. QC codes fall back to the
    /// configured accepted codes.
    pub fn filter(&self, schema: &Schema, config: &PipelineConfig) -> Result<Option<Predicate>> {
        let mut parts = Vec::new();

        let codes = self.qc_codes.as_ref().unwrap_or(&config.accepted_qc_codes);
        parts.push(Predicate::qc_in(&self.target_column(), codes)?);

        if let Some(min) = self.pres_min {
            parts.push(Predicate::ge(&config.pressure_column, min));
        }
        if let Some(max) = self.pres_max {
            parts.push(Predicate::le(&config.pressure_column, max));
        }

        if self.start.is_some() || self.end.is_some() {
            let unit = time_unit(schema, &config.time_column)?;
            if let Some(start) = self.start {
                parts.push(Predicate::ge(
                    &config.time_column,
                    Scalar::timestamp(start, unit)?,
                ));
            }
            if let Some(end) = self.end {
                parts.push(Predicate::le(
                    &config.time_column,
                    Scalar::timestamp(end, unit)?,
                ));
            }
        }

        if let Some(bbox) = &self.bbox {
            parts.push(Predicate::within(
                bbox,
                &config.latitude_column,
                &config.longitude_column,
            ));
        }

        Ok(Predicate::all(parts))
    }
}

fn time_unit(schema: &Schema, column: &str) -> Result<arrow::datatypes::TimeUnit> {
    let field = schema
        .field_with_name(column)
        .map_err(|_| ProcessingError::UnknownColumn {
            column: column.to_string(),
        })?;
    match ColumnKind::from_data_type(field.data_type()) {
        ColumnKind::Timestamp(unit) => Ok(unit),
        kind => Err(ProcessingError::InvalidPredicate(format!(
            "'{}' is {}, not a timestamp column",
            column, kind
        ))),
    }
}

/// Install the global subscriber: warnings by default, debug output with
/// `--verbose`, plain text into `log_file` when given.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    // Tests and embedding callers may have installed their own subscriber.
    if tracing::dispatcher::has_been_set() {
        debug!("Global subscriber already installed, keeping it");
        return Ok(());
    }

    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| ProcessingError::Config(format!("Failed to initialize logging: {}", e)))
}

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    let mut config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Info { dataset } => info(&dataset, &config),

        Commands::Map {
            dataset,
            variable,
            adjusted,
            pres_min,
            pres_max,
            qc_codes,
            start,
            end,
            bbox,
            serial,
            max_workers,
            output,
            compression,
            json,
        } => {
            if let Some(workers) = max_workers {
                config.max_workers = workers.max(1);
            }
            let request = MapRequest {
                variable,
                adjusted,
                pres_min,
                pres_max,
                qc_codes,
                start,
                end,
                bbox,
            };
            let output = output.map(|path| {
                path.unwrap_or_else(|| generate_default_output_filename(&request.target_column()))
            });

            map(dataset, request, &config, !serial, output, &compression, json).await
        }
    }
}

fn info(dataset: &Path, config: &PipelineConfig) -> Result<()> {
    println!("Dataset: {}", dataset.display());
    match DatasetName::from_path(dataset) {
        Ok(name) => {
            println!("- Sequence: {}", name.sequence);
            println!("- Domain: {}", name.domain);
            println!("- Source: {}", name.source);
            println!("- QC policy: {}", name.qc_policy);
        }
        Err(e) => println!("- {}", e),
    }

    let handle = DatasetHandle::open_with_options(dataset, None, config.dataset_options())?;

    let summaries = handle.partition_summaries()?;
    let total_rows: i64 = summaries.iter().map(|s| s.rows).sum();
    println!("\nPartitions: {} ({} rows)", summaries.len(), total_rows);
    for summary in &summaries {
        println!(
            "  {} - {} rows in {} row groups",
            summary.path.display(),
            summary.rows,
            summary.row_groups
        );
    }

    println!("\nColumns:");
    for field in handle.schema().fields() {
        println!(
            "  {:<24} {:<12} {}",
            field.name(),
            ColumnKind::from_data_type(field.data_type()),
            field.data_type()
        );
    }
    Ok(())
}

async fn map(
    dataset: PathBuf,
    request: MapRequest,
    config: &PipelineConfig,
    parallel: bool,
    output: Option<PathBuf>,
    compression: &str,
    json: bool,
) -> Result<()> {
    let target = request.target_column();
    let progress = ProgressReporter::new_spinner(&format!("Reading {}...", target), json);

    let columns = request.columns(config);
    let selection: Vec<&str> = columns.iter().map(String::as_str).collect();
    let handle =
        DatasetHandle::open_with_options(&dataset, Some(&selection), config.dataset_options())?;
    let handle = match request.filter(handle.schema(), config)? {
        Some(predicate) => handle.attach_filter(predicate)?,
        None => handle,
    };

    let rows = tokio::task::spawn_blocking(move || handle.materialize(parallel)).await??;

    progress.set_message(&format!("Averaging {} rows...", rows.num_rows()));
    let aggregated = SpatialAggregator::new().aggregate_mean(
        rows,
        &config.latitude_column,
        &config.longitude_column,
        &target,
    )?;
    progress.finish_with_message(&format!("Averaged {} locations", aggregated.len()));

    if json {
        let stdout = std::io::stdout();
        serde_json::to_writer_pretty(stdout.lock(), aggregated.rows())?;
        println!();
        return Ok(());
    }

    let stats = SummaryAnalyzer::new().summarize(&aggregated);
    println!("\n{}", stats.detailed_summary());

    if let Some(path) = output {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = ParquetWriter::new().with_compression(compression)?;
        writer.write_aggregated(&aggregated, &path)?;

        let file_info = writer.get_file_info(&path)?;
        println!("\nWrote {}", path.display());
        println!("{}", file_info.summary());
    }

    Ok(())
}
