use crate::error::{ProcessingError, Result};
use crate::filters::Predicate;
use crate::models::RowSet;
use crate::readers::{ConcurrentReader, PartitionReader};
use crate::utils::constants::{DEFAULT_BATCH_SIZE, PARTITION_EXTENSION};
use arrow::datatypes::{Field, Schema, SchemaRef};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetOptions {
    pub recursive: bool,
    pub max_workers: usize,
    pub batch_size: usize,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            max_workers: num_cpus::get(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl DatasetOptions {
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Footer facts for one partition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSummary {
    pub path: PathBuf,
    pub rows: i64,
    pub row_groups: usize,
}

/// A directory of Parquet partitions read as one logical table.
///
/// The handle is immutable apart from the attached filter. Attaching a
/// filter replaces the previous one; callers combine conditions with
/// [`Predicate::and`] before attaching.
#[derive(Debug, Clone)]
pub struct DatasetHandle {
    base_path: PathBuf,
    partitions: Vec<PathBuf>,
    schema: SchemaRef,
    selected: Vec<String>,
    filter: Option<Predicate>,
    options: DatasetOptions,
}

impl DatasetHandle {
    pub fn open(path: impl AsRef<Path>, selected: Option<&[&str]>) -> Result<Self> {
        Self::open_with_options(path, selected, DatasetOptions::default())
    }

    pub fn open_with_options(
        path: impl AsRef<Path>,
        selected: Option<&[&str]>,
        options: DatasetOptions,
    ) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        let partitions = discover_partitions(&base_path, options.recursive)?;
        if partitions.is_empty() {
            return Err(ProcessingError::PathNotFound { path: base_path });
        }

        let schema = unify_schemas(&partitions)?;

        let selected: Vec<String> = match selected {
            None => schema.fields().iter().map(|f| f.name().clone()).collect(),
            Some(columns) => {
                if columns.is_empty() {
                    return Err(ProcessingError::Config(
                        "At least one column must be selected".to_string(),
                    ));
                }
                let mut out: Vec<String> = Vec::with_capacity(columns.len());
                for column in columns {
                    if schema.field_with_name(column).is_err() {
                        return Err(ProcessingError::UnknownColumn {
                            column: column.to_string(),
                        });
                    }
                    if !out.iter().any(|c| c == column) {
                        out.push(column.to_string());
                    }
                }
                out
            }
        };

        info!(
            path = %base_path.display(),
            partitions = partitions.len(),
            columns = schema.fields().len(),
            selected = selected.len(),
            "Opened dataset"
        );

        Ok(Self {
            base_path,
            partitions,
            schema,
            selected,
            filter: None,
            options,
        })
    }

    /// Bind `predicate` for evaluation at read time, replacing any filter
    /// attached earlier.
    pub fn attach_filter(mut self, predicate: Predicate) -> Result<Self> {
        predicate.validate(&self.schema, &self.selected)?;

        if let Some(previous) = &self.filter {
            debug!(previous = %previous, replacement = %predicate, "Replacing attached filter");
        } else {
            debug!(filter = %predicate, "Attached filter");
        }
        self.filter = Some(predicate);
        Ok(self)
    }

    pub fn clear_filter(mut self) -> Self {
        self.filter = None;
        self
    }

    /// Read every row that satisfies the attached filter, restricted to the
    /// selected columns. Output is identical for serial and parallel reads.
    pub fn materialize(&self, parallel: bool) -> Result<RowSet> {
        let started = Instant::now();
        let output_schema = self.output_schema()?;
        let reader = PartitionReader::new(
            output_schema.clone(),
            self.filter.as_ref(),
            self.options.batch_size,
        );

        let workers = if parallel { self.options.max_workers } else { 1 };
        let scans = ConcurrentReader::new(workers).read_partitions(&self.partitions, &reader)?;

        let mut row_groups_total = 0;
        let mut row_groups_read = 0;
        let mut rows_scanned = 0;
        let mut batches = Vec::new();
        for scan in scans {
            row_groups_total += scan.row_groups_total;
            row_groups_read += scan.row_groups_read;
            rows_scanned += scan.rows_scanned;
            batches.extend(scan.batches);
        }

        let rows = RowSet::from_batches(output_schema, &batches)?;

        info!(
            partitions = self.partitions.len(),
            workers,
            row_groups_read,
            row_groups_total,
            rows_scanned,
            rows_kept = rows.num_rows(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Materialized dataset"
        );

        Ok(rows)
    }

    /// Row and row-group counts from each partition footer.
    pub fn partition_summaries(&self) -> Result<Vec<PartitionSummary>> {
        self.partitions
            .iter()
            .map(|path| -> Result<PartitionSummary> {
                let reader = SerializedFileReader::new(File::open(path)?)?;
                let metadata = reader.metadata();
                Ok(PartitionSummary {
                    path: path.clone(),
                    rows: metadata.file_metadata().num_rows(),
                    row_groups: metadata.num_row_groups(),
                })
            })
            .collect()
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn partitions(&self) -> &[PathBuf] {
        &self.partitions
    }

    /// Unified schema across all partitions.
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn selected_columns(&self) -> &[String] {
        &self.selected
    }

    pub fn filter(&self) -> Option<&Predicate> {
        self.filter.as_ref()
    }

    pub fn options(&self) -> &DatasetOptions {
        &self.options
    }

    /// Unified schema projected to the selection, in selection order.
    pub fn output_schema(&self) -> Result<SchemaRef> {
        let fields = self
            .selected
            .iter()
            .map(|name| {
                self.schema
                    .field_with_name(name)
                    .cloned()
                    .map_err(|_| ProcessingError::UnknownColumn {
                        column: name.clone(),
                    })
            })
            .collect::<Result<Vec<Field>>>()?;
        Ok(Arc::new(Schema::new(fields)))
    }
}

fn is_partition_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(PARTITION_EXTENSION))
}

/// Partition files under `path`, sorted for a stable read order.
fn discover_partitions(path: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(ProcessingError::PathNotFound {
            path: path.to_path_buf(),
        });
    }
    if path.is_file() {
        return Ok(if is_partition_file(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let mut files = Vec::new();
    let mut pending = vec![path.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let entry_path = entry.path();

            if entry_path.is_dir() {
                if recursive {
                    pending.push(entry_path);
                }
            } else if is_partition_file(&entry_path) {
                files.push(entry_path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Merge partition schemas in first-seen column order. Every column is
/// nullable in the result since partitions may lack some columns.
fn unify_schemas(partitions: &[PathBuf]) -> Result<SchemaRef> {
    let mut fields: Vec<Field> = Vec::new();

    for path in partitions {
        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
        for field in builder.schema().fields() {
            match fields.iter().find(|f| f.name() == field.name()) {
                Some(existing) if existing.data_type() != field.data_type() => {
                    return Err(ProcessingError::SchemaMismatch {
                        column: field.name().clone(),
                        expected: existing.data_type().to_string(),
                        found: field.data_type().to_string(),
                        partition: path.clone(),
                    });
                }
                Some(_) => {}
                None => fields.push(field.as_ref().clone().with_nullable(true)),
            }
        }
    }

    Ok(Arc::new(Schema::new(fields)))
}
