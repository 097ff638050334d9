use crate::error::Result;
use crate::filters::{Predicate, RowGroupStats};
use arrow::array::{new_null_array, ArrayRef};
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Rows surviving the predicate in one partition, plus scan counters.
#[derive(Debug, Default)]
pub struct PartitionScan {
    pub batches: Vec<RecordBatch>,
    pub row_groups_total: usize,
    pub row_groups_read: usize,
    pub rows_scanned: usize,
}

impl PartitionScan {
    pub fn rows_kept(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }
}

/// Reads a single partition file into batches shaped like `output_schema`.
pub struct PartitionReader<'a> {
    output_schema: SchemaRef,
    predicate: Option<&'a Predicate>,
    batch_size: usize,
}

impl<'a> PartitionReader<'a> {
    pub fn new(
        output_schema: SchemaRef,
        predicate: Option<&'a Predicate>,
        batch_size: usize,
    ) -> Self {
        Self {
            output_schema,
            predicate,
            batch_size: batch_size.max(1),
        }
    }

    pub fn output_schema(&self) -> &SchemaRef {
        &self.output_schema
    }

    pub fn read(&self, path: &Path) -> Result<PartitionScan> {
        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let file_schema = builder.schema().clone();
        let metadata = builder.metadata().clone();

        let mut scan = PartitionScan {
            row_groups_total: metadata.num_row_groups(),
            ..Default::default()
        };

        let row_groups: Vec<usize> = (0..metadata.num_row_groups())
            .filter(|&i| match self.predicate {
                Some(predicate) => predicate
                    .might_match(&RowGroupStats::from_row_group(metadata.row_group(i), &file_schema)),
                None => true,
            })
            .collect();
        scan.row_groups_read = row_groups.len();

        if row_groups.is_empty() {
            debug!(
                partition = %path.display(),
                row_groups = scan.row_groups_total,
                "Partition skipped by column statistics"
            );
            return Ok(scan);
        }
        if row_groups.len() < scan.row_groups_total {
            debug!(
                partition = %path.display(),
                kept = row_groups.len(),
                total = scan.row_groups_total,
                "Row groups pruned by column statistics"
            );
        }

        let roots: Vec<usize> = self
            .output_schema
            .fields()
            .iter()
            .filter_map(|f| file_schema.index_of(f.name()).ok())
            .collect();

        // None of the selected columns exist in this file: every value is null.
        if roots.is_empty() {
            let rows: i64 = row_groups
                .iter()
                .map(|&i| metadata.row_group(i).num_rows())
                .sum();
            let empty = RecordBatch::try_new_with_options(
                Arc::new(Schema::empty()),
                vec![],
                &RecordBatchOptions::new().with_row_count(Some(rows as usize)),
            )?;
            scan.rows_scanned = empty.num_rows();
            self.keep(self.align(&empty)?, &mut scan)?;
            return Ok(scan);
        }

        let mask = ProjectionMask::roots(builder.parquet_schema(), roots);
        let reader = builder
            .with_row_groups(row_groups)
            .with_projection(mask)
            .with_batch_size(self.batch_size)
            .build()?;

        for batch in reader {
            let batch = batch?;
            scan.rows_scanned += batch.num_rows();
            self.keep(self.align(&batch)?, &mut scan)?;
        }

        Ok(scan)
    }

    fn keep(&self, batch: RecordBatch, scan: &mut PartitionScan) -> Result<()> {
        let batch = match self.predicate {
            Some(predicate) => predicate.filter_batch(&batch)?,
            None => batch,
        };
        if batch.num_rows() > 0 {
            scan.batches.push(batch);
        }
        Ok(())
    }

    /// Reorder columns to the selection and fill absent ones with nulls.
    fn align(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let columns: Vec<ArrayRef> = self
            .output_schema
            .fields()
            .iter()
            .map(|field| match batch.column_by_name(field.name()) {
                Some(column) => column.clone(),
                None => new_null_array(field.data_type(), batch.num_rows()),
            })
            .collect();

        let aligned = RecordBatch::try_new_with_options(
            self.output_schema.clone(),
            columns,
            &RecordBatchOptions::new().with_row_count(Some(batch.num_rows())),
        )?;
        Ok(aligned)
    }
}
