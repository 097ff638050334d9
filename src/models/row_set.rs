use crate::error::{ProcessingError, Result};
use crate::models::ColumnKind;
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{DataType, Float64Type, SchemaRef};
use arrow::record_batch::RecordBatch;

/// Materialized rows of a dataset, held as a single Arrow batch.
///
/// A `RowSet` is never modified after construction; consumers that need a
/// different shape build a new structure from it.
#[derive(Debug, Clone)]
pub struct RowSet {
    batch: RecordBatch,
}

impl RowSet {
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    pub fn empty(schema: SchemaRef) -> Self {
        Self {
            batch: RecordBatch::new_empty(schema),
        }
    }

    /// Concatenate batches that share `schema`, preserving their order.
    pub fn from_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self> {
        let batch = concat_batches(&schema, batches)?;
        Ok(Self { batch })
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| ProcessingError::ColumnNotFound {
                column: name.to_string(),
            })
    }

    /// Read a numeric or integer column as `f64`; nulls become `None`.
    pub fn float_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self.column(name)?;
        let kind = ColumnKind::from_data_type(column.data_type());
        if !kind.is_numeric() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Column '{}' is {} and cannot be read as a number",
                name, kind
            )));
        }

        let as_f64 = cast(column, &DataType::Float64)?;
        let values = as_f64.as_primitive::<Float64Type>();
        let mut out = Vec::with_capacity(values.len());
        for i in 0..values.len() {
            out.push(if values.is_null(i) {
                None
            } else {
                Some(values.value(i))
            });
        }
        Ok(out)
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }
}

impl From<RecordBatch> for RowSet {
    fn from(batch: RecordBatch) -> Self {
        Self::new(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float32Array, Int8Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn sample() -> RowSet {
        let schema = Arc::new(Schema::new(vec![
            Field::new("TEMP", DataType::Float32, true),
            Field::new("TEMP_QC", DataType::Int8, false),
            Field::new("PLATFORM", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float32Array::from(vec![Some(12.5), None])),
                Arc::new(Int8Array::from(vec![1, 4])),
                Arc::new(StringArray::from(vec!["6901234", "6901235"])),
            ],
        )
        .unwrap();
        RowSet::new(batch)
    }

    #[test]
    fn test_float_values_casts_and_keeps_nulls() {
        let rows = sample();
        assert_eq!(rows.float_values("TEMP").unwrap(), vec![Some(12.5), None]);
        assert_eq!(
            rows.float_values("TEMP_QC").unwrap(),
            vec![Some(1.0), Some(4.0)]
        );
    }

    #[test]
    fn test_float_values_rejects_strings() {
        let rows = sample();
        assert!(matches!(
            rows.float_values("PLATFORM"),
            Err(ProcessingError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_missing_column() {
        let rows = sample();
        assert!(matches!(
            rows.column("DOXY"),
            Err(ProcessingError::ColumnNotFound { .. })
        ));
        assert_eq!(rows.column_names(), vec!["TEMP", "TEMP_QC", "PLATFORM"]);
    }
}
