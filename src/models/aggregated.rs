use crate::error::Result;
use crate::models::RowSet;
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One averaged location. `value` is `None` when every contributing
/// measurement was missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub latitude: f64,
    pub longitude: f64,
    pub value: Option<f64>,
}

impl AggregatedRow {
    pub fn new(latitude: f64, longitude: f64, value: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            value,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

/// Output of spatial aggregation: one row per distinct location, in the
/// order each location was first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRowSet {
    latitude_column: String,
    longitude_column: String,
    value_column: String,
    rows: Vec<AggregatedRow>,
}

impl AggregatedRowSet {
    pub fn new(
        latitude_column: &str,
        longitude_column: &str,
        value_column: &str,
        rows: Vec<AggregatedRow>,
    ) -> Self {
        Self {
            latitude_column: latitude_column.to_string(),
            longitude_column: longitude_column.to_string(),
            value_column: value_column.to_string(),
            rows,
        }
    }

    pub fn latitude_column(&self) -> &str {
        &self.latitude_column
    }

    pub fn longitude_column(&self) -> &str {
        &self.longitude_column
    }

    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    pub fn rows(&self) -> &[AggregatedRow] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregatedRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new(&self.latitude_column, DataType::Float64, false),
            Field::new(&self.longitude_column, DataType::Float64, false),
            Field::new(&self.value_column, DataType::Float64, true),
        ]))
    }

    /// Columns keep the names they had in the source rows.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let latitudes: Vec<f64> = self.rows.iter().map(|r| r.latitude).collect();
        let longitudes: Vec<f64> = self.rows.iter().map(|r| r.longitude).collect();
        let values: Vec<Option<f64>> = self.rows.iter().map(|r| r.value).collect();

        let batch = RecordBatch::try_new(
            self.schema(),
            vec![
                Arc::new(Float64Array::from(latitudes)),
                Arc::new(Float64Array::from(longitudes)),
                Arc::new(Float64Array::from(values)),
            ],
        )?;
        Ok(batch)
    }

    pub fn into_row_set(self) -> Result<RowSet> {
        Ok(RowSet::new(self.to_record_batch()?))
    }
}

impl IntoIterator for AggregatedRowSet {
    type Item = AggregatedRow;
    type IntoIter = std::vec::IntoIter<AggregatedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;

    #[test]
    fn test_record_batch_keeps_column_names_and_missing_values() {
        let set = AggregatedRowSet::new(
            "LATITUDE",
            "LONGITUDE",
            "DOXY",
            vec![
                AggregatedRow::new(10.0, -20.0, Some(6.0)),
                AggregatedRow::new(30.0, 40.0, None),
            ],
        );

        let batch = set.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().field(2).name(), "DOXY");
        assert_eq!(batch.column(2).null_count(), 1);

        let rows = set.into_row_set().unwrap();
        assert_eq!(
            rows.float_values("DOXY").unwrap(),
            vec![Some(6.0), None]
        );
    }
}
