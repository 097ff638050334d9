use crate::filters::{CompareOp, Predicate, Scalar};
use arrow::datatypes::{DataType, Schema, TimeUnit};
use parquet::file::metadata::RowGroupMetaData;
use parquet::file::statistics::Statistics;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Int(i64),
    Float(f64),
}

/// Inclusive min/max of one column within a row group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRange {
    pub min: StatValue,
    pub max: StatValue,
}

impl ColumnRange {
    pub fn new(min: StatValue, max: StatValue) -> Self {
        Self { min, max }
    }

    /// False only when no value in `[min, max]` can satisfy `op value`.
    pub fn might_satisfy(&self, op: CompareOp, value: &Scalar) -> bool {
        let (Some(min), Some(max)) = (compare(self.min, value), compare(self.max, value)) else {
            return true;
        };

        match op {
            CompareOp::Lt => min == Ordering::Less,
            CompareOp::LtEq => min != Ordering::Greater,
            CompareOp::Gt => max == Ordering::Greater,
            CompareOp::GtEq => max != Ordering::Less,
            CompareOp::Eq => min != Ordering::Greater && max != Ordering::Less,
            // NaN rows never appear in statistics but do satisfy `!=`.
            CompareOp::NotEq => true,
        }
    }
}

fn compare(stat: StatValue, value: &Scalar) -> Option<Ordering> {
    match (stat, value) {
        (StatValue::Int(s), Scalar::Int(v)) => Some(s.cmp(v)),
        (StatValue::Int(s), Scalar::Timestamp { value: v, .. }) => Some(s.cmp(v)),
        (StatValue::Int(s), Scalar::Float(v)) => (s as f64).partial_cmp(v),
        (StatValue::Float(s), other) => other.as_f64().and_then(|v| s.partial_cmp(&v)),
        _ => None,
    }
}

/// Column ranges usable for skipping one Parquet row group.
#[derive(Debug, Clone, Default)]
pub struct RowGroupStats {
    columns: HashMap<String, ColumnRange>,
}

impl RowGroupStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: &str, range: ColumnRange) {
        self.columns.insert(column.to_string(), range);
    }

    pub fn get(&self, column: &str) -> Option<&ColumnRange> {
        self.columns.get(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Collect min/max for top-level columns whose Parquet statistics are
    /// directly comparable with predicate constants: signed integers,
    /// 32/64-bit floats and sub-second timestamps.
    pub fn from_row_group(row_group: &RowGroupMetaData, schema: &Schema) -> Self {
        let mut stats = Self::new();

        for chunk in row_group.columns() {
            let name = chunk.column_path().string();
            let Ok(field) = schema.field_with_name(&name) else {
                continue;
            };
            let Some(statistics) = chunk.statistics() else {
                continue;
            };
            if let Some(range) = range_for(field.data_type(), statistics) {
                stats.insert(&name, range);
            }
        }

        stats
    }
}

fn range_for(data_type: &DataType, statistics: &Statistics) -> Option<ColumnRange> {
    match (data_type, statistics) {
        (
            DataType::Int8 | DataType::Int16 | DataType::Int32,
            Statistics::Int32(s),
        ) => Some(ColumnRange::new(
            StatValue::Int(*s.min_opt()? as i64),
            StatValue::Int(*s.max_opt()? as i64),
        )),
        (DataType::Int64, Statistics::Int64(s)) => Some(ColumnRange::new(
            StatValue::Int(*s.min_opt()?),
            StatValue::Int(*s.max_opt()?),
        )),
        // Second-resolution timestamps are stored as milliseconds.
        (
            DataType::Timestamp(
                TimeUnit::Millisecond | TimeUnit::Microsecond | TimeUnit::Nanosecond,
                _,
            ),
            Statistics::Int64(s),
        ) => Some(ColumnRange::new(
            StatValue::Int(*s.min_opt()?),
            StatValue::Int(*s.max_opt()?),
        )),
        (DataType::Float32, Statistics::Float(s)) => {
            float_range(*s.min_opt()? as f64, *s.max_opt()? as f64)
        }
        (DataType::Float64, Statistics::Double(s)) => float_range(*s.min_opt()?, *s.max_opt()?),
        _ => None,
    }
}

fn float_range(min: f64, max: f64) -> Option<ColumnRange> {
    if min.is_nan() || max.is_nan() {
        return None;
    }
    Some(ColumnRange::new(StatValue::Float(min), StatValue::Float(max)))
}

impl Predicate {
    /// Whether a row group with these statistics may contain matching rows.
    pub fn might_match(&self, stats: &RowGroupStats) -> bool {
        match self {
            Predicate::Compare { column, op, value } => match stats.get(column) {
                Some(range) => range.might_satisfy(*op, value),
                None => true,
            },
            Predicate::And(l, r) => l.might_match(stats) && r.might_match(stats),
            Predicate::Or(l, r) => l.might_match(stats) || r.might_match(stats),
        }
    }
}
