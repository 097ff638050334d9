use crate::error::{ProcessingError, Result};
use crate::filters::{CompareOp, Predicate, Scalar};
use crate::models::ColumnKind;
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Datum, Float64Array, Int64Array, StringArray,
};
use arrow::compute::kernels::cmp;
use arrow::compute::{and_kleene, cast, filter_record_batch, or_kleene};
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;

impl Predicate {
    /// Row-level truth values for `batch`. Null means "unknown" and is
    /// treated as not matching by [`Predicate::filter_batch`].
    pub fn evaluate(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        match self {
            Predicate::Compare { column, op, value } => {
                let array =
                    batch
                        .column_by_name(column)
                        .ok_or_else(|| ProcessingError::ColumnNotFound {
                            column: column.clone(),
                        })?;
                compare_column(column, array, *op, value)
            }
            Predicate::And(l, r) => Ok(and_kleene(&l.evaluate(batch)?, &r.evaluate(batch)?)?),
            Predicate::Or(l, r) => Ok(or_kleene(&l.evaluate(batch)?, &r.evaluate(batch)?)?),
        }
    }

    /// Keep only the rows of `batch` the predicate accepts.
    pub fn filter_batch(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mask = self.evaluate(batch)?;
        Ok(filter_record_batch(batch, &mask)?)
    }
}

fn compare_column(
    column: &str,
    array: &ArrayRef,
    op: CompareOp,
    value: &Scalar,
) -> Result<BooleanArray> {
    let kind = ColumnKind::from_data_type(array.data_type());
    match (kind, value) {
        (ColumnKind::Integer, Scalar::Int(v)) => {
            let lhs = cast(array, &DataType::Int64)?;
            apply(op, &lhs, &Int64Array::new_scalar(*v))
        }
        (ColumnKind::Numeric | ColumnKind::Integer, Scalar::Float(_) | Scalar::Int(_)) => {
            let target = value.as_f64().unwrap_or(f64::NAN);
            let lhs = cast(array, &DataType::Float64)?;
            let matched = apply(op, &lhs, &Float64Array::new_scalar(target))?;
            // Arrow orders NaN above every number; only `!=` may accept it.
            if op == CompareOp::NotEq {
                Ok(matched)
            } else {
                let not_nan: BooleanArray = lhs
                    .as_primitive::<Float64Type>()
                    .iter()
                    .map(|v| v.map(|x| !x.is_nan()))
                    .collect();
                Ok(and_kleene(&matched, &not_nan)?)
            }
        }
        (ColumnKind::Timestamp(unit), Scalar::Timestamp { value: v, unit: u }) if unit == *u => {
            let lhs = cast(array, &DataType::Int64)?;
            apply(op, &lhs, &Int64Array::new_scalar(*v))
        }
        (ColumnKind::Categorical, Scalar::Utf8(s)) => {
            let lhs = cast(array, &DataType::Utf8)?;
            apply(op, &lhs, &StringArray::new_scalar(s.as_str()))
        }
        _ => Err(ProcessingError::InvalidPredicate(format!(
            "cannot compare {} column '{}' with {} constant {}",
            kind,
            column,
            value.type_name(),
            value
        ))),
    }
}

fn apply(op: CompareOp, lhs: &dyn Datum, rhs: &dyn Datum) -> Result<BooleanArray> {
    let result = match op {
        CompareOp::Lt => cmp::lt(lhs, rhs),
        CompareOp::LtEq => cmp::lt_eq(lhs, rhs),
        CompareOp::Gt => cmp::gt(lhs, rhs),
        CompareOp::GtEq => cmp::gt_eq(lhs, rhs),
        CompareOp::Eq => cmp::eq(lhs, rhs),
        CompareOp::NotEq => cmp::neq(lhs, rhs),
    }?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float32Array, Int8Array, TimestampSecondArray};
    use arrow::datatypes::{Field, Schema, TimeUnit};
    use std::sync::Arc;

    fn profile_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("PRES", DataType::Float32, true),
            Field::new("DOXY_QC", DataType::Int8, true),
            Field::new("JULD", DataType::Timestamp(TimeUnit::Second, None), true),
            Field::new("DATA_MODE", DataType::Utf8, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float32Array::from(vec![
                    Some(10.0),
                    Some(60.0),
                    Some(50.0),
                    Some(f32::NAN),
                    None,
                ])),
                Arc::new(Int8Array::from(vec![Some(1), Some(1), Some(2), Some(1), Some(1)])),
                Arc::new(TimestampSecondArray::from(vec![100, 200, 300, 400, 500])),
                Arc::new(StringArray::from(vec!["R", "D", "D", "A", "R"])),
            ],
        )
        .unwrap()
    }

    fn selected(mask: &BooleanArray) -> Vec<usize> {
        (0..mask.len())
            .filter(|&i| mask.is_valid(i) && mask.value(i))
            .collect()
    }

    #[test]
    fn test_pressure_and_qc() {
        let batch = profile_batch();
        let p = Predicate::le("PRES", 50.0).and(Predicate::qc_good("DOXY"));
        let mask = p.evaluate(&batch).unwrap();
        assert_eq!(selected(&mask), vec![0]);

        let filtered = p.filter_batch(&batch).unwrap();
        assert_eq!(filtered.num_rows(), 1);
    }

    #[test]
    fn test_bounds_are_inclusive_or_exclusive_by_operator() {
        let batch = profile_batch();
        let le = Predicate::le("PRES", 50.0).evaluate(&batch).unwrap();
        let lt = Predicate::lt("PRES", 50.0).evaluate(&batch).unwrap();
        assert_eq!(selected(&le), vec![0, 2]);
        assert_eq!(selected(&lt), vec![0]);
    }

    #[test]
    fn test_nan_and_null_handling() {
        let batch = profile_batch();
        let gt = Predicate::gt("PRES", 0.0).evaluate(&batch).unwrap();
        assert_eq!(selected(&gt), vec![0, 1, 2]);

        let ne = Predicate::ne("PRES", 10.0).evaluate(&batch).unwrap();
        assert_eq!(selected(&ne), vec![1, 2, 3]);
    }

    #[test]
    fn test_or_with_kleene_logic() {
        let batch = profile_batch();
        // Row 4 has a null pressure but passes through the DATA_MODE branch.
        let p = Predicate::gt("PRES", 55.0).or(Predicate::eq("DATA_MODE", "R"));
        let mask = p.evaluate(&batch).unwrap();
        assert_eq!(selected(&mask), vec![0, 1, 4]);
    }

    #[test]
    fn test_integer_column_with_float_constant() {
        let batch = profile_batch();
        let mask = Predicate::lt("DOXY_QC", 1.5).evaluate(&batch).unwrap();
        assert_eq!(selected(&mask), vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_timestamp_window() {
        let batch = profile_batch();
        let p = Predicate::between(
            "JULD",
            Scalar::Timestamp {
                value: 200,
                unit: TimeUnit::Second,
            },
            Scalar::Timestamp {
                value: 400,
                unit: TimeUnit::Second,
            },
        );
        assert_eq!(selected(&p.evaluate(&batch).unwrap()), vec![1, 2, 3]);

        let wrong_unit = Predicate::ge(
            "JULD",
            Scalar::Timestamp {
                value: 200_000,
                unit: TimeUnit::Millisecond,
            },
        );
        assert!(matches!(
            wrong_unit.evaluate(&batch),
            Err(ProcessingError::InvalidPredicate(_))
        ));
    }

    #[test]
    fn test_disjoint_ranges_match_nothing() {
        let batch = profile_batch();
        let p = Predicate::lt("PRES", 5.0).and(Predicate::gt("PRES", 100.0));
        assert_eq!(p.filter_batch(&batch).unwrap().num_rows(), 0);
    }

    #[test]
    fn test_missing_column() {
        let batch = profile_batch();
        assert!(matches!(
            Predicate::eq("TEMP_QC", 1).evaluate(&batch),
            Err(ProcessingError::ColumnNotFound { .. })
        ));
    }
}
