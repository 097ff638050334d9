use crate::error::{ProcessingError, Result};
use crate::filters::{BoundingBox, Scalar};
use crate::models::ColumnKind;
use crate::utils::columns::qc_column;
use arrow::datatypes::{Schema, TimeUnit};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NotEq,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
        }
    }
}

/// Row filter expression: comparisons of a column against a constant,
/// combined with AND / OR.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: String,
        op: CompareOp,
        value: Scalar,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn compare(column: &str, op: CompareOp, value: impl Into<Scalar>) -> Self {
        Predicate::Compare {
            column: column.to_string(),
            op,
            value: value.into(),
        }
    }

    pub fn lt(column: &str, value: impl Into<Scalar>) -> Self {
        Self::compare(column, CompareOp::Lt, value)
    }

    pub fn le(column: &str, value: impl Into<Scalar>) -> Self {
        Self::compare(column, CompareOp::LtEq, value)
    }

    pub fn gt(column: &str, value: impl Into<Scalar>) -> Self {
        Self::compare(column, CompareOp::Gt, value)
    }

    pub fn ge(column: &str, value: impl Into<Scalar>) -> Self {
        Self::compare(column, CompareOp::GtEq, value)
    }

    pub fn eq(column: &str, value: impl Into<Scalar>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn ne(column: &str, value: impl Into<Scalar>) -> Self {
        Self::compare(column, CompareOp::NotEq, value)
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// Conjunction of all predicates, `None` when there are none.
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Option<Self> {
        predicates.into_iter().reduce(Predicate::and)
    }

    /// Disjunction of all predicates, `None` when there are none.
    pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Option<Self> {
        predicates.into_iter().reduce(Predicate::or)
    }

    /// `low <= column <= high`
    pub fn between(column: &str, low: impl Into<Scalar>, high: impl Into<Scalar>) -> Self {
        Self::ge(column, low).and(Self::le(column, high))
    }

    /// Accept rows whose `{variable}_QC` code is one of `codes`.
    pub fn qc_in(variable: &str, codes: &[i64]) -> Result<Self> {
        let column = qc_column(variable);
        Self::any(codes.iter().map(|code| Self::eq(&column, *code))).ok_or_else(|| {
            ProcessingError::InvalidPredicate(format!(
                "no accepted QC codes given for '{}'",
                column
            ))
        })
    }

    /// `{variable}_QC == 1`
    pub fn qc_good(variable: &str) -> Self {
        Self::eq(&qc_column(variable), crate::utils::QC_GOOD)
    }

    /// Inclusive time window on a timestamp column of resolution `unit`.
    pub fn time_window(
        column: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        unit: TimeUnit,
    ) -> Result<Self> {
        Ok(Self::between(
            column,
            Scalar::timestamp(start, unit)?,
            Scalar::timestamp(end, unit)?,
        ))
    }

    /// Inclusive geographic box over the latitude and longitude columns.
    pub fn within(bbox: &BoundingBox, latitude: &str, longitude: &str) -> Self {
        Self::between(latitude, bbox.min_lat, bbox.max_lat).and(Self::between(
            longitude,
            bbox.min_lon,
            bbox.max_lon,
        ))
    }

    /// Names of all columns the expression reads.
    pub fn columns(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Predicate::Compare { column, .. } => {
                out.insert(column.as_str());
            }
            Predicate::And(l, r) | Predicate::Or(l, r) => {
                l.collect_columns(out);
                r.collect_columns(out);
            }
        }
    }

    /// Check column membership and constant types against the dataset.
    pub fn validate(&self, schema: &Schema, selected: &[String]) -> Result<()> {
        match self {
            Predicate::Compare { column, op, value } => {
                if !selected.iter().any(|s| s == column) {
                    return Err(ProcessingError::UnknownColumn {
                        column: column.clone(),
                    });
                }
                let field = schema.field_with_name(column).map_err(|_| {
                    ProcessingError::UnknownColumn {
                        column: column.clone(),
                    }
                })?;
                let kind = ColumnKind::from_data_type(field.data_type());
                check_constant(column, *op, kind, value)
            }
            Predicate::And(l, r) | Predicate::Or(l, r) => {
                l.validate(schema, selected)?;
                r.validate(schema, selected)
            }
        }
    }
}

fn check_constant(column: &str, op: CompareOp, kind: ColumnKind, value: &Scalar) -> Result<()> {
    let accepted = match (kind, value) {
        (ColumnKind::Numeric | ColumnKind::Integer, Scalar::Float(v)) => !v.is_nan(),
        (ColumnKind::Numeric | ColumnKind::Integer, Scalar::Int(_)) => true,
        (ColumnKind::Timestamp(column_unit), Scalar::Timestamp { unit, .. }) => {
            column_unit == *unit
        }
        (ColumnKind::Categorical, Scalar::Utf8(_)) => true,
        _ => false,
    };

    if accepted {
        Ok(())
    } else {
        Err(ProcessingError::InvalidPredicate(format!(
            "cannot compare {} column '{}' {} {} constant {}",
            kind,
            column,
            op.symbol(),
            value.type_name(),
            value
        )))
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Compare { column, op, value } => {
                write!(f, "{} {} {}", column, op.symbol(), value)
            }
            Predicate::And(l, r) => write!(f, "({}) AND ({})", l, r),
            Predicate::Or(l, r) => write!(f, "({}) OR ({})", l, r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field};
    use chrono::TimeZone;

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("PRES", DataType::Float32, true),
            Field::new("DOXY_QC", DataType::Int8, true),
            Field::new(
                "JULD",
                DataType::Timestamp(TimeUnit::Nanosecond, None),
                true,
            ),
            Field::new("PLATFORM_NUMBER", DataType::Utf8, true),
        ])
    }

    fn all_selected() -> Vec<String> {
        ["PRES", "DOXY_QC", "JULD", "PLATFORM_NUMBER"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_display_and_columns() {
        let p = Predicate::le("PRES", 50.0).and(Predicate::qc_good("DOXY"));
        assert_eq!(p.to_string(), "(PRES <= 50) AND (DOXY_QC == 1)");
        assert_eq!(
            p.columns().into_iter().collect::<Vec<_>>(),
            vec!["DOXY_QC", "PRES"]
        );
    }

    #[test]
    fn test_all_and_any() {
        assert!(Predicate::all(Vec::new()).is_none());
        let p = Predicate::all(vec![
            Predicate::gt("PRES", 1.0),
            Predicate::lt("PRES", 2.0),
            Predicate::ne("PRES", 1.5),
        ])
        .unwrap();
        assert_eq!(p.to_string(), "((PRES > 1) AND (PRES < 2)) AND (PRES != 1.5)");

        let qc = Predicate::qc_in("DOXY", &[1, 2]).unwrap();
        assert_eq!(qc.to_string(), "(DOXY_QC == 1) OR (DOXY_QC == 2)");
        assert!(Predicate::qc_in("DOXY", &[]).is_err());
    }

    #[test]
    fn test_validate_unknown_column() {
        let schema = schema();
        let selected = vec!["PRES".to_string()];
        let p = Predicate::le("PRES", 50.0).and(Predicate::qc_good("DOXY"));

        match p.validate(&schema, &selected) {
            Err(ProcessingError::UnknownColumn { column }) => assert_eq!(column, "DOXY_QC"),
            other => panic!("expected UnknownColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_constant_types() {
        let schema = schema();
        let selected = all_selected();

        assert!(Predicate::le("PRES", 50).validate(&schema, &selected).is_ok());
        assert!(Predicate::eq("DOXY_QC", 1.0)
            .validate(&schema, &selected)
            .is_ok());
        assert!(Predicate::eq("PLATFORM_NUMBER", "6901234")
            .validate(&schema, &selected)
            .is_ok());

        for bad in [
            Predicate::le("PRES", "50"),
            Predicate::le("PRES", f64::NAN),
            Predicate::eq("PLATFORM_NUMBER", 6901234),
            Predicate::ge("JULD", 0),
        ] {
            assert!(
                matches!(
                    bad.validate(&schema, &selected),
                    Err(ProcessingError::InvalidPredicate(_))
                ),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_timestamp_resolution_must_match() {
        let schema = schema();
        let selected = all_selected();
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2020, 12, 31, 23, 59, 59).unwrap();

        let ns = Predicate::time_window("JULD", start, end, TimeUnit::Nanosecond).unwrap();
        assert!(ns.validate(&schema, &selected).is_ok());

        let ms = Predicate::time_window("JULD", start, end, TimeUnit::Millisecond).unwrap();
        assert!(matches!(
            ms.validate(&schema, &selected),
            Err(ProcessingError::InvalidPredicate(_))
        ));
    }
}
