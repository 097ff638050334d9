use arrow::datatypes::{DataType, TimeUnit};

/// Semantic class of a column, derived from its Arrow type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Integer,
    Timestamp(TimeUnit),
    Categorical,
    Unsupported,
}

impl ColumnKind {
    pub fn from_data_type(data_type: &DataType) -> Self {
        match data_type {
            DataType::Float16 | DataType::Float32 | DataType::Float64 => ColumnKind::Numeric,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => ColumnKind::Integer,
            DataType::Timestamp(unit, _) => ColumnKind::Timestamp(*unit),
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => ColumnKind::Categorical,
            DataType::Dictionary(_, value)
                if matches!(value.as_ref(), DataType::Utf8 | DataType::LargeUtf8) =>
            {
                ColumnKind::Categorical
            }
            _ => ColumnKind::Unsupported,
        }
    }

    /// Numeric and integer columns can both be read as `f64`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric | ColumnKind::Integer)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Integer => "integer",
            ColumnKind::Timestamp(TimeUnit::Second) => "timestamp[s]",
            ColumnKind::Timestamp(TimeUnit::Millisecond) => "timestamp[ms]",
            ColumnKind::Timestamp(TimeUnit::Microsecond) => "timestamp[us]",
            ColumnKind::Timestamp(TimeUnit::Nanosecond) => "timestamp[ns]",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.display_name())
    }
}
