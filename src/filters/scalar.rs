use crate::error::{ProcessingError, Result};
use arrow::datatypes::TimeUnit;
use chrono::{DateTime, Utc};

/// A constant on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Float(f64),
    Int(i64),
    /// Ticks since the Unix epoch in `unit`.
    Timestamp { value: i64, unit: TimeUnit },
    Utf8(String),
}

impl Scalar {
    /// Express `instant` in the resolution of a timestamp column. Instants
    /// finer than `unit` are rejected rather than truncated.
    pub fn timestamp(instant: DateTime<Utc>, unit: TimeUnit) -> Result<Self> {
        let nanos_per_tick = match unit {
            TimeUnit::Second => 1_000_000_000,
            TimeUnit::Millisecond => 1_000_000,
            TimeUnit::Microsecond => 1_000,
            TimeUnit::Nanosecond => 1,
        };
        if instant.timestamp_subsec_nanos() % nanos_per_tick != 0 {
            return Err(ProcessingError::InvalidPredicate(format!(
                "{} is finer than {:?} resolution",
                instant, unit
            )));
        }

        let value = match unit {
            TimeUnit::Second => Some(instant.timestamp()),
            TimeUnit::Millisecond => Some(instant.timestamp_millis()),
            TimeUnit::Microsecond => Some(instant.timestamp_micros()),
            TimeUnit::Nanosecond => instant.timestamp_nanos_opt(),
        }
        .ok_or_else(|| {
            ProcessingError::InvalidPredicate(format!(
                "{} cannot be represented with {:?} resolution",
                instant, unit
            ))
        })?;
        Ok(Scalar::Timestamp { value, unit })
    }

    /// The value as `f64` for numeric constants.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(*v),
            Scalar::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Float(_) => "float",
            Scalar::Int(_) => "integer",
            Scalar::Timestamp { .. } => "timestamp",
            Scalar::Utf8(_) => "string",
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Timestamp { value, unit } => {
                let rendered = match unit {
                    TimeUnit::Second => DateTime::from_timestamp(*value, 0),
                    TimeUnit::Millisecond => DateTime::from_timestamp_millis(*value),
                    TimeUnit::Microsecond => DateTime::from_timestamp_micros(*value),
                    TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(*value)),
                };
                match rendered {
                    Some(dt) => write!(f, "{}", dt.to_rfc3339()),
                    None => write!(f, "{}{:?}", value, unit),
                }
            }
            Scalar::Utf8(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(value as f64)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<u8> for Scalar {
    fn from(value: u8) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Utf8(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Utf8(value)
    }
}
