use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("No partition files found at {}", path.display())]
    PathNotFound { path: PathBuf },

    #[error("Schema mismatch for column '{column}': {expected} in one partition, {found} in {}", partition.display())]
    SchemaMismatch {
        column: String,
        expected: String,
        found: String,
        partition: PathBuf,
    },

    #[error("Unknown column '{column}' (not in the selected columns)")]
    UnknownColumn { column: String },

    #[error("Column '{column}' not found")]
    ColumnNotFound { column: String },

    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
