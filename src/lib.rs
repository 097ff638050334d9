pub mod analyzers;
pub mod cli;
pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use config::PipelineConfig;
pub use error::{ProcessingError, Result};
pub use filters::{BoundingBox, CompareOp, Predicate, Scalar};
pub use models::{AggregatedRow, AggregatedRowSet, RowSet};
pub use processors::SpatialAggregator;
pub use readers::{DatasetHandle, DatasetOptions};
