pub mod columns;
pub mod constants;
pub mod dataset_name;
pub mod filename;
pub mod progress;

pub use columns::{adjusted_column, measurement_column, qc_column};
pub use constants::*;
pub use dataset_name::{DatasetName, Domain};
pub use filename::generate_default_output_filename;
pub use progress::ProgressReporter;
