pub mod concurrent_reader;
pub mod dataset;
pub mod partition_reader;

pub use concurrent_reader::ConcurrentReader;
pub use dataset::{DatasetHandle, DatasetOptions, PartitionSummary};
pub use partition_reader::{PartitionReader, PartitionScan};
