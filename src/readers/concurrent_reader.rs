use crate::error::{ProcessingError, Result};
use crate::readers::{PartitionReader, PartitionScan};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Scatter/gather over partition files with a bounded worker pool.
pub struct ConcurrentReader {
    max_workers: usize,
}

impl ConcurrentReader {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Read every partition, returning scans in partition order.
    ///
    /// Each partition is handled by exactly one worker. On failure the
    /// first error observed is returned, queued partitions are not started
    /// and no scans are returned.
    pub fn read_partitions(
        &self,
        partitions: &[PathBuf],
        reader: &PartitionReader<'_>,
    ) -> Result<Vec<PartitionScan>> {
        if self.max_workers == 1 || partitions.len() <= 1 {
            return partitions
                .iter()
                .map(|path| Self::read_one(reader, path))
                .collect();
        }

        // Configure Rayon thread pool
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers.min(partitions.len()))
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        // Indexed collect keeps partition order regardless of completion order
        pool.install(|| {
            partitions
                .par_iter()
                .map(|path| Self::read_one(reader, path))
                .collect()
        })
    }

    fn read_one(reader: &PartitionReader<'_>, path: &Path) -> Result<PartitionScan> {
        reader.read(path).inspect_err(|e| {
            warn!(partition = %path.display(), error = %e, "Failed to read partition");
        })
    }
}

impl Default for ConcurrentReader {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
