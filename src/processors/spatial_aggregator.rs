use crate::error::Result;
use crate::models::{AggregatedRow, AggregatedRowSet, RowSet};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Exact-equality grouping key for a coordinate pair.
///
/// `-0.0` and `0.0` are one key, and every NaN (or null) coordinate
/// collapses into a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationKey {
    latitude: u64,
    longitude: u64,
}

impl LocationKey {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: canonical_bits(latitude),
            longitude: canonical_bits(longitude),
        }
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Missing measurements are `None`: both nulls and NaN.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

#[derive(Debug, Default)]
struct MeanAccumulator {
    sum: Option<f64>,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = present(value) {
            // Seed with the first value so a single-member group reproduces
            // it exactly, including the sign of zero.
            self.sum = Some(match self.sum {
                Some(sum) => sum + v,
                None => v,
            });
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        self.sum.map(|sum| sum / self.count as f64)
    }
}

/// Collapses rows sharing a (latitude, longitude) pair into one row
/// holding the mean of the target column.
pub struct SpatialAggregator;

impl SpatialAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Group `rows` by exact location and average `target` per group.
    ///
    /// Missing target values count towards group membership but not the
    /// mean; a group with no present values yields `None`. Output follows
    /// the first appearance of each location. When every location is
    /// already distinct the rows are projected without grouping.
    pub fn aggregate_mean(
        &self,
        rows: RowSet,
        latitude: &str,
        longitude: &str,
        target: &str,
    ) -> Result<AggregatedRowSet> {
        let latitudes = rows.float_values(latitude)?;
        let longitudes = rows.float_values(longitude)?;
        let values = rows.float_values(target)?;

        let keys: Vec<LocationKey> = latitudes
            .iter()
            .zip(&longitudes)
            .map(|(lat, lon)| LocationKey::new(lat.unwrap_or(f64::NAN), lon.unwrap_or(f64::NAN)))
            .collect();

        let coordinate = |i: usize| {
            (
                latitudes[i].unwrap_or(f64::NAN),
                longitudes[i].unwrap_or(f64::NAN),
            )
        };

        let aggregated = if Self::all_distinct(&keys) {
            debug!(rows = keys.len(), "All locations distinct, projecting");
            (0..keys.len())
                .map(|i| {
                    let (lat, lon) = coordinate(i);
                    AggregatedRow::new(lat, lon, present(values[i]))
                })
                .collect()
        } else {
            let mut index: HashMap<LocationKey, usize> = HashMap::new();
            let mut groups: Vec<(usize, MeanAccumulator)> = Vec::new();

            for (i, key) in keys.iter().enumerate() {
                let slot = *index.entry(*key).or_insert_with(|| {
                    groups.push((i, MeanAccumulator::default()));
                    groups.len() - 1
                });
                groups[slot].1.push(values[i]);
            }

            debug!(
                rows = keys.len(),
                locations = groups.len(),
                "Averaged duplicate locations"
            );

            groups
                .into_iter()
                .map(|(first, acc)| {
                    let (lat, lon) = coordinate(first);
                    AggregatedRow::new(lat, lon, acc.mean())
                })
                .collect()
        };

        Ok(AggregatedRowSet::new(
            latitude, longitude, target, aggregated,
        ))
    }

    fn all_distinct(keys: &[LocationKey]) -> bool {
        let mut seen = HashSet::with_capacity(keys.len());
        keys.iter().all(|key| seen.insert(*key))
    }
}

impl Default for SpatialAggregator {
    fn default() -> Self {
        Self::new()
    }
}
