pub mod spatial_aggregator;

pub use spatial_aggregator::{LocationKey, SpatialAggregator};
