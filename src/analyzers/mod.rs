pub mod summary_analyzer;

pub use summary_analyzer::{GeographicBounds, SummaryAnalyzer, SummaryStatistics, ValueStats};
