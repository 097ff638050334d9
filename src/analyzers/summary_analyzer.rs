use crate::models::AggregatedRowSet;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatistics {
    pub variable: String,
    pub locations: usize,
    pub missing_locations: usize,
    pub value_stats: ValueStats,
    pub geographic_bounds: Option<GeographicBounds>,
}

/// Extremes and mean over present values; NaN when there are none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeographicBounds {
    fn include(&mut self, latitude: f64, longitude: f64) {
        self.min_lat = self.min_lat.min(latitude);
        self.max_lat = self.max_lat.max(latitude);
        self.min_lon = self.min_lon.min(longitude);
        self.max_lon = self.max_lon.max(longitude);
    }
}

pub struct SummaryAnalyzer;

impl SummaryAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, rows: &AggregatedRowSet) -> SummaryStatistics {
        let mut missing = 0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut count = 0usize;
        let mut bounds: Option<GeographicBounds> = None;

        for row in rows.iter() {
            match row.value {
                Some(v) => {
                    min = min.min(v);
                    max = max.max(v);
                    sum += v;
                    count += 1;
                }
                None => missing += 1,
            }

            // NaN coordinates have no place on a map
            if row.latitude.is_nan() || row.longitude.is_nan() {
                continue;
            }
            match bounds.as_mut() {
                Some(b) => b.include(row.latitude, row.longitude),
                None => {
                    bounds = Some(GeographicBounds {
                        min_lat: row.latitude,
                        max_lat: row.latitude,
                        min_lon: row.longitude,
                        max_lon: row.longitude,
                    })
                }
            }
        }

        let value_stats = if count > 0 {
            ValueStats {
                min,
                max,
                mean: sum / count as f64,
            }
        } else {
            ValueStats {
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
            }
        };

        SummaryStatistics {
            variable: rows.value_column().to_string(),
            locations: rows.len(),
            missing_locations: missing,
            value_stats,
            geographic_bounds: bounds,
        }
    }
}

impl Default for SummaryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryStatistics {
    pub fn summary(&self) -> String {
        let coverage = match &self.geographic_bounds {
            Some(b) => format!(
                "{:.2}° to {:.2}° latitude, {:.2}° to {:.2}° longitude",
                b.min_lat, b.max_lat, b.min_lon, b.max_lon
            ),
            None => "No locations".to_string(),
        };

        format!(
            "Variable: {}\n\
            Locations: {} ({} without a valid value)\n\
            Coverage: {}",
            self.variable, self.locations, self.missing_locations, coverage
        )
    }

    pub fn detailed_summary(&self) -> String {
        let values = if self.value_stats.mean.is_nan() {
            "No valid measurements".to_string()
        } else {
            format!(
                "- Minimum: {:.4}\n\
                - Maximum: {:.4}\n\
                - Mean: {:.4}",
                self.value_stats.min, self.value_stats.max, self.value_stats.mean
            )
        };

        format!(
            "{}\n\n\
            Location means:\n\
            {}",
            self.summary(),
            values
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AggregatedRow;

    #[test]
    fn test_summarize() {
        let rows = AggregatedRowSet::new(
            "LATITUDE",
            "LONGITUDE",
            "DOXY",
            vec![
                AggregatedRow::new(10.0, -20.0, Some(6.0)),
                AggregatedRow::new(30.0, 40.0, None),
                AggregatedRow::new(-5.0, 10.0, Some(2.0)),
            ],
        );

        let stats = SummaryAnalyzer::new().summarize(&rows);
        assert_eq!(stats.locations, 3);
        assert_eq!(stats.missing_locations, 1);
        assert_eq!(
            stats.value_stats,
            ValueStats {
                min: 2.0,
                max: 6.0,
                mean: 4.0
            }
        );
        assert_eq!(
            stats.geographic_bounds,
            Some(GeographicBounds {
                min_lat: -5.0,
                max_lat: 30.0,
                min_lon: -20.0,
                max_lon: 40.0
            })
        );
        assert!(stats.detailed_summary().contains("Mean: 4.0000"));
    }

    #[test]
    fn test_summarize_empty() {
        let rows = AggregatedRowSet::new("LATITUDE", "LONGITUDE", "DOXY", vec![]);
        let stats = SummaryAnalyzer::new().summarize(&rows);

        assert_eq!(stats.locations, 0);
        assert!(stats.value_stats.mean.is_nan());
        assert!(stats.geographic_bounds.is_none());
        assert!(stats.detailed_summary().contains("No valid measurements"));
    }
}
