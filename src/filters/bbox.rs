use crate::error::{ProcessingError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Inclusive latitude/longitude rectangle in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_bounds"))]
pub struct BoundingBox {
    #[validate(range(min = -90.0, max = 90.0))]
    pub min_lat: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub max_lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub min_lon: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub max_lon: f64,
}

fn validate_bounds(bbox: &BoundingBox) -> std::result::Result<(), ValidationError> {
    if bbox.min_lat > bbox.max_lat || bbox.min_lon > bbox.max_lon {
        return Err(ValidationError::new("inverted_bounds"));
    }
    Ok(())
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self> {
        let bbox = Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lon..=self.max_lon).contains(&longitude)
    }
}

/// Parses `MINLAT,MAXLAT,MINLON,MAXLON`.
impl FromStr for BoundingBox {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ProcessingError::InvalidFormat(format!("Invalid bounding box '{}': {}", s, e)))?;

        match parts.as_slice() {
            [min_lat, max_lat, min_lon, max_lon] => {
                Self::new(*min_lat, *max_lat, *min_lon, *max_lon)
            }
            _ => Err(ProcessingError::InvalidFormat(format!(
                "Invalid bounding box '{}'. Expected format: 'MINLAT,MAXLAT,MINLON,MAXLON'",
                s
            ))),
        }
    }
}
