use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    /// Build a point, rejecting non-finite or out-of-range coordinates.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` when latitude is outside `[-90, 90]`
    /// or longitude is outside `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> AppResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::InvalidInput(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::InvalidInput(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse a `[latitude, longitude]` pair as sent by field devices.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` unless exactly two valid coordinates are given.
    pub fn from_coordinates(coordinates: &[f64]) -> AppResult<Self> {
        match coordinates {
            [latitude, longitude] => Self::new(*latitude, *longitude),
            _ => Err(AppError::InvalidInput(format!(
                "invalid point format, must contain exactly two coordinates (got {})",
                coordinates.len()
            ))),
        }
    }
}

/// Axis-aligned rectangle with normalised corners: `min` holds the smaller
/// latitude and longitude, `max` the larger ones. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoBox {
    pub min: Point,
    pub max: Point,
}

impl GeoBox {
    /// Build a box from any two opposite corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point {
                latitude: a.latitude.min(b.latitude),
                longitude: a.longitude.min(b.longitude),
            },
            max: Point {
                latitude: a.latitude.max(b.latitude),
                longitude: a.longitude.max(b.longitude),
            },
        }
    }

    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min.latitude..=self.max.latitude).contains(&latitude)
            && (self.min.longitude..=self.max.longitude).contains(&longitude)
    }
}
