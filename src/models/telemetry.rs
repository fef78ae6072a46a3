use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Inbound tire sample as reported by a car's telemetry unit.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSensorSample {
    pub device_number: String,
    pub sensor_number: String,
    pub pressure: f64,
    pub temperature: f64,
    pub time: DateTime<Utc>,
}

impl NewSensorSample {
    pub(crate) fn validate(&self) -> AppResult<()> {
        if self.device_number.trim().is_empty() {
            return Err(AppError::InvalidInput("device number is required".to_string()));
        }
        if self.sensor_number.trim().is_empty() {
            return Err(AppError::InvalidInput("sensor number is required".to_string()));
        }
        Ok(())
    }
}

/// Most recent sample for one wheel position of a car.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct WheelSample {
    pub wheel_id: Uuid,
    pub position: i32,
    pub sensor_number: String,
    pub pressure: f64,
    pub temperature: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Single value of a wheel's temperature or pressure series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub value: f64,
    pub time: DateTime<Utc>,
}

/// Out-of-bounds counts for one wheel over its whole sensor history.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct WheelReportRow {
    pub wheel_id: Uuid,
    pub state_number: String,
    pub position: i32,
    pub tire_brand: String,
    pub mileage: f64,
    pub sample_count: i64,
    pub temperature_out_of_bounds: i64,
    pub pressure_out_of_bounds: i64,
}
