use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Point;

/// Breakage reported from the field, addressed by device number.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldReport {
    pub device_number: String,
    /// `[latitude, longitude]`
    pub point: Vec<f64>,
    #[serde(rename = "type")]
    pub breakage_type: String,
    pub description: String,
    pub time: DateTime<Utc>,
}

/// Breakage entered by an operator for a known car.
#[derive(Debug, Clone, Deserialize)]
pub struct CarBreakageReport {
    pub car_id: Uuid,
    /// `[latitude, longitude]`
    pub point: Vec<f64>,
    #[serde(rename = "type")]
    pub breakage_type: String,
    pub description: String,
    pub time: DateTime<Utc>,
}

/// Resolved breakage ready to be stored.
#[derive(Debug, Clone)]
pub struct NewBreakage {
    pub car_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub point: Point,
    pub breakage_type: String,
    pub description: String,
    pub time: DateTime<Utc>,
}

/// Breakage display row for a car's history.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct BreakageInfo {
    pub id: Uuid,
    pub driver_name: Option<String>,
    pub state_number: String,
    pub breakage_type: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
