use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::Serialize;
use uuid::Uuid;

use crate::common::Point;

/// Current position of a car joined with its identifying fields.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct CurrentPositionRow {
    pub car_id: Uuid,
    pub unicum_id: String,
    pub state_number: String,
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: DateTime<Utc>,
}

impl CurrentPositionRow {
    #[must_use]
    pub fn point(&self) -> Point {
        Point {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
