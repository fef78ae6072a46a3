use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Car, Wheel};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub inn: String,
    pub timezone: String,
}

impl NewCompany {
    pub(crate) fn validate(&self) -> AppResult<()> {
        if self.inn.trim().is_empty() {
            return Err(AppError::InvalidInput("company inn is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCar {
    pub company_id: Uuid,
    pub state_number: String,
    pub brand: String,
    pub device_number: String,
    pub unicum_id: String,
    pub axle_count: i32,
    pub car_type: String,
}

impl NewCar {
    pub(crate) fn validate(&self) -> AppResult<()> {
        if self.device_number.trim().is_empty() {
            return Err(AppError::InvalidInput("device number is required".to_string()));
        }
        if self.state_number.trim().is_empty() {
            return Err(AppError::InvalidInput("state number is required".to_string()));
        }
        if self.axle_count <= 0 {
            return Err(AppError::InvalidInput(format!(
                "axle count must be positive, got {}",
                self.axle_count
            )));
        }
        Ok(())
    }
}

/// Wheel registration. The owning company is taken from the car.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWheel {
    pub car_id: Uuid,
    pub axle_number: i32,
    pub position: i32,
    pub sensor_number: String,
    pub size: f64,
    pub cost: f64,
    pub brand: String,
    pub model: String,
    pub mileage: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub min_pressure: f64,
    pub max_pressure: f64,
    pub ngp: Option<f64>,
    pub tkvh: Option<f64>,
}

impl NewWheel {
    pub(crate) fn validate(&self) -> AppResult<()> {
        if self.sensor_number.trim().is_empty() {
            return Err(AppError::InvalidInput("sensor number is required".to_string()));
        }
        if self.axle_number <= 0 || self.position <= 0 {
            return Err(AppError::InvalidInput(format!(
                "axle number and position must be positive, got {} / {}",
                self.axle_number, self.position
            )));
        }
        validate_bounds(
            self.min_temperature,
            self.max_temperature,
            self.min_pressure,
            self.max_pressure,
        )
    }
}

/// Replacement attributes for the wheel mounted at a (car, position) slot.
#[derive(Debug, Clone, Deserialize)]
pub struct WheelUpdate {
    pub axle_number: i32,
    pub size: f64,
    pub cost: f64,
    pub brand: String,
    pub model: String,
    pub mileage: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub min_pressure: f64,
    pub max_pressure: f64,
    pub ngp: Option<f64>,
    pub tkvh: Option<f64>,
}

impl WheelUpdate {
    pub(crate) fn validate(&self) -> AppResult<()> {
        if self.axle_number <= 0 {
            return Err(AppError::InvalidInput(format!(
                "axle number must be positive, got {}",
                self.axle_number
            )));
        }
        validate_bounds(
            self.min_temperature,
            self.max_temperature,
            self.min_pressure,
            self.max_pressure,
        )
    }

    pub(crate) fn apply(self, wheel: &mut Wheel) {
        wheel.axle_number = self.axle_number;
        wheel.size = self.size;
        wheel.cost = self.cost;
        wheel.brand = self.brand;
        wheel.model = self.model;
        wheel.mileage = self.mileage;
        wheel.min_temperature = self.min_temperature;
        wheel.max_temperature = self.max_temperature;
        wheel.min_pressure = self.min_pressure;
        wheel.max_pressure = self.max_pressure;
        wheel.ngp = self.ngp;
        wheel.tkvh = self.tkvh;
    }
}

fn validate_bounds(
    min_temperature: f64,
    max_temperature: f64,
    min_pressure: f64,
    max_pressure: f64,
) -> AppResult<()> {
    if min_temperature > max_temperature {
        return Err(AppError::InvalidInput(format!(
            "min temperature {min_temperature} exceeds max temperature {max_temperature}"
        )));
    }
    if min_pressure > max_pressure {
        return Err(AppError::InvalidInput(format!(
            "min pressure {min_pressure} exceeds max pressure {max_pressure}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDriver {
    pub car_id: Uuid,
    pub name: String,
    pub surname: String,
    pub middle_name: Option<String>,
    pub phone: String,
    pub birthday: NaiveDate,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CarWithWheels {
    pub car: Car,
    pub wheels: Vec<Wheel>,
}

/// Per-driver statistics row for a company's driver list.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct DriverStatistics {
    pub driver_id: Uuid,
    pub full_name: String,
    /// Minutes
    pub worked_time: i64,
    /// Whole months since the driver was registered
    pub experience_months: i64,
    pub rating: f64,
    /// Breakages recorded while this driver was assigned
    pub breakage_count: i64,
    pub is_active: bool,
}

/// Whole calendar months from `since` to `now`; zero when `now` is earlier.
#[must_use]
pub fn experience_months(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    if now <= since {
        return 0;
    }
    let mut months = i64::from(now.year() - since.year()) * 12
        + i64::from(now.month()) - i64::from(since.month());
    if (now.day(), now.time()) < (since.day(), since.time()) {
        months -= 1;
    }
    months.max(0)
}
