use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::check_window;
use crate::error::{AppError, AppResult};
use crate::models::{Measurement, NewSensorSample, SensorData, WheelSample};
use crate::store::{FleetRepository, TelemetryRepository};

/// Tire sample ingestion and per-wheel reads.
#[derive(Clone)]
pub struct TelemetryIngest<S> {
    store: S,
}

impl<S> TelemetryIngest<S>
where
    S: FleetRepository + TelemetryRepository,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Store a sample as reported. Values are not range-checked at ingest.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the device or sensor number is empty.
    pub async fn record_sample(&self, sample: NewSensorSample) -> AppResult<SensorData> {
        sample.validate().inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected sensor sample");
        })?;

        let stored = self.store.insert_sample(sample).await?;
        tracing::debug!(
            device_number = %stored.device_number,
            sensor_number = %stored.sensor_number,
            "Sensor sample recorded"
        );
        Ok(stored)
    }

    /// Newest sample of every wheel position of the car, ordered by position.
    pub async fn latest_per_wheel(&self, car_id: Uuid) -> AppResult<Vec<WheelSample>> {
        let rows = self.store.latest_per_wheel(car_id).await?;
        tracing::debug!(car_id = %car_id, count = rows.len(), "Loaded latest wheel samples");
        Ok(rows)
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown wheel, `InvalidInput` when `to < from`.
    pub async fn temperature_history(
        &self,
        wheel_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Measurement>> {
        self.history(wheel_id, from, to, |s| s.temperature).await
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown wheel, `InvalidInput` when `to < from`.
    pub async fn pressure_history(
        &self,
        wheel_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Measurement>> {
        self.history(wheel_id, from, to, |s| s.pressure).await
    }

    async fn history(
        &self,
        wheel_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        value: fn(&SensorData) -> f64,
    ) -> AppResult<Vec<Measurement>> {
        check_window(from, to)?;

        let wheel = self
            .store
            .find_wheel(wheel_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("wheel {wheel_id}")))?;
        let car = self
            .store
            .find_car(wheel.car_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("car {}", wheel.car_id)))?;

        let samples = self
            .store
            .samples_for_sensor(&car.device_number, &wheel.sensor_number, from, to)
            .await?;

        Ok(samples
            .iter()
            .map(|s| Measurement {
                value: value(s),
                time: s.created_at,
            })
            .collect())
    }
}
