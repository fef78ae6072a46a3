use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Car, Driver};
use crate::store::FleetRepository;

/// Maps telemetry unit identifiers to cars and their current drivers.
#[derive(Clone)]
pub struct DeviceResolver<S> {
    store: S,
}

impl<S: FleetRepository> DeviceResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// `NotFound` when no car carries `device_number`.
    pub async fn resolve_car(&self, device_number: &str) -> AppResult<Car> {
        self.store
            .find_car_by_device(device_number)
            .await?
            .ok_or_else(|| {
                tracing::debug!(device_number, "Unknown device");
                AppError::NotFound(format!("car with device number {device_number}"))
            })
    }

    /// # Errors
    ///
    /// `NotFound` when the car has no active driver.
    pub async fn resolve_current_driver(&self, car_id: Uuid) -> AppResult<Driver> {
        self.store.current_driver(car_id).await?.ok_or_else(|| {
            tracing::debug!(car_id = %car_id, "Car has no active driver");
            AppError::NotFound(format!("driver for car {car_id}"))
        })
    }

    /// Unknown devices yield `false` rather than an error.
    pub async fn driver_exists(&self, device_number: &str) -> AppResult<bool> {
        let car = match self.resolve_car(device_number).await {
            Ok(car) => car,
            Err(AppError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        Ok(self.store.current_driver(car.id).await?.is_some())
    }
}
