use uuid::Uuid;

use super::DeviceResolver;
use crate::common::Page;
use crate::error::{AppError, AppResult};
use crate::models::{
    Car, CarWithWheels, Company, Driver, DriverStatistics, NewCar, NewCompany, NewDriver,
    NewWheel, Wheel, WheelUpdate,
};
use crate::store::FleetRepository;

/// Registration and lookup of companies, cars, wheels and drivers.
#[derive(Clone)]
pub struct FleetRegistry<S> {
    store: S,
    devices: DeviceResolver<S>,
    default_page_size: u64,
    max_page_size: u64,
}

impl<S: FleetRepository + Clone> FleetRegistry<S> {
    pub fn new(store: S, default_page_size: u64, max_page_size: u64) -> Self {
        Self {
            devices: DeviceResolver::new(store.clone()),
            store,
            default_page_size,
            max_page_size,
        }
    }

    /// # Errors
    ///
    /// `AlreadyExists` on a duplicate inn.
    pub async fn register_company(&self, company: NewCompany) -> AppResult<Company> {
        company.validate()?;
        let company = self.store.insert_company(company).await?;
        tracing::info!(company_id = %company.id, "Company registered");
        Ok(company)
    }

    /// # Errors
    ///
    /// `AlreadyExists` on a duplicate device number or a state number already
    /// used in the company, `InvalidInput` for missing identifiers.
    pub async fn register_car(&self, car: NewCar) -> AppResult<Car> {
        car.validate().inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected car registration");
        })?;
        let car = self.store.insert_car(car).await?;
        tracing::info!(
            car_id = %car.id,
            device_number = %car.device_number,
            "Car registered"
        );
        Ok(car)
    }

    pub async fn get_car(&self, car_id: Uuid) -> AppResult<Car> {
        self.store
            .find_car(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("car {car_id}")))
    }

    pub async fn get_car_by_state_number(
        &self,
        company_id: Uuid,
        state_number: &str,
    ) -> AppResult<Car> {
        self.store
            .find_car_by_state_number(company_id, state_number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("car with state number {state_number}")))
    }

    /// Cars of a company ordered by state number. A missing `limit` uses the
    /// configured default page size.
    ///
    /// # Errors
    ///
    /// `NoContent` when the page is empty.
    pub async fn list_cars(
        &self,
        company_id: Uuid,
        limit: Option<i64>,
        offset: i64,
    ) -> AppResult<Vec<Car>> {
        let limit = limit.unwrap_or(i64::try_from(self.default_page_size).unwrap_or(i64::MAX));
        let page = Page::new(limit, offset)?.capped(self.max_page_size);

        let cars = self.store.list_cars(company_id, page).await?;
        if cars.is_empty() {
            return Err(AppError::NoContent(format!("cars for company {company_id}")));
        }
        Ok(cars)
    }

    /// Mount a wheel on an existing car; the wheel inherits the car's company.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown car, `InvalidInput` for inverted bounds,
    /// `AlreadyExists` for a reused sensor number or occupied position.
    pub async fn register_wheel(&self, wheel: NewWheel) -> AppResult<Wheel> {
        wheel.validate().inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected wheel registration");
        })?;
        let car = self.get_car(wheel.car_id).await?;

        let wheel = self.store.insert_wheel(car.company_id, wheel).await?;
        tracing::info!(
            wheel_id = %wheel.id,
            car_id = %wheel.car_id,
            position = wheel.position,
            "Wheel registered"
        );
        Ok(wheel)
    }

    pub async fn get_wheel(&self, wheel_id: Uuid) -> AppResult<Wheel> {
        self.store
            .find_wheel(wheel_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("wheel {wheel_id}")))
    }

    /// Replace the attributes of the wheel at `position` on the car.
    ///
    /// # Errors
    ///
    /// `NotFound` when the position is unoccupied.
    pub async fn update_wheel(
        &self,
        car_id: Uuid,
        position: i32,
        changes: WheelUpdate,
    ) -> AppResult<Wheel> {
        changes.validate()?;
        self.store
            .update_wheel(car_id, position, changes)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("wheel at position {position} on car {car_id}"))
            })
    }

    pub async fn car_with_wheels(&self, car_id: Uuid) -> AppResult<CarWithWheels> {
        let car = self.get_car(car_id).await?;
        let wheels = self.store.wheels_for_car(car_id).await?;
        Ok(CarWithWheels { car, wheels })
    }

    /// Wheels of the company's car with this state number, ordered by position.
    ///
    /// # Errors
    ///
    /// `NotFound` when no car of the company carries the state number.
    pub async fn wheels_by_state_number(
        &self,
        company_id: Uuid,
        state_number: &str,
    ) -> AppResult<Vec<Wheel>> {
        let car = self.get_car_by_state_number(company_id, state_number).await?;
        self.store.wheels_for_car(car.id).await
    }

    /// Assign a driver to a car, replacing its previous driver.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown car, `AlreadyExists` when a concurrent
    /// registration for the same car committed first.
    pub async fn register_driver(&self, driver: NewDriver) -> AppResult<Driver> {
        let car = self.get_car(driver.car_id).await?;
        let driver = self.store.insert_driver(car.company_id, driver).await?;
        tracing::info!(driver_id = %driver.id, car_id = %driver.car_id, "Driver registered");
        Ok(driver)
    }

    pub async fn get_driver(&self, driver_id: Uuid) -> AppResult<Driver> {
        self.store
            .find_driver(driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("driver {driver_id}")))
    }

    /// Drivers of a company with worked time, experience and breakage count,
    /// newest registration first.
    ///
    /// # Errors
    ///
    /// `NoContent` when the page is empty.
    pub async fn list_drivers(
        &self,
        company_id: Uuid,
        limit: Option<i64>,
        offset: i64,
    ) -> AppResult<Vec<DriverStatistics>> {
        let limit = limit.unwrap_or(i64::try_from(self.default_page_size).unwrap_or(i64::MAX));
        let page = Page::new(limit, offset)?.capped(self.max_page_size);

        let drivers = self.store.driver_statistics(company_id, page).await?;
        if drivers.is_empty() {
            return Err(AppError::NoContent(format!("drivers for company {company_id}")));
        }
        Ok(drivers)
    }

    /// Add `minutes` to the worked time of the device's current driver.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for negative minutes, `NotFound` when the device is
    /// unknown or its car has no driver.
    pub async fn add_worked_time(&self, device_number: &str, minutes: i64) -> AppResult<()> {
        if minutes < 0 {
            return Err(AppError::InvalidInput(format!(
                "worked time must not be negative, got {minutes}"
            )));
        }

        let car = self.devices.resolve_car(device_number).await?;
        let driver = self.devices.resolve_current_driver(car.id).await?;
        if self.store.add_worked_time(driver.id, minutes).await? == 0 {
            return Err(AppError::NotFound(format!("driver {}", driver.id)));
        }

        tracing::debug!(driver_id = %driver.id, minutes, "Worked time added");
        Ok(())
    }
}
