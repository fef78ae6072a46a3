use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use super::{
    BreakageRepository, FleetRepository, NotificationRepository, PositionRepository,
    TelemetryRepository,
};
use crate::common::{GeoBox, Page, Point};
use crate::error::{AppError, AppResult};
use crate::models::{
    Breakage, BreakageInfo, Car, Company, CurrentPosition, CurrentPositionRow, Driver,
    DriverStatistics, NewBreakage, NewCar, NewCompany, NewDriver, NewNotification, NewSensorSample,
    NewWheel, Notification, NotificationInfo, NotificationListItem, NotificationStatus, Position,
    SensorData, Wheel, WheelReportRow, WheelSample, WheelUpdate, experience_months,
};

#[derive(Debug, Default)]
struct Tables {
    companies: Vec<Company>,
    cars: Vec<Car>,
    wheels: Vec<Wheel>,
    drivers: Vec<Driver>,
    sensor_data: Vec<SensorData>,
    positions: Vec<Position>,
    current_positions: Vec<CurrentPosition>,
    breakages: Vec<Breakage>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn car(&self, car_id: Uuid) -> Option<&Car> {
        self.cars.iter().find(|c| c.id == car_id)
    }

    fn driver_name(&self, driver_id: Option<Uuid>) -> Option<String> {
        driver_id.and_then(|id| {
            self.drivers
                .iter()
                .find(|d| d.id == id)
                .map(Driver::full_name)
        })
    }

    fn position_row(&self, position: &CurrentPosition) -> Option<CurrentPositionRow> {
        self.car(position.car_id).map(|car| CurrentPositionRow {
            car_id: position.car_id,
            unicum_id: car.unicum_id.clone(),
            state_number: car.state_number.clone(),
            latitude: position.latitude,
            longitude: position.longitude,
            updated_at: position.updated_at,
        })
    }

    fn set_status<F>(&mut self, status: NotificationStatus, matches: F) -> u64
    where
        F: Fn(&Notification) -> bool,
    {
        let mut updated = 0;
        for notification in self.notifications.iter_mut().filter(|n| matches(n)) {
            notification.status = status;
            updated += 1;
        }
        updated
    }
}

/// In-memory store enforcing the same keys and references as the schema.
///
/// All tables sit behind one mutex; no method holds it across an `.await`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn breakages(&self) -> Vec<Breakage> {
        self.inner.lock().breakages.clone()
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.lock().notifications.clone()
    }

    #[must_use]
    pub fn drivers(&self) -> Vec<Driver> {
        self.inner.lock().drivers.clone()
    }

    #[must_use]
    pub fn current_position_rows(&self) -> Vec<CurrentPosition> {
        self.inner.lock().current_positions.clone()
    }

    #[must_use]
    pub fn sensor_data(&self) -> Vec<SensorData> {
        self.inner.lock().sensor_data.clone()
    }
}

#[async_trait]
impl FleetRepository for MemoryStore {
    async fn insert_company(&self, company: NewCompany) -> AppResult<Company> {
        let mut tables = self.inner.lock();
        if tables.companies.iter().any(|c| c.inn == company.inn) {
            return Err(AppError::AlreadyExists(format!("company inn {}", company.inn)));
        }

        let model = Company {
            id: Uuid::new_v4(),
            name: company.name,
            inn: company.inn,
            timezone: company.timezone,
            created_at: Utc::now(),
        };
        tables.companies.push(model.clone());
        Ok(model)
    }

    async fn insert_car(&self, car: NewCar) -> AppResult<Car> {
        let mut tables = self.inner.lock();
        if !tables.companies.iter().any(|c| c.id == car.company_id) {
            return Err(AppError::NotFound(format!("company {}", car.company_id)));
        }
        if tables.cars.iter().any(|c| c.device_number == car.device_number) {
            return Err(AppError::AlreadyExists(format!(
                "device number {}",
                car.device_number
            )));
        }
        if tables
            .cars
            .iter()
            .any(|c| c.company_id == car.company_id && c.state_number == car.state_number)
        {
            return Err(AppError::AlreadyExists(format!(
                "state number {}",
                car.state_number
            )));
        }

        let model = Car {
            id: Uuid::new_v4(),
            company_id: car.company_id,
            state_number: car.state_number,
            brand: car.brand,
            device_number: car.device_number,
            unicum_id: car.unicum_id,
            axle_count: car.axle_count,
            car_type: car.car_type,
            created_at: Utc::now(),
        };
        tables.cars.push(model.clone());
        Ok(model)
    }

    async fn find_car(&self, car_id: Uuid) -> AppResult<Option<Car>> {
        Ok(self.inner.lock().car(car_id).cloned())
    }

    async fn find_car_by_device(&self, device_number: &str) -> AppResult<Option<Car>> {
        Ok(self
            .inner
            .lock()
            .cars
            .iter()
            .find(|c| c.device_number == device_number)
            .cloned())
    }

    async fn find_car_by_state_number(
        &self,
        company_id: Uuid,
        state_number: &str,
    ) -> AppResult<Option<Car>> {
        Ok(self
            .inner
            .lock()
            .cars
            .iter()
            .find(|c| c.company_id == company_id && c.state_number == state_number)
            .cloned())
    }

    async fn list_cars(&self, company_id: Uuid, page: Page) -> AppResult<Vec<Car>> {
        let mut cars: Vec<Car> = self
            .inner
            .lock()
            .cars
            .iter()
            .filter(|c| c.company_id == company_id)
            .cloned()
            .collect();
        cars.sort_by(|a, b| a.state_number.cmp(&b.state_number));
        Ok(page.window(&cars))
    }

    async fn insert_wheel(&self, company_id: Uuid, wheel: NewWheel) -> AppResult<Wheel> {
        let mut tables = self.inner.lock();
        if tables.car(wheel.car_id).is_none() {
            return Err(AppError::NotFound(format!("car {}", wheel.car_id)));
        }
        if tables
            .wheels
            .iter()
            .any(|w| w.sensor_number == wheel.sensor_number)
        {
            return Err(AppError::AlreadyExists(format!(
                "sensor number {}",
                wheel.sensor_number
            )));
        }
        if tables
            .wheels
            .iter()
            .any(|w| w.car_id == wheel.car_id && w.position == wheel.position)
        {
            return Err(AppError::AlreadyExists(format!(
                "position {} on car {}",
                wheel.position, wheel.car_id
            )));
        }

        let model = Wheel {
            id: Uuid::new_v4(),
            company_id,
            car_id: wheel.car_id,
            axle_number: wheel.axle_number,
            position: wheel.position,
            sensor_number: wheel.sensor_number,
            size: wheel.size,
            cost: wheel.cost,
            brand: wheel.brand,
            model: wheel.model,
            mileage: wheel.mileage,
            min_temperature: wheel.min_temperature,
            max_temperature: wheel.max_temperature,
            min_pressure: wheel.min_pressure,
            max_pressure: wheel.max_pressure,
            ngp: wheel.ngp,
            tkvh: wheel.tkvh,
        };
        tables.wheels.push(model.clone());
        Ok(model)
    }

    async fn find_wheel(&self, wheel_id: Uuid) -> AppResult<Option<Wheel>> {
        Ok(self
            .inner
            .lock()
            .wheels
            .iter()
            .find(|w| w.id == wheel_id)
            .cloned())
    }

    async fn update_wheel(
        &self,
        car_id: Uuid,
        position: i32,
        changes: WheelUpdate,
    ) -> AppResult<Option<Wheel>> {
        let mut tables = self.inner.lock();
        let Some(wheel) = tables
            .wheels
            .iter_mut()
            .find(|w| w.car_id == car_id && w.position == position)
        else {
            return Ok(None);
        };
        changes.apply(wheel);
        Ok(Some(wheel.clone()))
    }

    async fn wheels_for_car(&self, car_id: Uuid) -> AppResult<Vec<Wheel>> {
        let mut wheels: Vec<Wheel> = self
            .inner
            .lock()
            .wheels
            .iter()
            .filter(|w| w.car_id == car_id)
            .cloned()
            .collect();
        wheels.sort_by_key(|w| w.position);
        Ok(wheels)
    }

    async fn insert_driver(&self, company_id: Uuid, driver: NewDriver) -> AppResult<Driver> {
        let mut tables = self.inner.lock();
        if tables.car(driver.car_id).is_none() {
            return Err(AppError::NotFound(format!("car {}", driver.car_id)));
        }

        for previous in tables
            .drivers
            .iter_mut()
            .filter(|d| d.car_id == driver.car_id)
        {
            previous.is_active = false;
        }

        let model = Driver {
            id: Uuid::new_v4(),
            company_id,
            car_id: driver.car_id,
            name: driver.name,
            surname: driver.surname,
            middle_name: driver.middle_name,
            phone: driver.phone,
            birthday: driver.birthday,
            rating: driver.rating,
            worked_time: 0,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.drivers.push(model.clone());
        Ok(model)
    }

    async fn current_driver(&self, car_id: Uuid) -> AppResult<Option<Driver>> {
        Ok(self
            .inner
            .lock()
            .drivers
            .iter()
            .filter(|d| d.car_id == car_id && d.is_active)
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .cloned())
    }

    async fn find_driver(&self, driver_id: Uuid) -> AppResult<Option<Driver>> {
        Ok(self.inner.lock().drivers.iter().find(|d| d.id == driver_id).cloned())
    }

    async fn driver_statistics(
        &self,
        company_id: Uuid,
        page: Page,
    ) -> AppResult<Vec<DriverStatistics>> {
        let tables = self.inner.lock();
        let now = Utc::now();

        let mut drivers: Vec<&Driver> = tables
            .drivers
            .iter()
            .filter(|d| d.company_id == company_id)
            .collect();
        drivers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(page
            .window(&drivers)
            .iter()
            .map(|driver| DriverStatistics {
                driver_id: driver.id,
                full_name: driver.full_name(),
                worked_time: driver.worked_time,
                experience_months: experience_months(driver.created_at, now),
                rating: driver.rating,
                breakage_count: i64::try_from(
                    tables
                        .breakages
                        .iter()
                        .filter(|b| b.driver_id == Some(driver.id))
                        .count(),
                )
                .unwrap_or(i64::MAX),
                is_active: driver.is_active,
            })
            .collect())
    }

    async fn add_worked_time(&self, driver_id: Uuid, minutes: i64) -> AppResult<u64> {
        let mut tables = self.inner.lock();
        Ok(match tables.drivers.iter_mut().find(|d| d.id == driver_id) {
            Some(driver) => {
                driver.worked_time += minutes;
                1
            }
            None => 0,
        })
    }
}

#[async_trait]
impl TelemetryRepository for MemoryStore {
    async fn insert_sample(&self, sample: NewSensorSample) -> AppResult<SensorData> {
        let model = SensorData {
            id: Uuid::new_v4(),
            device_number: sample.device_number,
            sensor_number: sample.sensor_number,
            pressure: sample.pressure,
            temperature: sample.temperature,
            created_at: sample.time,
        };
        self.inner.lock().sensor_data.push(model.clone());
        Ok(model)
    }

    async fn latest_per_wheel(&self, car_id: Uuid) -> AppResult<Vec<WheelSample>> {
        let tables = self.inner.lock();
        let Some(car) = tables.car(car_id) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<WheelSample> = tables
            .wheels
            .iter()
            .filter(|w| w.car_id == car_id)
            .filter_map(|wheel| {
                tables
                    .sensor_data
                    .iter()
                    .filter(|s| {
                        s.sensor_number == wheel.sensor_number
                            && s.device_number == car.device_number
                    })
                    .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
                    .map(|sample| WheelSample {
                        wheel_id: wheel.id,
                        position: wheel.position,
                        sensor_number: sample.sensor_number.clone(),
                        pressure: sample.pressure,
                        temperature: sample.temperature,
                        recorded_at: sample.created_at,
                    })
            })
            .collect();
        rows.sort_by_key(|r| r.position);
        Ok(rows)
    }

    async fn samples_for_sensor(
        &self,
        device_number: &str,
        sensor_number: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<SensorData>> {
        let mut samples: Vec<SensorData> = self
            .inner
            .lock()
            .sensor_data
            .iter()
            .filter(|s| {
                s.device_number == device_number
                    && s.sensor_number == sensor_number
                    && s.created_at >= from
                    && s.created_at <= to
            })
            .cloned()
            .collect();
        samples.sort_by_key(|s| (s.created_at, s.id));
        Ok(samples)
    }

    async fn report_rows(&self, company_id: Uuid) -> AppResult<Vec<WheelReportRow>> {
        let tables = self.inner.lock();
        let mut rows = Vec::new();

        for car in tables.cars.iter().filter(|c| c.company_id == company_id) {
            for wheel in tables.wheels.iter().filter(|w| w.car_id == car.id) {
                let samples: Vec<&SensorData> = tables
                    .sensor_data
                    .iter()
                    .filter(|s| {
                        s.sensor_number == wheel.sensor_number
                            && s.device_number == car.device_number
                    })
                    .collect();
                let temperature_out_of_bounds = samples
                    .iter()
                    .filter(|s| wheel.temperature_out_of_bounds(s.temperature))
                    .count();
                let pressure_out_of_bounds = samples
                    .iter()
                    .filter(|s| wheel.pressure_out_of_bounds(s.pressure))
                    .count();

                rows.push(WheelReportRow {
                    wheel_id: wheel.id,
                    state_number: car.state_number.clone(),
                    position: wheel.position,
                    tire_brand: wheel.brand.clone(),
                    mileage: wheel.mileage,
                    sample_count: samples.len() as i64,
                    temperature_out_of_bounds: temperature_out_of_bounds as i64,
                    pressure_out_of_bounds: pressure_out_of_bounds as i64,
                });
            }
        }

        rows.sort_by(|a, b| {
            a.state_number
                .cmp(&b.state_number)
                .then(a.position.cmp(&b.position))
        });
        Ok(rows)
    }
}

#[async_trait]
impl PositionRepository for MemoryStore {
    async fn insert_position(
        &self,
        device_number: &str,
        point: Point,
        time: DateTime<Utc>,
    ) -> AppResult<Position> {
        let model = Position {
            id: Uuid::new_v4(),
            device_number: device_number.to_string(),
            latitude: point.latitude,
            longitude: point.longitude,
            created_at: time,
        };
        self.inner.lock().positions.push(model.clone());
        Ok(model)
    }

    async fn upsert_current_position(
        &self,
        company_id: Uuid,
        car_id: Uuid,
        point: Point,
        time: DateTime<Utc>,
    ) -> AppResult<CurrentPosition> {
        let mut tables = self.inner.lock();
        if tables.car(car_id).is_none() {
            return Err(AppError::NotFound(format!("car {car_id}")));
        }

        if let Some(existing) = tables
            .current_positions
            .iter_mut()
            .find(|p| p.car_id == car_id)
        {
            existing.company_id = company_id;
            existing.latitude = point.latitude;
            existing.longitude = point.longitude;
            existing.updated_at = time;
            return Ok(existing.clone());
        }

        let model = CurrentPosition {
            id: Uuid::new_v4(),
            company_id,
            car_id,
            latitude: point.latitude,
            longitude: point.longitude,
            updated_at: time,
        };
        tables.current_positions.push(model.clone());
        Ok(model)
    }

    async fn route(
        &self,
        device_number: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Position>> {
        let mut fixes: Vec<Position> = self
            .inner
            .lock()
            .positions
            .iter()
            .filter(|p| {
                p.device_number == device_number && p.created_at >= from && p.created_at <= to
            })
            .cloned()
            .collect();
        fixes.sort_by_key(|p| (p.created_at, p.id));
        Ok(fixes)
    }

    async fn current_positions(&self, company_id: Uuid) -> AppResult<Vec<CurrentPositionRow>> {
        let tables = self.inner.lock();
        let mut rows: Vec<CurrentPositionRow> = tables
            .current_positions
            .iter()
            .filter(|p| p.company_id == company_id)
            .filter_map(|p| tables.position_row(p))
            .collect();
        rows.sort_by(|a, b| a.state_number.cmp(&b.state_number));
        Ok(rows)
    }

    async fn current_positions_in_box(&self, area: GeoBox) -> AppResult<Vec<CurrentPositionRow>> {
        let tables = self.inner.lock();
        let mut rows: Vec<CurrentPositionRow> = tables
            .current_positions
            .iter()
            .filter(|p| area.contains(p.latitude, p.longitude))
            .filter_map(|p| tables.position_row(p))
            .collect();
        rows.sort_by(|a, b| a.state_number.cmp(&b.state_number));
        Ok(rows)
    }
}

#[async_trait]
impl BreakageRepository for MemoryStore {
    async fn insert_breakage_with_notification(
        &self,
        breakage: NewBreakage,
        notification: NewNotification,
    ) -> AppResult<(Breakage, Notification)> {
        let mut tables = self.inner.lock();
        if tables.car(breakage.car_id).is_none() {
            return Err(AppError::NotFound(format!("car {}", breakage.car_id)));
        }
        if !tables.companies.iter().any(|c| c.id == notification.user_id) {
            return Err(AppError::NotFound(format!("company {}", notification.user_id)));
        }

        let stored_breakage = Breakage {
            id: Uuid::new_v4(),
            car_id: breakage.car_id,
            driver_id: breakage.driver_id,
            latitude: breakage.point.latitude,
            longitude: breakage.point.longitude,
            breakage_type: breakage.breakage_type,
            description: breakage.description,
            created_at: breakage.time,
        };
        let stored_notification = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            breakage_id: stored_breakage.id,
            note: notification.note,
            status: notification.status,
            created_at: notification.created_at,
        };

        tables.breakages.push(stored_breakage.clone());
        tables.notifications.push(stored_notification.clone());
        Ok((stored_breakage, stored_notification))
    }

    async fn breakages_for_car(&self, car_id: Uuid) -> AppResult<Vec<BreakageInfo>> {
        let tables = self.inner.lock();
        let Some(car) = tables.car(car_id) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<BreakageInfo> = tables
            .breakages
            .iter()
            .filter(|b| b.car_id == car_id)
            .map(|b| BreakageInfo {
                id: b.id,
                driver_name: tables.driver_name(b.driver_id),
                state_number: car.state_number.clone(),
                breakage_type: b.breakage_type.clone(),
                description: b.description.clone(),
                created_at: b.created_at,
            })
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn update_status(&self, id: Uuid, status: NotificationStatus) -> AppResult<u64> {
        Ok(self.inner.lock().set_status(status, |n| n.id == id))
    }

    async fn update_status_for_user(
        &self,
        user_id: Uuid,
        status: NotificationStatus,
    ) -> AppResult<u64> {
        Ok(self.inner.lock().set_status(status, |n| n.user_id == user_id))
    }

    async fn notification_info(&self, id: Uuid) -> AppResult<Option<NotificationInfo>> {
        let tables = self.inner.lock();
        let Some(notification) = tables.notifications.iter().find(|n| n.id == id) else {
            return Ok(None);
        };
        let Some(breakage) = tables
            .breakages
            .iter()
            .find(|b| b.id == notification.breakage_id)
        else {
            return Ok(None);
        };

        Ok(Some(NotificationInfo {
            id: notification.id,
            note: notification.note.clone(),
            status: notification.status,
            driver_name: tables.driver_name(breakage.driver_id),
            latitude: breakage.latitude,
            longitude: breakage.longitude,
            created_at: notification.created_at,
        }))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<NotificationStatus>,
        page: Page,
    ) -> AppResult<Vec<NotificationListItem>> {
        let tables = self.inner.lock();
        let mut items: Vec<NotificationListItem> = tables
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && status.is_none_or(|s| n.status == s))
            .filter_map(|n| {
                let breakage = tables.breakages.iter().find(|b| b.id == n.breakage_id)?;
                let car = tables.car(breakage.car_id)?;
                Some(NotificationListItem {
                    id: n.id,
                    state_number: car.state_number.clone(),
                    brand: car.brand.clone(),
                    breakage_type: breakage.breakage_type.clone(),
                    status: n.status,
                    created_at: n.created_at,
                })
            })
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page.window(&items))
    }
}
