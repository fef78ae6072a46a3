//! Repository boundary over the entity store.
//!
//! One trait per concern. Lookups return `Option`/empty vectors; mapping
//! absence onto `NotFound`/`NoContent` is the services' job.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::common::{GeoBox, Page, Point};
use crate::error::AppResult;
use crate::models::{
    Breakage, BreakageInfo, Car, Company, CurrentPosition, CurrentPositionRow, Driver,
    DriverStatistics, NewBreakage, NewCar, NewCompany, NewDriver, NewNotification, NewSensorSample,
    NewWheel, Notification, NotificationInfo, NotificationListItem, NotificationStatus, Position,
    SensorData, Wheel, WheelReportRow, WheelSample, WheelUpdate,
};

#[async_trait]
pub trait FleetRepository: Send + Sync {
    async fn insert_company(&self, company: NewCompany) -> AppResult<Company>;

    async fn insert_car(&self, car: NewCar) -> AppResult<Car>;

    async fn find_car(&self, car_id: Uuid) -> AppResult<Option<Car>>;

    async fn find_car_by_device(&self, device_number: &str) -> AppResult<Option<Car>>;

    async fn find_car_by_state_number(
        &self,
        company_id: Uuid,
        state_number: &str,
    ) -> AppResult<Option<Car>>;

    /// Cars of a company ordered by state number.
    async fn list_cars(&self, company_id: Uuid, page: Page) -> AppResult<Vec<Car>>;

    async fn insert_wheel(&self, company_id: Uuid, wheel: NewWheel) -> AppResult<Wheel>;

    async fn find_wheel(&self, wheel_id: Uuid) -> AppResult<Option<Wheel>>;

    /// Replace the attributes of the wheel mounted at `(car_id, position)`.
    async fn update_wheel(
        &self,
        car_id: Uuid,
        position: i32,
        changes: WheelUpdate,
    ) -> AppResult<Option<Wheel>>;

    /// Wheels of a car ordered by position.
    async fn wheels_for_car(&self, car_id: Uuid) -> AppResult<Vec<Wheel>>;

    /// Insert a driver as the car's only active driver. A concurrent insert for
    /// the same car that loses the race fails with `AlreadyExists`.
    async fn insert_driver(&self, company_id: Uuid, driver: NewDriver) -> AppResult<Driver>;

    /// Latest active driver of the car; ties on `created_at` go to the greatest id.
    async fn current_driver(&self, car_id: Uuid) -> AppResult<Option<Driver>>;

    async fn find_driver(&self, driver_id: Uuid) -> AppResult<Option<Driver>>;

    /// Drivers of a company, newest registration first.
    async fn driver_statistics(
        &self,
        company_id: Uuid,
        page: Page,
    ) -> AppResult<Vec<DriverStatistics>>;

    /// Returns the number of rows updated.
    async fn add_worked_time(&self, driver_id: Uuid, minutes: i64) -> AppResult<u64>;
}

#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    async fn insert_sample(&self, sample: NewSensorSample) -> AppResult<SensorData>;

    /// Most recent sample per wheel position of the car, ordered by position.
    async fn latest_per_wheel(&self, car_id: Uuid) -> AppResult<Vec<WheelSample>>;

    /// Samples of one sensor on one device within `[from, to]`, oldest first,
    /// then by id.
    async fn samples_for_sensor(
        &self,
        device_number: &str,
        sensor_number: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<SensorData>>;

    /// Out-of-bounds counts for every wheel of the company, ordered by state
    /// number then position.
    async fn report_rows(&self, company_id: Uuid) -> AppResult<Vec<WheelReportRow>>;
}

#[async_trait]
pub trait PositionRepository: Send + Sync {
    async fn insert_position(
        &self,
        device_number: &str,
        point: Point,
        time: DateTime<Utc>,
    ) -> AppResult<Position>;

    async fn upsert_current_position(
        &self,
        company_id: Uuid,
        car_id: Uuid,
        point: Point,
        time: DateTime<Utc>,
    ) -> AppResult<CurrentPosition>;

    /// Fixes of a device within `[from, to]`, oldest first, then by id.
    async fn route(
        &self,
        device_number: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Position>>;

    async fn current_positions(&self, company_id: Uuid) -> AppResult<Vec<CurrentPositionRow>>;

    async fn current_positions_in_box(&self, area: GeoBox) -> AppResult<Vec<CurrentPositionRow>>;
}

#[async_trait]
pub trait BreakageRepository: Send + Sync {
    /// Store a breakage and its notification atomically.
    async fn insert_breakage_with_notification(
        &self,
        breakage: NewBreakage,
        notification: NewNotification,
    ) -> AppResult<(Breakage, Notification)>;

    /// Breakages of a car, oldest first.
    async fn breakages_for_car(&self, car_id: Uuid) -> AppResult<Vec<BreakageInfo>>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Returns the number of rows updated.
    async fn update_status(&self, id: Uuid, status: NotificationStatus) -> AppResult<u64>;

    /// Returns the number of rows updated.
    async fn update_status_for_user(
        &self,
        user_id: Uuid,
        status: NotificationStatus,
    ) -> AppResult<u64>;

    async fn notification_info(&self, id: Uuid) -> AppResult<Option<NotificationInfo>>;

    /// Notifications of a user, newest first.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<NotificationStatus>,
        page: Page,
    ) -> AppResult<Vec<NotificationListItem>>;
}

/// Every repository concern behind one cloneable handle.
pub trait Store:
    FleetRepository
    + TelemetryRepository
    + PositionRepository
    + BreakageRepository
    + NotificationRepository
    + Clone
    + 'static
{
}

impl<T> Store for T where
    T: FleetRepository
        + TelemetryRepository
        + PositionRepository
        + BreakageRepository
        + NotificationRepository
        + Clone
        + 'static
{
}
