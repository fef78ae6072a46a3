use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseBackend, DatabaseConnection,
    EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
    TransactionTrait, Value,
};
use uuid::Uuid;

use super::{
    BreakageRepository, FleetRepository, NotificationRepository, PositionRepository,
    TelemetryRepository,
};
use crate::common::{GeoBox, Page, Point};
use crate::config::Config;
use crate::entity::{
    breakages, cars, cars_positions, companies, drivers, notifications, position_data,
    sensor_data, wheels,
};
use crate::error::AppResult;
use crate::models::{
    Breakage, BreakageInfo, Car, Company, CurrentPosition, CurrentPositionRow, Driver,
    DriverStatistics, NewBreakage, NewCar, NewCompany, NewDriver, NewNotification, NewSensorSample,
    NewWheel, Notification, NotificationInfo, NotificationListItem, NotificationStatus, Position,
    SensorData, Wheel, WheelReportRow, WheelSample, WheelUpdate,
};

/// Rank 1 per wheel position: the newest sample whose sensor and device match the wheel's car.
const LATEST_PER_WHEEL_SQL: &str = r"
    SELECT wheel_id, position, sensor_number, pressure, temperature, recorded_at
    FROM (
        SELECT
            w.id AS wheel_id,
            w.position,
            sd.sensor_number,
            sd.pressure,
            sd.temperature,
            sd.created_at AS recorded_at,
            ROW_NUMBER() OVER (
                PARTITION BY w.position
                ORDER BY sd.created_at DESC, sd.id DESC
            ) AS rn
        FROM wheels w
        JOIN cars c ON c.id = w.car_id
        JOIN sensor_data sd
          ON sd.sensor_number = w.sensor_number
         AND sd.device_number = c.device_number
        WHERE w.car_id = $1
    ) ranked
    WHERE rn = 1
    ORDER BY position ASC
";

const REPORT_SQL: &str = r"
    SELECT
        w.id AS wheel_id,
        c.state_number,
        w.position,
        w.brand AS tire_brand,
        w.mileage,
        COUNT(sd.id) AS sample_count,
        COUNT(sd.id) FILTER (
            WHERE sd.temperature < w.min_temperature OR sd.temperature > w.max_temperature
        ) AS temperature_out_of_bounds,
        COUNT(sd.id) FILTER (
            WHERE sd.pressure < w.min_pressure OR sd.pressure > w.max_pressure
        ) AS pressure_out_of_bounds
    FROM wheels w
    JOIN cars c ON c.id = w.car_id
    LEFT JOIN sensor_data sd
      ON sd.sensor_number = w.sensor_number
     AND sd.device_number = c.device_number
    WHERE c.company_id = $1
    GROUP BY w.id, c.state_number, w.position, w.brand, w.mileage
    ORDER BY c.state_number ASC, w.position ASC
";

/// Breakages are counted against the driver they were attributed to, not the whole car.
const DRIVER_STATISTICS_SQL: &str = r"
    SELECT
        d.id AS driver_id,
        concat_ws(' ', d.name, d.surname, NULLIF(d.middle_name, '')) AS full_name,
        d.worked_time,
        (EXTRACT(YEAR FROM AGE(now(), d.created_at)) * 12
            + EXTRACT(MONTH FROM AGE(now(), d.created_at)))::bigint AS experience_months,
        d.rating,
        COUNT(b.id) AS breakage_count,
        d.is_active
    FROM drivers d
    LEFT JOIN breakages b ON b.driver_id = d.id
    WHERE d.company_id = $1
    GROUP BY d.id
    ORDER BY d.created_at DESC, d.id DESC
    LIMIT $2 OFFSET $3
";

const CURRENT_POSITIONS_SQL: &str = r"
    SELECT cp.car_id, c.unicum_id, c.state_number, cp.latitude, cp.longitude, cp.updated_at
    FROM cars_positions cp
    JOIN cars c ON c.id = cp.car_id
    WHERE cp.company_id = $1
    ORDER BY c.state_number ASC
";

const POSITIONS_IN_BOX_SQL: &str = r"
    SELECT cp.car_id, c.unicum_id, c.state_number, cp.latitude, cp.longitude, cp.updated_at
    FROM cars_positions cp
    JOIN cars c ON c.id = cp.car_id
    WHERE cp.latitude BETWEEN $1 AND $2
      AND cp.longitude BETWEEN $3 AND $4
    ORDER BY c.state_number ASC
";

const BREAKAGES_FOR_CAR_SQL: &str = r"
    SELECT
        b.id,
        CASE WHEN d.id IS NULL THEN NULL
             ELSE concat_ws(' ', d.name, d.surname, NULLIF(d.middle_name, ''))
        END AS driver_name,
        c.state_number,
        b.type AS breakage_type,
        b.description,
        b.created_at
    FROM breakages b
    JOIN cars c ON c.id = b.car_id
    LEFT JOIN drivers d ON d.id = b.driver_id
    WHERE b.car_id = $1
    ORDER BY b.created_at ASC, b.id ASC
";

const NOTIFICATION_INFO_SQL: &str = r"
    SELECT
        n.id,
        n.note,
        n.status,
        CASE WHEN d.id IS NULL THEN NULL
             ELSE concat_ws(' ', d.name, d.surname, NULLIF(d.middle_name, ''))
        END AS driver_name,
        b.latitude,
        b.longitude,
        n.created_at
    FROM notifications n
    JOIN breakages b ON b.id = n.breakage_id
    LEFT JOIN drivers d ON d.id = b.driver_id
    WHERE n.id = $1
";

const NOTIFICATIONS_FOR_USER_SQL: &str = r"
    SELECT n.id, c.state_number, c.brand, b.type AS breakage_type, n.status, n.created_at
    FROM notifications n
    JOIN breakages b ON b.id = n.breakage_id
    JOIN cars c ON c.id = b.car_id
    WHERE n.user_id = $1
      AND ($2::text IS NULL OR n.status = $2)
    ORDER BY n.created_at DESC, n.id DESC
    LIMIT $3 OFFSET $4
";

/// Postgres adapter over a shared sea-orm connection pool.
#[derive(Clone)]
pub struct PgStore {
    db: DatabaseConnection,
}

impl PgStore {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open the pool described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::QueryFailed` when the database is unreachable.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(config.db_max_connections)
            .min_connections(config.db_min_connections)
            .connect_timeout(Duration::from_secs(config.db_connect_timeout_seconds))
            .sqlx_logging(config.db_sqlx_logging);

        let db = Database::connect(options).await?;
        Ok(Self::new(db))
    }

    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn statement<I>(sql: &str, values: I) -> Statement
where
    I: IntoIterator<Item = Value>,
{
    Statement::from_sql_and_values(DatabaseBackend::Postgres, sql, values)
}

#[async_trait]
impl FleetRepository for PgStore {
    async fn insert_company(&self, company: NewCompany) -> AppResult<Company> {
        let model = companies::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(company.name),
            inn: Set(company.inn),
            timezone: Set(company.timezone),
            created_at: Set(Utc::now()),
        };
        Ok(model.insert(&self.db).await?)
    }

    async fn insert_car(&self, car: NewCar) -> AppResult<Car> {
        let model = cars::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(car.company_id),
            state_number: Set(car.state_number),
            brand: Set(car.brand),
            device_number: Set(car.device_number),
            unicum_id: Set(car.unicum_id),
            axle_count: Set(car.axle_count),
            car_type: Set(car.car_type),
            created_at: Set(Utc::now()),
        };
        Ok(model.insert(&self.db).await?)
    }

    async fn find_car(&self, car_id: Uuid) -> AppResult<Option<Car>> {
        Ok(cars::Entity::find_by_id(car_id).one(&self.db).await?)
    }

    async fn find_car_by_device(&self, device_number: &str) -> AppResult<Option<Car>> {
        Ok(cars::Entity::find()
            .filter(cars::Column::DeviceNumber.eq(device_number))
            .one(&self.db)
            .await?)
    }

    async fn find_car_by_state_number(
        &self,
        company_id: Uuid,
        state_number: &str,
    ) -> AppResult<Option<Car>> {
        Ok(cars::Entity::find()
            .filter(cars::Column::CompanyId.eq(company_id))
            .filter(cars::Column::StateNumber.eq(state_number))
            .one(&self.db)
            .await?)
    }

    async fn list_cars(&self, company_id: Uuid, page: Page) -> AppResult<Vec<Car>> {
        Ok(cars::Entity::find()
            .filter(cars::Column::CompanyId.eq(company_id))
            .order_by_asc(cars::Column::StateNumber)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.db)
            .await?)
    }

    async fn insert_wheel(&self, company_id: Uuid, wheel: NewWheel) -> AppResult<Wheel> {
        let model = wheels::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            car_id: Set(wheel.car_id),
            axle_number: Set(wheel.axle_number),
            position: Set(wheel.position),
            sensor_number: Set(wheel.sensor_number),
            size: Set(wheel.size),
            cost: Set(wheel.cost),
            brand: Set(wheel.brand),
            model: Set(wheel.model),
            mileage: Set(wheel.mileage),
            min_temperature: Set(wheel.min_temperature),
            max_temperature: Set(wheel.max_temperature),
            min_pressure: Set(wheel.min_pressure),
            max_pressure: Set(wheel.max_pressure),
            ngp: Set(wheel.ngp),
            tkvh: Set(wheel.tkvh),
        };
        Ok(model.insert(&self.db).await?)
    }

    async fn find_wheel(&self, wheel_id: Uuid) -> AppResult<Option<Wheel>> {
        Ok(wheels::Entity::find_by_id(wheel_id).one(&self.db).await?)
    }

    async fn update_wheel(
        &self,
        car_id: Uuid,
        position: i32,
        changes: WheelUpdate,
    ) -> AppResult<Option<Wheel>> {
        let Some(mut wheel) = wheels::Entity::find()
            .filter(wheels::Column::CarId.eq(car_id))
            .filter(wheels::Column::Position.eq(position))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        changes.apply(&mut wheel);
        let updated = wheels::ActiveModel::from(wheel)
            .reset_all()
            .update(&self.db)
            .await?;
        Ok(Some(updated))
    }

    async fn wheels_for_car(&self, car_id: Uuid) -> AppResult<Vec<Wheel>> {
        Ok(wheels::Entity::find()
            .filter(wheels::Column::CarId.eq(car_id))
            .order_by_asc(wheels::Column::Position)
            .all(&self.db)
            .await?)
    }

    async fn insert_driver(&self, company_id: Uuid, driver: NewDriver) -> AppResult<Driver> {
        let txn = self.db.begin().await?;

        let deactivated = drivers::Entity::update_many()
            .col_expr(drivers::Column::IsActive, Expr::value(false))
            .filter(drivers::Column::CarId.eq(driver.car_id))
            .filter(drivers::Column::IsActive.eq(true))
            .exec(&txn)
            .await?;

        let model = drivers::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            car_id: Set(driver.car_id),
            name: Set(driver.name),
            surname: Set(driver.surname),
            middle_name: Set(driver.middle_name),
            phone: Set(driver.phone),
            birthday: Set(driver.birthday),
            rating: Set(driver.rating),
            worked_time: Set(0),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::debug!(
            car_id = %model.car_id,
            driver_id = %model.id,
            deactivated = deactivated.rows_affected,
            "Driver assigned"
        );
        Ok(model)
    }

    async fn current_driver(&self, car_id: Uuid) -> AppResult<Option<Driver>> {
        Ok(drivers::Entity::find()
            .filter(drivers::Column::CarId.eq(car_id))
            .filter(drivers::Column::IsActive.eq(true))
            .order_by_desc(drivers::Column::CreatedAt)
            .order_by_desc(drivers::Column::Id)
            .one(&self.db)
            .await?)
    }

    async fn find_driver(&self, driver_id: Uuid) -> AppResult<Option<Driver>> {
        Ok(drivers::Entity::find_by_id(driver_id).one(&self.db).await?)
    }

    async fn driver_statistics(
        &self,
        company_id: Uuid,
        page: Page,
    ) -> AppResult<Vec<DriverStatistics>> {
        Ok(DriverStatistics::find_by_statement(statement(
            DRIVER_STATISTICS_SQL,
            [
                company_id.into(),
                page.limit_i64().into(),
                page.offset_i64().into(),
            ],
        ))
        .all(&self.db)
        .await?)
    }

    async fn add_worked_time(&self, driver_id: Uuid, minutes: i64) -> AppResult<u64> {
        let result = drivers::Entity::update_many()
            .col_expr(
                drivers::Column::WorkedTime,
                Expr::col(drivers::Column::WorkedTime).add(minutes),
            )
            .filter(drivers::Column::Id.eq(driver_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl TelemetryRepository for PgStore {
    async fn insert_sample(&self, sample: NewSensorSample) -> AppResult<SensorData> {
        let model = sensor_data::ActiveModel {
            id: Set(Uuid::new_v4()),
            device_number: Set(sample.device_number),
            sensor_number: Set(sample.sensor_number),
            pressure: Set(sample.pressure),
            temperature: Set(sample.temperature),
            created_at: Set(sample.time),
        };
        Ok(model.insert(&self.db).await?)
    }

    async fn latest_per_wheel(&self, car_id: Uuid) -> AppResult<Vec<WheelSample>> {
        Ok(
            WheelSample::find_by_statement(statement(LATEST_PER_WHEEL_SQL, [car_id.into()]))
                .all(&self.db)
                .await?,
        )
    }

    async fn samples_for_sensor(
        &self,
        device_number: &str,
        sensor_number: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<SensorData>> {
        Ok(sensor_data::Entity::find()
            .filter(sensor_data::Column::DeviceNumber.eq(device_number))
            .filter(sensor_data::Column::SensorNumber.eq(sensor_number))
            .filter(sensor_data::Column::CreatedAt.between(from, to))
            .order_by_asc(sensor_data::Column::CreatedAt)
            .order_by_asc(sensor_data::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn report_rows(&self, company_id: Uuid) -> AppResult<Vec<WheelReportRow>> {
        Ok(
            WheelReportRow::find_by_statement(statement(REPORT_SQL, [company_id.into()]))
                .all(&self.db)
                .await?,
        )
    }
}

#[async_trait]
impl PositionRepository for PgStore {
    async fn insert_position(
        &self,
        device_number: &str,
        point: Point,
        time: DateTime<Utc>,
    ) -> AppResult<Position> {
        let model = position_data::ActiveModel {
            id: Set(Uuid::new_v4()),
            device_number: Set(device_number.to_string()),
            latitude: Set(point.latitude),
            longitude: Set(point.longitude),
            created_at: Set(time),
        };
        Ok(model.insert(&self.db).await?)
    }

    async fn upsert_current_position(
        &self,
        company_id: Uuid,
        car_id: Uuid,
        point: Point,
        time: DateTime<Utc>,
    ) -> AppResult<CurrentPosition> {
        let model = cars_positions::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            car_id: Set(car_id),
            latitude: Set(point.latitude),
            longitude: Set(point.longitude),
            updated_at: Set(time),
        };

        Ok(cars_positions::Entity::insert(model)
            .on_conflict(
                OnConflict::column(cars_positions::Column::CarId)
                    .update_columns([
                        cars_positions::Column::CompanyId,
                        cars_positions::Column::Latitude,
                        cars_positions::Column::Longitude,
                        cars_positions::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?)
    }

    async fn route(
        &self,
        device_number: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Position>> {
        Ok(position_data::Entity::find()
            .filter(position_data::Column::DeviceNumber.eq(device_number))
            .filter(position_data::Column::CreatedAt.between(from, to))
            .order_by_asc(position_data::Column::CreatedAt)
            .order_by_asc(position_data::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn current_positions(&self, company_id: Uuid) -> AppResult<Vec<CurrentPositionRow>> {
        Ok(CurrentPositionRow::find_by_statement(statement(
            CURRENT_POSITIONS_SQL,
            [company_id.into()],
        ))
        .all(&self.db)
        .await?)
    }

    async fn current_positions_in_box(&self, area: GeoBox) -> AppResult<Vec<CurrentPositionRow>> {
        Ok(CurrentPositionRow::find_by_statement(statement(
            POSITIONS_IN_BOX_SQL,
            [
                area.min.latitude.into(),
                area.max.latitude.into(),
                area.min.longitude.into(),
                area.max.longitude.into(),
            ],
        ))
        .all(&self.db)
        .await?)
    }
}

#[async_trait]
impl BreakageRepository for PgStore {
    async fn insert_breakage_with_notification(
        &self,
        breakage: NewBreakage,
        notification: NewNotification,
    ) -> AppResult<(Breakage, Notification)> {
        let txn = self.db.begin().await?;

        let stored_breakage = breakages::ActiveModel {
            id: Set(Uuid::new_v4()),
            car_id: Set(breakage.car_id),
            driver_id: Set(breakage.driver_id),
            latitude: Set(breakage.point.latitude),
            longitude: Set(breakage.point.longitude),
            breakage_type: Set(breakage.breakage_type),
            description: Set(breakage.description),
            created_at: Set(breakage.time),
        }
        .insert(&txn)
        .await?;

        let stored_notification = notifications::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(notification.user_id),
            breakage_id: Set(stored_breakage.id),
            note: Set(notification.note),
            status: Set(notification.status),
            created_at: Set(notification.created_at),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok((stored_breakage, stored_notification))
    }

    async fn breakages_for_car(&self, car_id: Uuid) -> AppResult<Vec<BreakageInfo>> {
        Ok(
            BreakageInfo::find_by_statement(statement(BREAKAGES_FOR_CAR_SQL, [car_id.into()]))
                .all(&self.db)
                .await?,
        )
    }
}

#[async_trait]
impl NotificationRepository for PgStore {
    async fn update_status(&self, id: Uuid, status: NotificationStatus) -> AppResult<u64> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::Status, Expr::value(status.as_str()))
            .filter(notifications::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn update_status_for_user(
        &self,
        user_id: Uuid,
        status: NotificationStatus,
    ) -> AppResult<u64> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::Status, Expr::value(status.as_str()))
            .filter(notifications::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn notification_info(&self, id: Uuid) -> AppResult<Option<NotificationInfo>> {
        Ok(
            NotificationInfo::find_by_statement(statement(NOTIFICATION_INFO_SQL, [id.into()]))
                .one(&self.db)
                .await?,
        )
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<NotificationStatus>,
        page: Page,
    ) -> AppResult<Vec<NotificationListItem>> {
        let status: Option<String> = status.map(|s| s.as_str().to_string());
        Ok(NotificationListItem::find_by_statement(statement(
            NOTIFICATIONS_FOR_USER_SQL,
            [
                user_id.into(),
                status.into(),
                page.limit_i64().into(),
                page.offset_i64().into(),
            ],
        ))
        .all(&self.db)
        .await?)
    }
}
