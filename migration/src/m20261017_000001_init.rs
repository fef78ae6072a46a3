use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== COMPANIES ==========
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Companies::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Companies::Inn).string_len(16).not_null().unique_key())
                    .col(
                        ColumnDef::new(Companies::Timezone)
                            .string_len(64)
                            .not_null()
                            .default("UTC"),
                    )
                    .col(
                        ColumnDef::new(Companies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT NOW()"),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== CARS ==========
        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cars::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Cars::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Cars::StateNumber).string_len(32).not_null())
                    .col(ColumnDef::new(Cars::Brand).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Cars::DeviceNumber)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Cars::UnicumId).string_len(64).not_null())
                    .col(ColumnDef::new(Cars::AxleCount).integer().not_null())
                    .col(ColumnDef::new(Cars::CarType).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Cars::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_company")
                            .from(Cars::Table, Cars::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cars_company_state_number")
                    .table(Cars::Table)
                    .col(Cars::CompanyId)
                    .col(Cars::StateNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ========== WHEELS ==========
        manager
            .create_table(
                Table::create()
                    .table(Wheels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wheels::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Wheels::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Wheels::CarId).uuid().not_null())
                    .col(ColumnDef::new(Wheels::AxleNumber).integer().not_null())
                    .col(ColumnDef::new(Wheels::Position).integer().not_null())
                    .col(
                        ColumnDef::new(Wheels::SensorNumber)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Wheels::Size).double().not_null())
                    .col(ColumnDef::new(Wheels::Cost).double().not_null())
                    .col(ColumnDef::new(Wheels::Brand).string_len(64).not_null())
                    .col(ColumnDef::new(Wheels::Model).string_len(64).not_null())
                    .col(ColumnDef::new(Wheels::Mileage).double().not_null().default(0.0))
                    .col(ColumnDef::new(Wheels::MinTemperature).double().not_null())
                    .col(ColumnDef::new(Wheels::MaxTemperature).double().not_null())
                    .col(ColumnDef::new(Wheels::MinPressure).double().not_null())
                    .col(ColumnDef::new(Wheels::MaxPressure).double().not_null())
                    .col(ColumnDef::new(Wheels::Ngp).double())
                    .col(ColumnDef::new(Wheels::Tkvh).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wheels_company")
                            .from(Wheels::Table, Wheels::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wheels_car")
                            .from(Wheels::Table, Wheels::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One wheel per (car, position)
        manager
            .create_index(
                Index::create()
                    .name("idx_wheels_car_position")
                    .table(Wheels::Table)
                    .col(Wheels::CarId)
                    .col(Wheels::Position)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ========== DRIVERS ==========
        manager
            .create_table(
                Table::create()
                    .table(Drivers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Drivers::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Drivers::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Drivers::CarId).uuid().not_null())
                    .col(ColumnDef::new(Drivers::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Drivers::Surname).string_len(64).not_null())
                    .col(ColumnDef::new(Drivers::MiddleName).string_len(64))
                    .col(ColumnDef::new(Drivers::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(Drivers::Birthday).date().not_null())
                    .col(ColumnDef::new(Drivers::Rating).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Drivers::WorkedTime)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Drivers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Drivers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_drivers_company")
                            .from(Drivers::Table, Drivers::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_drivers_car")
                            .from(Drivers::Table, Drivers::CarId)
                            .to(Cars::Table, Cars::Id),
                    )
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();

        // At most one active driver per car
        db.execute_unprepared(
            "CREATE UNIQUE INDEX idx_drivers_one_active_per_car ON drivers (car_id) WHERE is_active",
        )
        .await?;

        // ========== SENSOR DATA ==========
        manager
            .create_table(
                Table::create()
                    .table(SensorData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SensorData::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(SensorData::DeviceNumber).string_len(64).not_null())
                    .col(ColumnDef::new(SensorData::SensorNumber).string_len(64).not_null())
                    .col(ColumnDef::new(SensorData::Pressure).double().not_null())
                    .col(ColumnDef::new(SensorData::Temperature).double().not_null())
                    .col(
                        ColumnDef::new(SensorData::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        db.execute_unprepared(
            "CREATE INDEX idx_sensor_data_device_sensor_time ON sensor_data (device_number, sensor_number, created_at DESC)",
        )
        .await?;

        // ========== POSITION DATA ==========
        manager
            .create_table(
                Table::create()
                    .table(PositionData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PositionData::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(PositionData::DeviceNumber).string_len(64).not_null())
                    .col(ColumnDef::new(PositionData::Latitude).double().not_null())
                    .col(ColumnDef::new(PositionData::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(PositionData::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        db.execute_unprepared(
            "CREATE INDEX idx_position_data_device_time ON position_data (device_number, created_at)",
        )
        .await?;

        // ========== CARS POSITIONS (one row per car) ==========
        manager
            .create_table(
                Table::create()
                    .table(CarsPositions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CarsPositions::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(CarsPositions::CompanyId).uuid().not_null())
                    .col(
                        ColumnDef::new(CarsPositions::CarId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CarsPositions::Latitude).double().not_null())
                    .col(ColumnDef::new(CarsPositions::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(CarsPositions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_positions_car")
                            .from(CarsPositions::Table, CarsPositions::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        db.execute_unprepared(
            "CREATE INDEX idx_cars_positions_lat_lng ON cars_positions (latitude, longitude)",
        )
        .await?;

        // ========== BREAKAGES ==========
        manager
            .create_table(
                Table::create()
                    .table(Breakages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Breakages::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Breakages::CarId).uuid().not_null())
                    .col(ColumnDef::new(Breakages::DriverId).uuid())
                    .col(ColumnDef::new(Breakages::Latitude).double().not_null())
                    .col(ColumnDef::new(Breakages::Longitude).double().not_null())
                    .col(ColumnDef::new(Breakages::Type).string_len(64).not_null())
                    .col(ColumnDef::new(Breakages::Description).text().not_null())
                    .col(
                        ColumnDef::new(Breakages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_breakages_car")
                            .from(Breakages::Table, Breakages::CarId)
                            .to(Cars::Table, Cars::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_breakages_driver")
                            .from(Breakages::Table, Breakages::DriverId)
                            .to(Drivers::Table, Drivers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        db.execute_unprepared(
            "CREATE INDEX idx_breakages_car_created ON breakages (car_id, created_at)",
        )
        .await?;

        // ========== NOTIFICATIONS ==========
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Notifications::UserId).uuid().not_null())
                    .col(ColumnDef::new(Notifications::BreakageId).uuid().not_null())
                    .col(ColumnDef::new(Notifications::Note).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::Status)
                            .string_len(16)
                            .not_null()
                            .default("new"),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_user")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_breakage")
                            .from(Notifications::Table, Notifications::BreakageId)
                            .to(Breakages::Table, Breakages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        db.execute_unprepared(
            "CREATE INDEX idx_notifications_user_created ON notifications (user_id, created_at DESC)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Breakages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CarsPositions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PositionData::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SensorData::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Drivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wheels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    Name,
    Inn,
    Timezone,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Cars {
    Table,
    Id,
    CompanyId,
    StateNumber,
    Brand,
    DeviceNumber,
    UnicumId,
    AxleCount,
    CarType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Wheels {
    Table,
    Id,
    CompanyId,
    CarId,
    AxleNumber,
    Position,
    SensorNumber,
    Size,
    Cost,
    Brand,
    Model,
    Mileage,
    MinTemperature,
    MaxTemperature,
    MinPressure,
    MaxPressure,
    Ngp,
    Tkvh,
}

#[derive(DeriveIden)]
enum Drivers {
    Table,
    Id,
    CompanyId,
    CarId,
    Name,
    Surname,
    MiddleName,
    Phone,
    Birthday,
    Rating,
    WorkedTime,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SensorData {
    Table,
    Id,
    DeviceNumber,
    SensorNumber,
    Pressure,
    Temperature,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PositionData {
    Table,
    Id,
    DeviceNumber,
    Latitude,
    Longitude,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CarsPositions {
    Table,
    Id,
    CompanyId,
    CarId,
    Latitude,
    Longitude,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Breakages {
    Table,
    Id,
    CarId,
    DriverId,
    Latitude,
    Longitude,
    Type,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    UserId,
    BreakageId,
    Note,
    Status,
    CreatedAt,
}
