//! Postgres-backed store against a live database.
//!
//! Every test creates its own company, car and device, so they can share one
//! database and run in parallel.
//!
//! Run with: cargo test --test pg_store -- --ignored

mod common;

use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use tire_telemetry::common::{Point, Services};
use tire_telemetry::config::Config;
use tire_telemetry::entity::{cars_positions, drivers};
use tire_telemetry::error::{AppError, ErrorKind};
use tire_telemetry::models::{Car, Company, FieldReport, NewSensorSample, NotificationStatus};
use tire_telemetry::store::PgStore;

use common::{at, new_car, new_company, new_driver, new_wheel};

static MIGRATED: Mutex<bool> = Mutex::const_new(false);

struct PgFleet {
    db: DatabaseConnection,
    services: Services<PgStore>,
    company: Company,
    car: Car,
    device: String,
    tag: String,
}

async fn pg_fleet() -> PgFleet {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = Database::connect(&url).await.unwrap();
    {
        let mut migrated = MIGRATED.lock().await;
        if !*migrated {
            Migrator::up(&db, None).await.unwrap();
            *migrated = true;
        }
    }

    let services = Services::new(PgStore::new(db.clone()), &Config::with_database_url(url));
    let tag = Uuid::new_v4().simple().to_string()[..12].to_string();
    let device = format!("DEV-{tag}");

    let company = services
        .registry
        .register_company(new_company(&tag))
        .await
        .unwrap();
    let car = services
        .registry
        .register_car(new_car(company.id, &format!("A{tag}"), &device))
        .await
        .unwrap();

    PgFleet {
        db,
        services,
        company,
        car,
        device,
        tag,
    }
}

fn point(latitude: f64, longitude: f64) -> Point {
    Point::new(latitude, longitude).unwrap()
}

fn field_report(device: &str, description: &str) -> FieldReport {
    FieldReport {
        device_number: device.to_string(),
        point: vec![55.75, 37.61],
        breakage_type: "puncture".to_string(),
        description: description.to_string(),
        time: at(0),
    }
}

#[tokio::test]
#[ignore]
async fn upsert_keeps_one_row_per_car() {
    let fleet = pg_fleet().await;
    let positions = &fleet.services.positions;

    positions
        .upsert_current_position(fleet.company.id, fleet.car.id, point(55.75, 37.61), at(0))
        .await
        .unwrap();
    positions
        .upsert_current_position(fleet.company.id, fleet.car.id, point(59.93, 30.33), at(5))
        .await
        .unwrap();

    let rows = cars_positions::Entity::find()
        .filter(cars_positions::Column::CarId.eq(fleet.car.id))
        .all(&fleet.db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].latitude, 59.93);
    assert_eq!(rows[0].longitude, 30.33);
    assert_eq!(rows[0].updated_at, at(5));
}

#[tokio::test]
#[ignore]
async fn report_counts_out_of_bounds_pressure() {
    let fleet = pg_fleet().await;
    let sensor = format!("S-{}", fleet.tag);
    fleet
        .services
        .registry
        .register_wheel(new_wheel(fleet.car.id, 1, &sensor))
        .await
        .unwrap();

    // Pressure bounds are [30, 35]
    for (pressure, minute) in [(28.0, 0), (32.0, 1), (40.0, 2)] {
        fleet
            .services
            .telemetry
            .record_sample(NewSensorSample {
                device_number: fleet.device.clone(),
                sensor_number: sensor.clone(),
                pressure,
                temperature: 20.0,
                time: at(minute),
            })
            .await
            .unwrap();
    }

    let report = fleet
        .services
        .reports
        .generate_report(fleet.company.id)
        .await
        .unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].sample_count, 3);
    assert_eq!(report[0].pressure_out_of_bounds, 2);
    assert_eq!(report[0].temperature_out_of_bounds, 0);

    let latest = fleet.services.telemetry.latest_per_wheel(fleet.car.id).await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].pressure, 40.0);
}

#[tokio::test]
#[ignore]
async fn route_is_ascending_windowed_and_stable_on_ties() {
    let fleet = pg_fleet().await;
    let positions = &fleet.services.positions;

    for (minute, latitude) in [(30, 3.0), (0, 0.0), (20, 2.0), (90, 9.0)] {
        positions
            .record_position(&fleet.device, point(latitude, 10.0), at(minute))
            .await
            .unwrap();
    }
    let mut tied = Vec::new();
    for latitude in [1.0, 1.1, 1.2] {
        tied.push(
            positions
                .record_position(&fleet.device, point(latitude, 10.0), at(10))
                .await
                .unwrap(),
        );
    }
    tied.sort_by_key(|p| p.id);

    let route = positions.get_route(fleet.car.id, at(10), at(30)).await.unwrap();
    let times: Vec<_> = route.iter().map(|p| p.created_at).collect();
    assert_eq!(times, vec![at(10), at(10), at(10), at(20), at(30)]);

    let tied_ids: Vec<Uuid> = route[..3].iter().map(|p| p.id).collect();
    assert_eq!(tied_ids, tied.iter().map(|p| p.id).collect::<Vec<_>>());
}

#[tokio::test]
#[ignore]
async fn notifications_list_newest_first_with_optional_status() {
    let fleet = pg_fleet().await;
    for description in ["first", "second", "third"] {
        fleet
            .services
            .breakages
            .create_from_field_report(field_report(&fleet.device, description))
            .await
            .unwrap();
    }
    let notifications = &fleet.services.notifications;

    let all = notifications
        .list_for_user(fleet.company.id, None, 10, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    assert!(all.iter().all(|n| n.status == NotificationStatus::New));
    assert_eq!(all[0].state_number, fleet.car.state_number);

    notifications
        .update_status(all[0].id, NotificationStatus::Acknowledged)
        .await
        .unwrap();

    let acknowledged = notifications
        .list_for_user(fleet.company.id, Some(NotificationStatus::Acknowledged), 10, 0)
        .await
        .unwrap();
    assert_eq!(acknowledged.len(), 1);
    assert_eq!(acknowledged[0].id, all[0].id);

    let fresh = notifications
        .list_for_user(fleet.company.id, Some(NotificationStatus::New), 10, 0)
        .await
        .unwrap();
    assert_eq!(fresh.len(), 2);
}

#[tokio::test]
#[ignore]
async fn breakages_and_driver_list_carry_driver_names() {
    let fleet = pg_fleet().await;
    let driver = fleet
        .services
        .registry
        .register_driver(new_driver(fleet.car.id, "Ivan"))
        .await
        .unwrap();
    fleet
        .services
        .breakages
        .create_from_field_report(field_report(&fleet.device, "flat"))
        .await
        .unwrap();

    let history = fleet.services.breakages.list_by_car_id(fleet.car.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].driver_name.as_deref(), Some("Ivan Petrov"));

    let drivers = fleet
        .services
        .registry
        .list_drivers(fleet.company.id, None, 0)
        .await
        .unwrap();
    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers[0].driver_id, driver.id);
    assert_eq!(drivers[0].full_name, "Ivan Petrov");
    assert_eq!(drivers[0].breakage_count, 1);
    assert_eq!(drivers[0].experience_months, 0);
}

#[tokio::test]
#[ignore]
async fn box_query_finds_car_inside_area() {
    let fleet = pg_fleet().await;
    fleet
        .services
        .positions
        .upsert_current_position(fleet.company.id, fleet.car.id, point(-45.5, -120.25), at(0))
        .await
        .unwrap();

    let inside = fleet
        .services
        .positions
        .get_positions_in_box(point(-45.0, -120.0), point(-46.0, -121.0))
        .await
        .unwrap();
    assert!(inside.iter().any(|row| row.car_id == fleet.car.id));

    let outside = fleet
        .services
        .positions
        .get_positions_in_box(point(10.0, 10.0), point(11.0, 11.0))
        .await
        .unwrap();
    assert!(outside.iter().all(|row| row.car_id != fleet.car.id));
}

#[tokio::test]
#[ignore]
async fn second_active_driver_for_a_car_is_refused() {
    let fleet = pg_fleet().await;
    let first = fleet
        .services
        .registry
        .register_driver(new_driver(fleet.car.id, "Ivan"))
        .await
        .unwrap();

    let err = drivers::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(fleet.company.id),
        car_id: Set(fleet.car.id),
        name: Set("Oleg".to_string()),
        surname: Set("Petrov".to_string()),
        middle_name: Set(None),
        phone: Set("+70000000001".to_string()),
        birthday: Set(first.birthday),
        rating: Set(4.0),
        worked_time: Set(0),
        is_active: Set(true),
        created_at: Set(at(0)),
    }
    .insert(&fleet.db)
    .await
    .unwrap_err();
    assert_eq!(AppError::from(err).kind(), ErrorKind::AlreadyExists);
}

#[tokio::test]
#[ignore]
async fn concurrent_driver_registration_leaves_one_active_driver() {
    let fleet = pg_fleet().await;
    let registry = &fleet.services.registry;

    let (a, b) = tokio::join!(
        registry.register_driver(new_driver(fleet.car.id, "Ivan")),
        registry.register_driver(new_driver(fleet.car.id, "Oleg")),
    );
    assert!(a.is_ok() || b.is_ok());
    for result in [&a, &b] {
        if let Err(err) = result {
            assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        }
    }

    let active = drivers::Entity::find()
        .filter(drivers::Column::CarId.eq(fleet.car.id))
        .filter(drivers::Column::IsActive.eq(true))
        .all(&fleet.db)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
}
