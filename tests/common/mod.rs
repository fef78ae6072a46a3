//! Shared fixtures: an in-memory store seeded with one company and one car.

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use tire_telemetry::common::Services;
use tire_telemetry::config::Config;
use tire_telemetry::models::{Car, Company, NewCar, NewCompany, NewDriver, NewWheel};
use tire_telemetry::store::MemoryStore;

pub const DEVICE: &str = "DEV1";

pub struct Fleet {
    pub store: MemoryStore,
    pub services: Services<MemoryStore>,
    pub company: Company,
    pub car: Car,
}

pub async fn fleet() -> Fleet {
    let store = MemoryStore::new();
    let config = Config::with_database_url("postgres://localhost/unused");
    let services = Services::new(store.clone(), &config);

    let company = services
        .registry
        .register_company(new_company("7701234567"))
        .await
        .unwrap();
    let car = services
        .registry
        .register_car(new_car(company.id, "A123BC", DEVICE))
        .await
        .unwrap();

    Fleet {
        store,
        services,
        company,
        car,
    }
}

pub fn new_company(inn: &str) -> NewCompany {
    NewCompany {
        name: "Northern Freight".to_string(),
        inn: inn.to_string(),
        timezone: "Europe/Moscow".to_string(),
    }
}

pub fn new_car(company_id: Uuid, state_number: &str, device_number: &str) -> NewCar {
    NewCar {
        company_id,
        state_number: state_number.to_string(),
        brand: "KAMAZ".to_string(),
        device_number: device_number.to_string(),
        unicum_id: format!("U-{state_number}"),
        axle_count: 3,
        car_type: "truck".to_string(),
    }
}

/// Wheel with temperature bounds `[-20, 80]` and pressure bounds `[30, 35]`.
pub fn new_wheel(car_id: Uuid, position: i32, sensor_number: &str) -> NewWheel {
    NewWheel {
        car_id,
        axle_number: (position + 1) / 2,
        position,
        sensor_number: sensor_number.to_string(),
        size: 22.5,
        cost: 42_000.0,
        brand: "Cordiant".to_string(),
        model: "Professional".to_string(),
        mileage: 12_500.0,
        min_temperature: -20.0,
        max_temperature: 80.0,
        min_pressure: 30.0,
        max_pressure: 35.0,
        ngp: Some(14.0),
        tkvh: None,
    }
}

pub fn new_driver(car_id: Uuid, name: &str) -> NewDriver {
    NewDriver {
        car_id,
        name: name.to_string(),
        surname: "Petrov".to_string(),
        middle_name: None,
        phone: "+70000000000".to_string(),
        birthday: NaiveDate::from_ymd_opt(1985, 4, 12).unwrap(),
        rating: 4.8,
    }
}

/// Fixed base instant plus `minutes`.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
}
