//! Sample ingestion, per-wheel reads and out-of-bounds reports.
//!
//! Run with: cargo test --test telemetry_reports

mod common;

use tire_telemetry::error::ErrorKind;
use tire_telemetry::models::NewSensorSample;
use tokio_test::assert_ok;

use common::{DEVICE, at, fleet, new_car, new_wheel};

fn sample(device: &str, sensor: &str, pressure: f64, temperature: f64, minute: i64) -> NewSensorSample {
    NewSensorSample {
        device_number: device.to_string(),
        sensor_number: sensor.to_string(),
        pressure,
        temperature,
        time: at(minute),
    }
}

#[tokio::test]
async fn record_sample_keeps_values_as_reported() {
    let fleet = fleet().await;

    let stored = fleet
        .services
        .telemetry
        .record_sample(sample(DEVICE, "S1", 99.0, -273.0, 0))
        .await
        .unwrap();

    assert_eq!(stored.pressure, 99.0);
    assert_eq!(stored.temperature, -273.0);
    assert_eq!(stored.created_at, at(0));
    assert_eq!(fleet.store.sensor_data().len(), 1);
}

#[tokio::test]
async fn record_sample_requires_identifiers() {
    let fleet = fleet().await;

    let err = fleet
        .services
        .telemetry
        .record_sample(sample(" ", "S1", 32.0, 20.0, 0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(fleet.store.sensor_data().is_empty());
}

#[tokio::test]
async fn latest_per_wheel_picks_newest_sample_per_position() {
    let fleet = fleet().await;
    let registry = &fleet.services.registry;
    let telemetry = &fleet.services.telemetry;
    let car_id = fleet.car.id;

    registry.register_wheel(new_wheel(car_id, 2, "S2")).await.unwrap();
    registry.register_wheel(new_wheel(car_id, 1, "S1")).await.unwrap();
    registry.register_wheel(new_wheel(car_id, 3, "S3")).await.unwrap();

    for (sensor, pressure, minute) in [("S1", 31.0, 0), ("S1", 33.0, 10), ("S2", 32.0, 5), ("S1", 30.0, 3)] {
        assert_ok!(telemetry.record_sample(sample(DEVICE, sensor, pressure, 20.0, minute)).await);
    }
    // Same sensor reported through another device does not belong to this car
    assert_ok!(telemetry.record_sample(sample("OTHER", "S2", 50.0, 20.0, 30)).await);

    let latest = telemetry.latest_per_wheel(car_id).await.unwrap();
    let summary: Vec<(i32, f64)> = latest.iter().map(|s| (s.position, s.pressure)).collect();
    assert_eq!(summary, vec![(1, 33.0), (2, 32.0)]);
    assert_eq!(latest[0].recorded_at, at(10));
}

#[tokio::test]
async fn latest_per_wheel_is_empty_without_samples() {
    let fleet = fleet().await;
    fleet
        .services
        .registry
        .register_wheel(new_wheel(fleet.car.id, 1, "S1"))
        .await
        .unwrap();

    let latest = fleet.services.telemetry.latest_per_wheel(fleet.car.id).await.unwrap();
    assert!(latest.is_empty());
}

#[tokio::test]
async fn history_series_are_time_ordered_within_window() {
    let fleet = fleet().await;
    let wheel = fleet
        .services
        .registry
        .register_wheel(new_wheel(fleet.car.id, 1, "S1"))
        .await
        .unwrap();
    let telemetry = &fleet.services.telemetry;

    for (pressure, temperature, minute) in [(31.0, 40.0, 20), (32.0, 41.0, 0), (33.0, 42.0, 10), (34.0, 43.0, 60)] {
        assert_ok!(telemetry.record_sample(sample(DEVICE, "S1", pressure, temperature, minute)).await);
    }

    let pressures = telemetry.pressure_history(wheel.id, at(0), at(20)).await.unwrap();
    let values: Vec<f64> = pressures.iter().map(|m| m.value).collect();
    assert_eq!(values, vec![32.0, 33.0, 31.0]);

    let temperatures = telemetry.temperature_history(wheel.id, at(5), at(60)).await.unwrap();
    let times: Vec<_> = temperatures.iter().map(|m| m.time).collect();
    assert_eq!(times, vec![at(10), at(20), at(60)]);
    assert_eq!(temperatures[0].value, 42.0);
}

#[tokio::test]
async fn history_samples_sharing_a_timestamp_follow_id_order() {
    let fleet = fleet().await;
    let wheel = fleet
        .services
        .registry
        .register_wheel(new_wheel(fleet.car.id, 1, "S1"))
        .await
        .unwrap();
    let telemetry = &fleet.services.telemetry;

    let mut recorded = Vec::new();
    for pressure in [31.0, 32.0, 33.0, 34.0] {
        recorded.push(
            telemetry
                .record_sample(sample(DEVICE, "S1", pressure, 40.0, 5))
                .await
                .unwrap(),
        );
    }
    recorded.sort_by_key(|s| s.id);

    let pressures = telemetry.pressure_history(wheel.id, at(0), at(10)).await.unwrap();
    let values: Vec<f64> = pressures.iter().map(|m| m.value).collect();
    assert_eq!(values, recorded.iter().map(|s| s.pressure).collect::<Vec<_>>());
}

#[tokio::test]
async fn history_rejects_inverted_window() {
    let fleet = fleet().await;
    let wheel = fleet
        .services
        .registry
        .register_wheel(new_wheel(fleet.car.id, 1, "S1"))
        .await
        .unwrap();

    let err = fleet
        .services
        .telemetry
        .pressure_history(wheel.id, at(10), at(0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn report_counts_out_of_bounds_samples() {
    let fleet = fleet().await;
    let registry = &fleet.services.registry;
    let telemetry = &fleet.services.telemetry;

    let wheel = registry.register_wheel(new_wheel(fleet.car.id, 1, "S1")).await.unwrap();
    // Pressure bounds are [30, 35]: 28 and 40 are out, 32 is in
    for (pressure, minute) in [(28.0, 0), (32.0, 1), (40.0, 2)] {
        assert_ok!(telemetry.record_sample(sample(DEVICE, "S1", pressure, 20.0, minute)).await);
    }

    let report = fleet.services.reports.generate_report(fleet.company.id).await.unwrap();
    assert_eq!(report.len(), 1);
    let row = &report[0];
    assert_eq!(row.wheel_id, wheel.id);
    assert_eq!(row.state_number, "A123BC");
    assert_eq!(row.tire_brand, "Cordiant");
    assert_eq!(row.pressure_out_of_bounds, 2);
    assert_eq!(row.temperature_out_of_bounds, 0);
    assert_eq!(row.sample_count, 3);
}

#[tokio::test]
async fn report_bounds_are_inclusive() {
    let fleet = fleet().await;
    let telemetry = &fleet.services.telemetry;
    fleet
        .services
        .registry
        .register_wheel(new_wheel(fleet.car.id, 1, "S1"))
        .await
        .unwrap();

    assert_ok!(telemetry.record_sample(sample(DEVICE, "S1", 30.0, -20.0, 0)).await);
    assert_ok!(telemetry.record_sample(sample(DEVICE, "S1", 35.0, 80.0, 1)).await);
    assert_ok!(telemetry.record_sample(sample(DEVICE, "S1", 35.5, 80.5, 2)).await);

    let report = fleet.services.reports.generate_report(fleet.company.id).await.unwrap();
    assert_eq!(report[0].pressure_out_of_bounds, 1);
    assert_eq!(report[0].temperature_out_of_bounds, 1);
}

#[tokio::test]
async fn report_orders_by_state_number_then_position() {
    let fleet = fleet().await;
    let registry = &fleet.services.registry;

    let other = registry
        .register_car(new_car(fleet.company.id, "A001AA", "DEV2"))
        .await
        .unwrap();
    registry.register_wheel(new_wheel(fleet.car.id, 2, "S12")).await.unwrap();
    registry.register_wheel(new_wheel(fleet.car.id, 1, "S11")).await.unwrap();
    registry.register_wheel(new_wheel(other.id, 1, "S21")).await.unwrap();

    let report = fleet.services.reports.generate_report(fleet.company.id).await.unwrap();
    let order: Vec<(&str, i32)> = report
        .iter()
        .map(|r| (r.state_number.as_str(), r.position))
        .collect();
    assert_eq!(order, vec![("A001AA", 1), ("A123BC", 1), ("A123BC", 2)]);
    assert!(report.iter().all(|r| r.sample_count == 0));
}
