//! Notification listing, detail and status changes.
//!
//! Run with: cargo test --test notifications

mod common;

use tire_telemetry::error::ErrorKind;
use tire_telemetry::models::{FieldReport, NotificationStatus};
use uuid::Uuid;

use common::{DEVICE, Fleet, at, fleet, new_driver};

async fn report_breakage(fleet: &Fleet, breakage_type: &str) -> Uuid {
    fleet
        .services
        .breakages
        .create_from_field_report(FieldReport {
            device_number: DEVICE.to_string(),
            point: vec![55.75, 37.61],
            breakage_type: breakage_type.to_string(),
            description: format!("{breakage_type} on the road"),
            time: at(0),
        })
        .await
        .unwrap();

    let notifications = fleet.store.notifications();
    notifications.last().unwrap().id
}

#[tokio::test]
async fn list_is_newest_first_and_filterable() {
    let fleet = fleet().await;
    let first = report_breakage(&fleet, "puncture").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = report_breakage(&fleet, "blowout").await;
    let notifications = &fleet.services.notifications;

    let all = notifications
        .list_for_user(fleet.company.id, None, 10, 0)
        .await
        .unwrap();
    let ids: Vec<Uuid> = all.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(all[0].breakage_type, "blowout");
    assert_eq!(all[0].state_number, "A123BC");
    assert_eq!(all[0].brand, "KAMAZ");

    notifications
        .update_status(first, NotificationStatus::Acknowledged)
        .await
        .unwrap();
    let acknowledged = notifications
        .list_for_user(fleet.company.id, Some(NotificationStatus::Acknowledged), 10, 0)
        .await
        .unwrap();
    assert_eq!(acknowledged.len(), 1);
    assert_eq!(acknowledged[0].id, first);

    let paged = notifications
        .list_for_user(fleet.company.id, None, 1, 1)
        .await
        .unwrap();
    assert_eq!(paged.len(), 1);
    assert_eq!(paged[0].id, first);
}

#[tokio::test]
async fn list_rejects_bad_windows() {
    let fleet = fleet().await;
    let notifications = &fleet.services.notifications;

    let err = notifications
        .list_for_user(fleet.company.id, None, 0, 0)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = notifications
        .list_for_user(fleet.company.id, None, 10, -1)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn updates_without_matches_are_no_content() {
    let fleet = fleet().await;
    let notifications = &fleet.services.notifications;

    let err = notifications
        .update_status(Uuid::new_v4(), NotificationStatus::Resolved)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoContent);

    let err = notifications
        .update_all_status_for_user(fleet.company.id, NotificationStatus::Resolved)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoContent);
}

#[tokio::test]
async fn update_all_for_user_touches_every_notification() {
    let fleet = fleet().await;
    report_breakage(&fleet, "puncture").await;
    report_breakage(&fleet, "blowout").await;

    let updated = fleet
        .services
        .notifications
        .update_all_status_for_user(fleet.company.id, NotificationStatus::Resolved)
        .await
        .unwrap();
    assert_eq!(updated, 2);
    assert!(
        fleet
            .store
            .notifications()
            .iter()
            .all(|n| n.status == NotificationStatus::Resolved)
    );
}

#[tokio::test]
async fn info_joins_breakage_and_driver() {
    let fleet = fleet().await;
    fleet
        .services
        .registry
        .register_driver(new_driver(fleet.car.id, "Ivan"))
        .await
        .unwrap();
    let id = report_breakage(&fleet, "puncture").await;

    let info = fleet.services.notifications.get_info(id).await.unwrap();
    assert_eq!(info.note, "Breakage reported: puncture on the road");
    assert_eq!(info.driver_name.as_deref(), Some("Ivan Petrov"));
    assert_eq!(info.latitude, 55.75);
    assert_eq!(info.longitude, 37.61);
    assert_eq!(info.status, NotificationStatus::New);

    let err = fleet
        .services
        .notifications
        .get_info(Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoContent);
}

#[test]
fn unknown_status_string_is_invalid_input() {
    let err = "archived".parse::<NotificationStatus>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}
