use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DeviceResolver;
use crate::common::Point;
use crate::error::{AppError, AppResult};
use crate::models::{
    Breakage, BreakageInfo, Car, CarBreakageReport, FieldReport, NewBreakage, NewNotification,
    NotificationStatus,
};
use crate::store::{BreakageRepository, FleetRepository};

/// Turns field reports into breakages and operator notifications.
#[derive(Clone)]
pub struct BreakageCorrelator<S> {
    store: S,
    devices: DeviceResolver<S>,
    note_label: String,
}

impl<S> BreakageCorrelator<S>
where
    S: FleetRepository + BreakageRepository + Clone,
{
    pub fn new(store: S, note_label: impl Into<String>) -> Self {
        Self {
            devices: DeviceResolver::new(store.clone()),
            store,
            note_label: note_label.into(),
        }
    }

    /// Store the reported breakage and notify the car's company.
    ///
    /// The breakage and its notification are written together or not at all.
    /// A car without a current driver still gets a breakage, with no driver.
    ///
    /// The point must hold exactly two values, and beyond that the latitude
    /// must lie in `[-90, 90]` and the longitude in `[-180, 180]`. Reports
    /// with out-of-range coordinates are refused rather than stored.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a malformed or out-of-range point or an empty device
    /// number, `NotFound` for an unknown device.
    pub async fn create_from_field_report(&self, report: FieldReport) -> AppResult<Breakage> {
        let point = Point::from_coordinates(&report.point).inspect_err(|e| {
            tracing::warn!(device_number = %report.device_number, error = %e, "Rejected field report");
        })?;
        if report.device_number.trim().is_empty() {
            tracing::warn!("Rejected field report without device number");
            return Err(AppError::InvalidInput("device number is required".to_string()));
        }

        let car = self.devices.resolve_car(&report.device_number).await?;
        self.record(
            &car,
            point,
            report.breakage_type,
            report.description,
            report.time,
        )
        .await
    }

    /// Store a breakage entered for a known car, with the same driver
    /// attribution and notification as a field report.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a malformed or out-of-range point, `NotFound` for an
    /// unknown car.
    pub async fn register_breakage(&self, report: CarBreakageReport) -> AppResult<Breakage> {
        let point = Point::from_coordinates(&report.point).inspect_err(|e| {
            tracing::warn!(car_id = %report.car_id, error = %e, "Rejected breakage");
        })?;
        let car = self
            .store
            .find_car(report.car_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("car {}", report.car_id)))?;

        self.record(
            &car,
            point,
            report.breakage_type,
            report.description,
            report.time,
        )
        .await
    }

    /// Breakage history of a car, oldest first.
    pub async fn list_by_car_id(&self, car_id: Uuid) -> AppResult<Vec<BreakageInfo>> {
        self.store.breakages_for_car(car_id).await
    }

    async fn record(
        &self,
        car: &Car,
        point: Point,
        breakage_type: String,
        description: String,
        time: DateTime<Utc>,
    ) -> AppResult<Breakage> {
        let driver_id = match self.devices.resolve_current_driver(car.id).await {
            Ok(driver) => Some(driver.id),
            Err(AppError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        let notification = NewNotification {
            user_id: car.company_id,
            note: format!("{}{}", self.note_label, description),
            status: NotificationStatus::New,
            created_at: Utc::now(),
        };
        let breakage = NewBreakage {
            car_id: car.id,
            driver_id,
            point,
            breakage_type,
            description,
            time,
        };

        let (breakage, notification) = self
            .store
            .insert_breakage_with_notification(breakage, notification)
            .await?;

        tracing::info!(
            breakage_id = %breakage.id,
            notification_id = %notification.id,
            car_id = %car.id,
            has_driver = driver_id.is_some(),
            "Breakage recorded"
        );
        Ok(breakage)
    }
}
