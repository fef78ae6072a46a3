use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{DeviceResolver, check_window};
use crate::common::{GeoBox, Point};
use crate::error::{AppError, AppResult};
use crate::models::{CurrentPosition, CurrentPositionRow, Position};
use crate::store::{FleetRepository, PositionRepository};

/// GPS fix history, current positions and area queries.
#[derive(Clone)]
pub struct PositionTracker<S> {
    store: S,
    devices: DeviceResolver<S>,
}

impl<S> PositionTracker<S>
where
    S: FleetRepository + PositionRepository + Clone,
{
    pub fn new(store: S) -> Self {
        Self {
            devices: DeviceResolver::new(store.clone()),
            store,
        }
    }

    /// Append a fix to the device's history. Duplicates are kept.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the device number is empty.
    pub async fn record_position(
        &self,
        device_number: &str,
        point: Point,
        time: DateTime<Utc>,
    ) -> AppResult<Position> {
        if device_number.trim().is_empty() {
            return Err(AppError::InvalidInput("device number is required".to_string()));
        }
        self.store.insert_position(device_number, point, time).await
    }

    /// Last write wins; concurrent writers for one car never produce two rows.
    pub async fn upsert_current_position(
        &self,
        company_id: Uuid,
        car_id: Uuid,
        point: Point,
        time: DateTime<Utc>,
    ) -> AppResult<CurrentPosition> {
        self.store
            .upsert_current_position(company_id, car_id, point, time)
            .await
    }

    /// Handle an inbound fix: append it and move the car's current position.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown device.
    pub async fn track(
        &self,
        device_number: &str,
        point: Point,
        time: DateTime<Utc>,
    ) -> AppResult<CurrentPosition> {
        let car = self.devices.resolve_car(device_number).await?;
        self.record_position(device_number, point, time).await?;
        let current = self
            .upsert_current_position(car.company_id, car.id, point, time)
            .await?;

        tracing::debug!(
            car_id = %car.id,
            latitude = point.latitude,
            longitude = point.longitude,
            "Position tracked"
        );
        Ok(current)
    }

    /// Fixes of the car within `[from, to]`, oldest first.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown car, `InvalidInput` when `to < from`.
    pub async fn get_route(
        &self,
        car_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Position>> {
        check_window(from, to)?;

        let car = self.store.find_car(car_id).await?.ok_or_else(|| {
            tracing::debug!(car_id = %car_id, "Route requested for unknown car");
            AppError::NotFound(format!("car {car_id}"))
        })?;

        let route = self.store.route(&car.device_number, from, to).await?;
        tracing::debug!(car_id = %car_id, count = route.len(), "Route loaded");
        Ok(route)
    }

    /// # Errors
    ///
    /// `NoContent` when no car of the company has a position yet.
    pub async fn get_current_positions(
        &self,
        company_id: Uuid,
    ) -> AppResult<Vec<CurrentPositionRow>> {
        let rows = self.store.current_positions(company_id).await?;
        if rows.is_empty() {
            tracing::debug!(company_id = %company_id, "No current positions");
            return Err(AppError::NoContent(format!(
                "no current positions for company {company_id}"
            )));
        }
        Ok(rows)
    }

    /// Cars whose current position lies in the rectangle spanned by the two
    /// corners, bounds inclusive. Corner order does not matter.
    pub async fn get_positions_in_box(
        &self,
        point_a: Point,
        point_b: Point,
    ) -> AppResult<Vec<CurrentPositionRow>> {
        let area = GeoBox::from_corners(point_a, point_b);
        let rows = self.store.current_positions_in_box(area).await?;
        tracing::debug!(count = rows.len(), "Positions in box");
        Ok(rows)
    }
}
