//! Service boundary consumed by presentation code.
//!
//! Each service is generic over the repository traits it needs and maps
//! repository-level absence onto `NotFound`/`NoContent`.

mod breakages;
mod devices;
mod notifications;
mod positions;
mod registry;
mod reports;
mod telemetry;

pub use breakages::BreakageCorrelator;
pub use devices::DeviceResolver;
pub use notifications::NotificationStore;
pub use positions::PositionTracker;
pub use registry::FleetRegistry;
pub use reports::ReportAggregator;
pub use telemetry::TelemetryIngest;

use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult};

fn check_window(from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<()> {
    if to < from {
        tracing::warn!(%from, %to, "Rejected inverted time window");
        return Err(AppError::InvalidInput(format!(
            "window end {to} is before its start {from}"
        )));
    }
    Ok(())
}
