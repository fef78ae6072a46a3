//! Domain objects passed across the repository and service boundaries.
//!
//! Stored rows are the sea-orm entity models, re-exported here under domain
//! names. Joined read models derive `FromQueryResult` so the Postgres adapter
//! can map raw SQL rows straight into them.

mod breakages;
mod fleet;
mod notifications;
mod telemetry;
mod tracking;

pub use breakages::{BreakageInfo, CarBreakageReport, FieldReport, NewBreakage};
pub use fleet::{
    CarWithWheels, DriverStatistics, NewCar, NewCompany, NewDriver, NewWheel, WheelUpdate,
    experience_months,
};
pub use notifications::{NewNotification, NotificationInfo, NotificationListItem};
pub use telemetry::{Measurement, NewSensorSample, WheelReportRow, WheelSample};
pub use tracking::CurrentPositionRow;

pub use crate::entity::notifications::NotificationStatus;

pub type Breakage = crate::entity::breakages::Model;
pub type Car = crate::entity::cars::Model;
pub type Company = crate::entity::companies::Model;
pub type CurrentPosition = crate::entity::cars_positions::Model;
pub type Driver = crate::entity::drivers::Model;
pub type Notification = crate::entity::notifications::Model;
pub type Position = crate::entity::position_data::Model;
pub type SensorData = crate::entity::sensor_data::Model;
pub type Wheel = crate::entity::wheels::Model;
