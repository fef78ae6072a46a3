use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::Serialize;
use uuid::Uuid;

use super::NotificationStatus;

/// Notification derived from a breakage; the recipient is the car's company.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub note: String,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
}

/// Detail view: notification joined with its breakage and driver.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct NotificationInfo {
    pub id: Uuid,
    pub note: String,
    pub status: NotificationStatus,
    pub driver_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct NotificationListItem {
    pub id: Uuid,
    pub state_number: String,
    pub brand: String,
    pub breakage_type: String,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
}
