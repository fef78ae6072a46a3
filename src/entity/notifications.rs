use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Recipient company
    pub user_id: Uuid,
    pub breakage_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub note: String,
    pub status: NotificationStatus,
    pub created_at: DateTimeUtc,
}

/// Lifecycle of an operator notification.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "acknowledged")]
    Acknowledged,
    #[sea_orm(string_value = "resolved")]
    Resolved,
}

impl NotificationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Acknowledged => "acknowledged",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "acknowledged" => Ok(Self::Acknowledged),
            "resolved" => Ok(Self::Resolved),
            other => Err(AppError::InvalidInput(format!(
                "unknown notification status '{other}', expected one of: new, acknowledged, resolved"
            ))),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::breakages::Entity",
        from = "Column::BreakageId",
        to = "super::breakages::Column::Id"
    )]
    Breakage,
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::UserId",
        to = "super::companies::Column::Id"
    )]
    Company,
}

impl Related<super::breakages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Breakage.def()
    }
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "Acknowledged".parse::<NotificationStatus>().unwrap(),
            NotificationStatus::Acknowledged
        );
        assert_eq!(" new ".parse::<NotificationStatus>().unwrap(), NotificationStatus::New);
    }

    #[test]
    fn unknown_status_is_invalid_input() {
        let err = "archived".parse::<NotificationStatus>().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn status_display_matches_stored_value() {
        for status in [
            NotificationStatus::New,
            NotificationStatus::Acknowledged,
            NotificationStatus::Resolved,
        ] {
            assert_eq!(status.to_string().parse::<NotificationStatus>().unwrap(), status);
        }
    }
}
