use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One pressure/temperature sample reported by a tire sensor through a car's device.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensor_data")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub device_number: String,
    pub sensor_number: String,
    pub pressure: f64,
    pub temperature: f64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
