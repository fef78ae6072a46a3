use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub state_number: String,
    pub brand: String,
    /// Telemetry unit id; joins sensor samples and GPS fixes to the car.
    #[sea_orm(unique)]
    pub device_number: String,
    pub unicum_id: String,
    pub axle_count: i32,
    pub car_type: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Company,
    #[sea_orm(has_many = "super::wheels::Entity")]
    Wheels,
    #[sea_orm(has_many = "super::drivers::Entity")]
    Drivers,
    #[sea_orm(has_many = "super::breakages::Entity")]
    Breakages,
    #[sea_orm(has_one = "super::cars_positions::Entity")]
    CurrentPosition,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::wheels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wheels.def()
    }
}

impl Related<super::drivers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Drivers.def()
    }
}

impl Related<super::breakages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Breakages.def()
    }
}

impl Related<super::cars_positions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CurrentPosition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
