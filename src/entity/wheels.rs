use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wheels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub car_id: Uuid,
    pub axle_number: i32,
    pub position: i32,
    #[sea_orm(unique)]
    pub sensor_number: String,
    pub size: f64,
    pub cost: f64,
    pub brand: String,
    pub model: String,
    pub mileage: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub min_pressure: f64,
    pub max_pressure: f64,
    pub ngp: Option<f64>,
    pub tkvh: Option<f64>,
}

impl Model {
    /// Temperature strictly outside `[min_temperature, max_temperature]`.
    #[must_use]
    pub fn temperature_out_of_bounds(&self, temperature: f64) -> bool {
        temperature < self.min_temperature || temperature > self.max_temperature
    }

    /// Pressure strictly outside `[min_pressure, max_pressure]`.
    #[must_use]
    pub fn pressure_out_of_bounds(&self, pressure: f64) -> bool {
        pressure < self.min_pressure || pressure > self.max_pressure
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cars::Entity",
        from = "Column::CarId",
        to = "super::cars::Column::Id"
    )]
    Car,
}

impl Related<super::cars::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
