use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "drivers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub car_id: Uuid,
    pub name: String,
    pub surname: String,
    pub middle_name: Option<String>,
    pub phone: String,
    pub birthday: Date,
    pub rating: f64,
    /// Accumulated worked time in minutes
    pub worked_time: i64,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// "Name Surname Middle", skipping an absent middle name.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.middle_name.as_deref() {
            Some(middle) if !middle.is_empty() => {
                format!("{} {} {}", self.name, self.surname, middle)
            }
            _ => format!("{} {}", self.name, self.surname),
        }
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
    #[sea_orm(has_many = "super::breakages::Entity")]
    Breakages,
}

impl Related<super::cars::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

impl Related<super::breakages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Breakages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
