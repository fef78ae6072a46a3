//! sea-orm entities for the fleet store.

pub mod breakages;
pub mod cars;
pub mod cars_positions;
pub mod companies;
pub mod drivers;
pub mod notifications;
pub mod position_data;
pub mod sensor_data;
pub mod wheels;
