mod geo;
mod page;
mod state;

pub use geo::{GeoBox, Point};
pub use page::Page;
pub use state::Services;
