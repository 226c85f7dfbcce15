mod error;
mod ground_station;
mod observer;

pub use error::ConfigurationError;
pub use ground_station::GroundStation;
pub use observer::{FieldOfView, Observer, TimeWindow};
