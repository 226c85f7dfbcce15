use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::coords::CoordinateError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("latitude {0} outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} outside [-180, 180]")]
    Longitude(f64),
    #[error("invalid station coordinates {0:?}, expected \"lat, lon\"")]
    StationCoordinates(String),
    #[error("invalid coordinates: {0}")]
    Coordinates(#[from] CoordinateError),
    #[error("time window not set")]
    MissingTimeWindow,
    #[error("field of view not set")]
    MissingFov,
    #[error("time window start {start} is after end {end}")]
    InvertedWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("time step must be positive, got {0}")]
    NonPositiveStep(Duration),
    #[error("{axis} half-width must be positive, got {value}")]
    NonPositiveHalfWidth { axis: &'static str, value: f64 },
    #[error("pointing altitude {0} outside [-90, 90]")]
    PointingAltitude(f64),
    #[error("unknown pointing mode {0:?}, expected \"absolute\" or \"relative\"")]
    UnknownMode(String),
}
