use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::coords::azimuth_difference;

/// Look angles of a satellite from an observer at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct TopocentricSample {
    pub timestamp: DateTime<Utc>,
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
}

/// Non-negative angular differences between a sample and a reference
/// direction. Azimuth is the shortest arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularOffset {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

impl AngularOffset {
    pub fn between(
        altitude_deg: f64,
        azimuth_deg: f64,
        reference_altitude_deg: f64,
        reference_azimuth_deg: f64,
    ) -> Self {
        Self {
            altitude_deg: (altitude_deg - reference_altitude_deg).abs(),
            azimuth_deg: azimuth_difference(azimuth_deg, reference_azimuth_deg),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct VisibilityWindow {
    pub timestamp: DateTime<Utc>,
    pub sample: TopocentricSample,
}

/// Emitted by the scanner for every evaluated timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEvent {
    pub index: usize,
    pub sample: TopocentricSample,
    pub offset: Option<AngularOffset>,
    pub in_fov: bool,
}
