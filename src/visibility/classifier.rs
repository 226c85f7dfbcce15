use strum_macros::Display;

use super::types::AngularOffset;
use crate::coords::HorizontalPosition;
use crate::observer::FieldOfView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Policy {
    AbsoluteWindow,
    HalfWidthDifference,
}

/// Closed azimuth interval in [0, 360). `min_deg > max_deg` means the
/// interval crosses north.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AzimuthRange {
    pub min_deg: f64,
    pub max_deg: f64,
}

impl AzimuthRange {
    pub const FULL: AzimuthRange = AzimuthRange {
        min_deg: 0.0,
        max_deg: 360.0,
    };

    pub fn around(center_deg: f64, half_width_deg: f64) -> Self {
        if half_width_deg >= 180.0 {
            return Self::FULL;
        }
        Self {
            min_deg: (center_deg - half_width_deg).rem_euclid(360.0),
            max_deg: (center_deg + half_width_deg).rem_euclid(360.0),
        }
    }

    pub fn contains(&self, azimuth_deg: f64) -> bool {
        let az = azimuth_deg.rem_euclid(360.0);
        if self.min_deg <= self.max_deg {
            self.min_deg <= az && az <= self.max_deg
        } else {
            az >= self.min_deg || az <= self.max_deg
        }
    }
}

/// Absolute alt/az window, inclusive on every bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsoluteWindow {
    pub azimuth: AzimuthRange,
    pub min_elevation_deg: f64,
    pub max_elevation_deg: f64,
}

impl AbsoluteWindow {
    pub fn around(pointing: &HorizontalPosition, fov: &FieldOfView) -> Self {
        Self {
            azimuth: AzimuthRange::around(pointing.azimuth_deg, fov.azimuth_half_width_deg),
            min_elevation_deg: pointing.altitude_deg - fov.elevation_half_width_deg,
            max_elevation_deg: pointing.altitude_deg + fov.elevation_half_width_deg,
        }
    }

    pub fn contains(&self, altitude_deg: f64, azimuth_deg: f64) -> bool {
        self.min_elevation_deg <= altitude_deg
            && altitude_deg <= self.max_elevation_deg
            && self.azimuth.contains(azimuth_deg)
    }
}

/// Each axis is compared against its own half-width, inclusive.
pub fn within_half_widths(offset: &AngularOffset, fov: &FieldOfView) -> bool {
    offset.azimuth_deg <= fov.azimuth_half_width_deg
        && offset.altitude_deg <= fov.elevation_half_width_deg
}
