use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::VisibilityError;
use super::topocentric::satellite_equatorial;
use crate::catalog::Catalog;
use crate::coords::EquatorialPosition;
use crate::observer::{FieldOfView, GroundStation};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Separation {
    pub satellite: String,
    pub norad_id: u32,
    pub position: EquatorialPosition,
    pub separation_deg: f64,
    pub in_fov: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub timestamp: DateTime<Utc>,
    /// Every propagated satellite, nearest first.
    pub separations: Vec<Separation>,
    /// Satellites whose propagation failed at this instant.
    pub failed: Vec<String>,
}

impl SweepReport {
    pub fn in_fov(&self) -> impl Iterator<Item = &Separation> {
        self.separations.iter().filter(|s| s.in_fov)
    }
}

/// Angular distance of every catalog satellite from a pointing centre at one
/// instant. A satellite is in the field of view within half of `fov_width_deg`.
pub fn sweep(
    catalog: &Catalog,
    station: &GroundStation,
    centre: &EquatorialPosition,
    fov_width_deg: f64,
    timestamp: DateTime<Utc>,
) -> Result<SweepReport, VisibilityError> {
    let radius = FieldOfView::from_width(fov_width_deg)?.azimuth_half_width_deg;

    let mut separations = Vec::new();
    let mut failed = Vec::new();
    for ephemeris in catalog.iter() {
        match satellite_equatorial(station, ephemeris, timestamp) {
            Ok(position) => {
                let separation_deg = centre.separation(&position);
                separations.push(Separation {
                    satellite: ephemeris.info.name.clone(),
                    norad_id: ephemeris.info.norad_id,
                    position,
                    separation_deg,
                    in_fov: separation_deg <= radius,
                });
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", ephemeris.info.name, e);
                failed.push(ephemeris.info.name.clone());
            }
        }
    }

    separations.sort_by(|a, b| a.separation_deg.total_cmp(&b.separation_deg));
    failed.sort();

    Ok(SweepReport {
        timestamp,
        separations,
        failed,
    })
}
