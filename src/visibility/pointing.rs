use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::classifier::Policy;
use super::error::VisibilityError;
use super::topocentric::{local_sidereal_time, look_angles};
use crate::catalog::Ephemeris;
use crate::coords::{EquatorialPosition, HorizontalPosition};
use crate::observer::{ConfigurationError, GroundStation, Observer};

/// Direction the satellite is compared against in relative mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    /// The observer's own pointing direction.
    Pointing,
    /// The same satellite seen from another site at the same instant.
    Site(GroundStation),
    /// A sidereally tracked pointing centre.
    Equatorial(EquatorialPosition),
}

impl Reference {
    pub fn direction(
        &self,
        observer: &Observer,
        ephemeris: &Ephemeris,
        timestamp: DateTime<Utc>,
    ) -> Result<HorizontalPosition, VisibilityError> {
        match self {
            Reference::Pointing => Ok(*observer.pointing()),
            Reference::Site(site) => {
                let sample = look_angles(site, ephemeris, timestamp)?;
                Ok(HorizontalPosition {
                    azimuth_deg: sample.azimuth_deg,
                    altitude_deg: sample.altitude_deg,
                })
            }
            Reference::Equatorial(centre) => {
                let station = observer.station();
                Ok(centre.to_horizontal(
                    station.lat_rad(),
                    local_sidereal_time(station, timestamp),
                ))
            }
        }
    }
}

/// `pointing`, `site:<lat>,<lon>[,<alt m>]`, or an RA/Dec pair.
impl FromStr for Reference {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("pointing") {
            return Ok(Reference::Pointing);
        }
        if let Some(site) = s.strip_prefix("site:") {
            let (coordinates, altitude) = match site.rsplitn(3, ',').collect::<Vec<_>>()[..] {
                [alt, lon, lat] => (format!("{},{}", lat, lon), Some(alt)),
                _ => (site.to_string(), None),
            };
            let altitude_m = altitude
                .map(|a| a.trim().parse::<f64>())
                .transpose()
                .map_err(|_| ConfigurationError::StationCoordinates(site.to_string()))?;
            return Ok(Reference::Site(GroundStation::from_coordinates(
                &coordinates,
                altitude_m,
            )?));
        }
        Ok(Reference::Equatorial(EquatorialPosition::parse(s)?))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PointingMode {
    /// Raw look angles against the observer's absolute window.
    #[default]
    Absolute,
    /// Angular differences from a reference direction against the half-widths.
    Relative(Reference),
}

impl PointingMode {
    /// `absolute`, or `relative` against `reference` (the observer's own
    /// pointing when omitted).
    pub fn parse(mode: &str, reference: Option<&str>) -> Result<Self, ConfigurationError> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "absolute" => Ok(PointingMode::Absolute),
            "relative" => Ok(PointingMode::Relative(
                reference
                    .map(Reference::from_str)
                    .transpose()?
                    .unwrap_or(Reference::Pointing),
            )),
            _ => Err(ConfigurationError::UnknownMode(mode.to_string())),
        }
    }

    pub fn policy(&self) -> Policy {
        match self {
            PointingMode::Absolute => Policy::AbsoluteWindow,
            PointingMode::Relative(_) => Policy::HalfWidthDifference,
        }
    }
}
