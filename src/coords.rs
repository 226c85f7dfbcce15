use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("expected right ascension and declination, got {0:?}")]
    Arity(String),
    #[error("invalid coordinate component {0:?}")]
    Component(String),
    #[error("right ascension {0} outside [0, 360)")]
    RightAscension(f64),
    #[error("declination {0} outside [-90, 90]")]
    Declination(f64),
}

/// Local horizon direction, degrees. Azimuth is measured clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalPosition {
    pub azimuth_deg: f64,
    pub altitude_deg: f64,
}

impl HorizontalPosition {
    pub const ZENITH: HorizontalPosition = HorizontalPosition {
        azimuth_deg: 0.0,
        altitude_deg: 90.0,
    };
}

/// Right ascension and declination in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquatorialPosition {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

impl EquatorialPosition {
    pub fn new(ra_deg: f64, dec_deg: f64) -> Result<Self, CoordinateError> {
        if !(0.0..360.0).contains(&ra_deg) {
            return Err(CoordinateError::RightAscension(ra_deg));
        }
        if !(-90.0..=90.0).contains(&dec_deg) {
            return Err(CoordinateError::Declination(dec_deg));
        }
        Ok(Self { ra_deg, dec_deg })
    }

    /// Parse "RA Dec" either as sexagesimal ("12:30:00 -45:00:00", RA in
    /// hours) or as decimal degrees ("187.5 -45" or "187.5, -45").
    pub fn parse(coordinates: &str) -> Result<Self, CoordinateError> {
        let parts: Vec<_> = coordinates
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .collect();
        if parts.len() != 2 {
            return Err(CoordinateError::Arity(coordinates.to_string()));
        }

        if coordinates.contains(':') {
            let ra_hours = parse_sexagesimal(parts[0])?;
            let dec = parse_sexagesimal(parts[1])?;
            Self::new(ra_hours * 15.0, dec)
        } else {
            let ra = parse_number(parts[0])?;
            let dec = parse_number(parts[1])?;
            Self::new(ra, dec)
        }
    }

    /// Convert to the local horizon of an observer, given the local sidereal
    /// time in radians.
    pub fn to_horizontal(&self, latitude_rad: f64, local_sidereal_rad: f64) -> HorizontalPosition {
        let dec = self.dec_deg.to_radians();
        let hour_angle = local_sidereal_rad - self.ra_deg.to_radians();

        let sin_alt =
            latitude_rad.sin() * dec.sin() + latitude_rad.cos() * dec.cos() * hour_angle.cos();
        let altitude = sin_alt.clamp(-1.0, 1.0).asin();
        let azimuth = (-dec.cos() * hour_angle.sin()).atan2(
            dec.sin() * latitude_rad.cos() - dec.cos() * hour_angle.cos() * latitude_rad.sin(),
        );

        HorizontalPosition {
            azimuth_deg: azimuth.to_degrees().rem_euclid(360.0),
            altitude_deg: altitude.to_degrees(),
        }
    }

    /// Great-circle separation in degrees (Vincenty form, stable at all
    /// distances).
    pub fn separation(&self, other: &EquatorialPosition) -> f64 {
        let (ra1, dec1) = (self.ra_deg.to_radians(), self.dec_deg.to_radians());
        let (ra2, dec2) = (other.ra_deg.to_radians(), other.dec_deg.to_radians());
        let d_ra = ra2 - ra1;

        let num1 = dec2.cos() * d_ra.sin();
        let num2 = dec1.cos() * dec2.sin() - dec1.sin() * dec2.cos() * d_ra.cos();
        let den = dec1.sin() * dec2.sin() + dec1.cos() * dec2.cos() * d_ra.cos();

        (num1.hypot(num2)).atan2(den).to_degrees()
    }
}

impl std::fmt::Display for EquatorialPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RA {:.6} deg, Dec {:.6} deg", self.ra_deg, self.dec_deg)
    }
}

/// Shortest arc between two azimuths, in [0, 180].
pub fn azimuth_difference(a_deg: f64, b_deg: f64) -> f64 {
    let d = (a_deg - b_deg).rem_euclid(360.0);
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

fn parse_number(s: &str) -> Result<f64, CoordinateError> {
    s.parse()
        .map_err(|_| CoordinateError::Component(s.to_string()))
}

fn parse_sexagesimal(s: &str) -> Result<f64, CoordinateError> {
    let negative = s.starts_with('-');
    let unsigned = s.trim_start_matches(['-', '+']);

    let fields: Vec<_> = unsigned.split(':').collect();
    if fields.len() > 3 {
        return Err(CoordinateError::Component(s.to_string()));
    }

    let mut value = 0.0;
    let mut scale = 1.0;
    for (i, field) in fields.into_iter().enumerate() {
        let v = parse_number(field)?;
        // Minutes and seconds stay below 60.
        if v < 0.0 || (i > 0 && v >= 60.0) {
            return Err(CoordinateError::Component(s.to_string()));
        }
        value += v / scale;
        scale *= 60.0;
    }

    Ok(if negative { -value } else { value })
}
