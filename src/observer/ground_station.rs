use super::error::ConfigurationError;

// WGS-84
const EQUATORIAL_RADIUS_KM: f64 = 6378.137;
const ECCENTRICITY_SQUARED: f64 = 0.006_694_379_990_14;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundStation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl GroundStation {
    pub fn new(
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_m: f64,
    ) -> Result<Self, ConfigurationError> {
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(ConfigurationError::Latitude(latitude_deg));
        }
        if !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(ConfigurationError::Longitude(longitude_deg));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        })
    }

    /// Parse "lat, lon" in decimal degrees.
    pub fn from_coordinates(
        coordinates: &str,
        altitude_m: Option<f64>,
    ) -> Result<Self, ConfigurationError> {
        let invalid = || ConfigurationError::StationCoordinates(coordinates.to_string());
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return Err(invalid());
        }
        let lat = parts[0].parse().map_err(|_| invalid())?;
        let lon = parts[1].parse().map_err(|_| invalid())?;
        Self::new(lat, lon, altitude_m.unwrap_or(0.0))
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = EQUATORIAL_RADIUS_KM / (1.0 - ECCENTRICITY_SQUARED * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        [
            (n + alt_km) * cos_lat * lon.cos(),
            (n + alt_km) * cos_lat * lon.sin(),
            (n * (1.0 - ECCENTRICITY_SQUARED) + alt_km) * sin_lat,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parses_coordinate_pair() {
        let station = GroundStation::from_coordinates("-34.92123, 138.599503", Some(59.0)).unwrap();
        assert_eq!(station.latitude_deg, -34.92123);
        assert_eq!(station.longitude_deg, 138.599503);
        assert_eq!(station.altitude_m, 59.0);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            GroundStation::new(91.0, 0.0, 0.0),
            Err(ConfigurationError::Latitude(91.0))
        );
        assert_eq!(
            GroundStation::new(0.0, -181.0, 0.0),
            Err(ConfigurationError::Longitude(-181.0))
        );
        assert!(matches!(
            GroundStation::from_coordinates("12.0", None),
            Err(ConfigurationError::StationCoordinates(_))
        ));
        assert!(matches!(
            GroundStation::from_coordinates("north, 12.0", None),
            Err(ConfigurationError::StationCoordinates(_))
        ));
    }

    #[test]
    fn ecef_on_equator_and_pole() {
        let equator = GroundStation::new(0.0, 0.0, 0.0).unwrap().position_ecef_km();
        assert_abs_diff_eq!(equator[0], EQUATORIAL_RADIUS_KM, epsilon = 1e-9);
        assert_abs_diff_eq!(equator[1], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(equator[2], 0.0, epsilon = 1e-9);

        // Polar radius of WGS-84 is ~6356.752 km.
        let pole = GroundStation::new(90.0, 0.0, 1000.0).unwrap().position_ecef_km();
        assert_abs_diff_eq!(pole[2], 6357.752, epsilon = 1e-3);
    }
}
