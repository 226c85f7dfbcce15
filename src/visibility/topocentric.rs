use std::f64::consts::TAU;

use chrono::{DateTime, Utc};
use sgp4::Prediction;

use super::error::VisibilityError;
use super::types::TopocentricSample;
use crate::catalog::Ephemeris;
use crate::coords::EquatorialPosition;
use crate::observer::GroundStation;

/// Greenwich mean sidereal time, radians.
pub fn gmst(timestamp: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()))
}

pub fn local_sidereal_time(station: &GroundStation, timestamp: DateTime<Utc>) -> f64 {
    (gmst(timestamp) + station.lon_rad()).rem_euclid(TAU)
}

/// SGP4 state in the TEME frame (km, km/s).
pub fn propagate(
    ephemeris: &Ephemeris,
    timestamp: DateTime<Utc>,
) -> Result<Prediction, VisibilityError> {
    let failure = |message: String| VisibilityError::Propagation {
        satellite: ephemeris.info.name.clone(),
        timestamp,
        message,
    };

    let minutes = ephemeris
        .elements
        .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
        .map_err(|e| failure(e.to_string()))?;

    let prediction = ephemeris
        .constants
        .propagate(minutes)
        .map_err(|e| failure(e.to_string()))?;

    check_finite(&prediction.position, &prediction.velocity).map_err(failure)?;
    Ok(prediction)
}

fn check_finite(position: &[f64; 3], velocity: &[f64; 3]) -> Result<(), String> {
    if position.iter().chain(velocity).all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(format!(
            "non-finite state (position {:?}, velocity {:?})",
            position, velocity
        ))
    }
}

/// Altitude, azimuth and slant range of the satellite seen from `station`.
pub fn look_angles(
    station: &GroundStation,
    ephemeris: &Ephemeris,
    timestamp: DateTime<Utc>,
) -> Result<TopocentricSample, VisibilityError> {
    let prediction = propagate(ephemeris, timestamp)?;
    Ok(horizontal_from_teme(
        station,
        prediction.position,
        gmst(timestamp),
        timestamp,
    ))
}

fn horizontal_from_teme(
    station: &GroundStation,
    pos_teme: [f64; 3],
    gmst: f64,
    timestamp: DateTime<Utc>,
) -> TopocentricSample {
    let sat_ecef = teme_to_ecef_position(pos_teme, gmst);
    let sta_ecef = station.position_ecef_km();

    let dr = [
        sat_ecef[0] - sta_ecef[0],
        sat_ecef[1] - sta_ecef[1],
        sat_ecef[2] - sta_ecef[2],
    ];
    let range_km = norm(dr);

    let enu = ecef_to_enu(dr, station.lat_rad(), station.lon_rad());
    let azimuth = enu.0.atan2(enu.1).to_degrees().rem_euclid(360.0);
    let altitude = if range_km > 0.0 {
        (enu.2 / range_km).clamp(-1.0, 1.0).asin().to_degrees()
    } else {
        0.0
    };

    TopocentricSample {
        timestamp,
        altitude_deg: altitude,
        azimuth_deg: azimuth,
        range_km,
    }
}

/// Topocentric right ascension and declination of the satellite, referred to
/// the TEME (true equator, mean equinox) frame.
pub fn satellite_equatorial(
    station: &GroundStation,
    ephemeris: &Ephemeris,
    timestamp: DateTime<Utc>,
) -> Result<EquatorialPosition, VisibilityError> {
    let prediction = propagate(ephemeris, timestamp)?;
    let sta_teme = ecef_to_teme_position(station.position_ecef_km(), gmst(timestamp));

    let dr = [
        prediction.position[0] - sta_teme[0],
        prediction.position[1] - sta_teme[1],
        prediction.position[2] - sta_teme[2],
    ];
    let range_km = norm(dr);

    Ok(EquatorialPosition {
        ra_deg: dr[1].atan2(dr[0]).to_degrees().rem_euclid(360.0),
        dec_deg: (dr[2] / range_km).clamp(-1.0, 1.0).asin().to_degrees(),
    })
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

fn ecef_to_teme_position(pos_ecef: [f64; 3], gmst: f64) -> [f64; 3] {
    teme_to_ecef_position(pos_ecef, -gmst)
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

fn norm(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{fixtures, EphemerisProvider};
    use crate::coords::azimuth_difference;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;
    use std::f64::consts::FRAC_PI_2;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 9, 6, 21, 50, 0).unwrap()
    }

    fn adelaide() -> GroundStation {
        GroundStation::new(-34.92123, 138.599503, 59.0).unwrap()
    }

    /// Station on the ground directly below the satellite (geocentric latitude).
    fn sub_satellite_station(ephemeris: &Ephemeris, antipode: bool) -> GroundStation {
        let prediction = propagate(ephemeris, epoch()).unwrap();
        let mut ecef = teme_to_ecef_position(prediction.position, gmst(epoch()));
        if antipode {
            ecef = [-ecef[0], -ecef[1], -ecef[2]];
        }
        let lat = (ecef[2] / norm(ecef)).asin().to_degrees();
        let lon = ecef[1].atan2(ecef[0]).to_degrees();
        GroundStation::new(lat, lon, 0.0).unwrap()
    }

    #[test]
    fn rotations_follow_sidereal_angle() {
        assert_eq!(teme_to_ecef_position([1.0, 2.0, 3.0], 0.0), [1.0, 2.0, 3.0]);
        let rotated = teme_to_ecef_position([1.0, 0.0, 0.0], FRAC_PI_2);
        assert_abs_diff_eq!(rotated[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rotated[1], -1.0, epsilon = 1e-12);

        let back = ecef_to_teme_position(rotated, FRAC_PI_2);
        assert_abs_diff_eq!(back[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(back[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn enu_axes_at_origin() {
        assert_eq!(ecef_to_enu([1.0, 0.0, 0.0], 0.0, 0.0), (0.0, 0.0, 1.0));
        assert_eq!(ecef_to_enu([0.0, 1.0, 0.0], 0.0, 0.0), (1.0, 0.0, 0.0));
        assert_eq!(ecef_to_enu([0.0, 0.0, 1.0], 0.0, 0.0), (0.0, 1.0, 0.0));
    }

    #[test]
    fn non_finite_state_is_rejected() {
        assert!(check_finite(&[1.0, 2.0, 3.0], &[0.1, 0.2, 0.3]).is_ok());
        assert!(check_finite(&[f64::NAN, 2.0, 3.0], &[0.1, 0.2, 0.3]).is_err());
        assert!(check_finite(&[1.0, 2.0, 3.0], &[0.1, f64::INFINITY, 0.3]).is_err());
    }

    #[test]
    fn sample_is_in_range() {
        let iss = fixtures::stations().lookup("ISS (ZARYA)").unwrap();
        let sample = look_angles(&adelaide(), &iss, epoch()).unwrap();
        assert_eq!(sample.timestamp, epoch());
        assert!((-90.0..=90.0).contains(&sample.altitude_deg));
        assert!((0.0..360.0).contains(&sample.azimuth_deg));
        assert!(sample.range_km > 380.0 && sample.range_km < 13_500.0);
    }

    #[test]
    fn satellite_overhead_and_underfoot() {
        let iss = fixtures::stations().lookup("ISS (ZARYA)").unwrap();

        let below = sub_satellite_station(&iss, false);
        let overhead = look_angles(&below, &iss, epoch()).unwrap();
        assert!(overhead.altitude_deg > 80.0, "{:?}", overhead);
        assert!(overhead.range_km > 380.0 && overhead.range_km < 470.0);

        let antipode = sub_satellite_station(&iss, true);
        let underfoot = look_angles(&antipode, &iss, epoch()).unwrap();
        assert!(underfoot.altitude_deg < -80.0, "{:?}", underfoot);
    }

    #[test]
    fn equatorial_and_horizontal_agree() {
        let iss = fixtures::stations().lookup("ISS (ZARYA)").unwrap();
        let station = adelaide();

        let sample = look_angles(&station, &iss, epoch()).unwrap();
        let radec = satellite_equatorial(&station, &iss, epoch()).unwrap();
        let horizontal =
            radec.to_horizontal(station.lat_rad(), local_sidereal_time(&station, epoch()));

        assert_abs_diff_eq!(horizontal.altitude_deg, sample.altitude_deg, epsilon = 1e-6);
        assert!(azimuth_difference(horizontal.azimuth_deg, sample.azimuth_deg) < 1e-6);
    }

    #[test]
    fn propagation_is_deterministic() {
        let iss = fixtures::stations().lookup("ISS (ZARYA)").unwrap();
        let a = look_angles(&adelaide(), &iss, epoch()).unwrap();
        let b = look_angles(&adelaide(), &iss, epoch()).unwrap();
        assert_eq!(a, b);
    }
}
