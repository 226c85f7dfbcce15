use super::classifier::{within_half_widths, AbsoluteWindow};
use super::error::VisibilityError;
use super::pointing::PointingMode;
use super::topocentric::look_angles;
use super::types::{AngularOffset, StepEvent, VisibilityWindow};
use crate::catalog::{EphemerisProvider, Satellite};
use crate::observer::Observer;

/// Walks an observer's time window and collects the timesteps at which a
/// satellite is inside the field of view.
pub struct VisibilityScanner<'a, P: EphemerisProvider + ?Sized> {
    provider: &'a P,
    mode: PointingMode,
}

impl<'a, P: EphemerisProvider + ?Sized> VisibilityScanner<'a, P> {
    pub fn new(provider: &'a P, mode: PointingMode) -> Self {
        Self { provider, mode }
    }

    pub fn mode(&self) -> &PointingMode {
        &self.mode
    }

    pub fn scan(
        &self,
        observer: &Observer,
        satellite: &Satellite,
    ) -> Result<Vec<VisibilityWindow>, VisibilityError> {
        self.scan_with(observer, satellite, |_| {})
    }

    /// Like [`scan`](Self::scan), calling `on_step` for every evaluated
    /// timestep whether or not it is in the field of view.
    ///
    /// Any failure aborts the scan; no partial result is returned.
    pub fn scan_with<F>(
        &self,
        observer: &Observer,
        satellite: &Satellite,
        mut on_step: F,
    ) -> Result<Vec<VisibilityWindow>, VisibilityError>
    where
        F: FnMut(&StepEvent),
    {
        if !satellite.is_resolved() {
            log::debug!("Looking up {} in catalog", satellite.name());
        }
        let ephemeris = satellite.resolve(self.provider)?;
        let window = observer.window();
        let absolute = AbsoluteWindow::around(observer.pointing(), observer.fov());

        if window.is_empty() {
            log::debug!("Empty time window for {}, nothing to scan", satellite.name());
            return Ok(Vec::new());
        }
        log::info!(
            "Scanning {} from {} to {} every {}s ({} policy)",
            satellite.name(),
            window.start(),
            window.end(),
            window.step().num_seconds(),
            self.mode.policy()
        );

        let mut matches = Vec::new();
        for (index, timestamp) in window.timestamps().enumerate() {
            let sample = look_angles(observer.station(), ephemeris, timestamp)?;

            let (offset, in_fov) = match &self.mode {
                PointingMode::Absolute => (
                    None,
                    absolute.contains(sample.altitude_deg, sample.azimuth_deg),
                ),
                PointingMode::Relative(reference) => {
                    let direction = reference.direction(observer, ephemeris, timestamp)?;
                    let offset = AngularOffset::between(
                        sample.altitude_deg,
                        sample.azimuth_deg,
                        direction.altitude_deg,
                        direction.azimuth_deg,
                    );
                    (Some(offset), within_half_widths(&offset, observer.fov()))
                }
            };

            log::debug!(
                "{} {}: alt {:.2} az {:.2} range {:.1} km{}",
                timestamp,
                satellite.name(),
                sample.altitude_deg,
                sample.azimuth_deg,
                sample.range_km,
                if in_fov { " [in fov]" } else { "" }
            );
            on_step(&StepEvent {
                index,
                sample,
                offset,
                in_fov,
            });

            if in_fov {
                matches.push(VisibilityWindow { timestamp, sample });
            }
        }

        log::info!(
            "{}: {} of {} timesteps in field of view",
            satellite.name(),
            matches.len(),
            window.len()
        );
        Ok(matches)
    }
}
