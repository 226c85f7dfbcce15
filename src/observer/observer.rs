use chrono::{DateTime, Duration, Utc};

use super::error::ConfigurationError;
use super::ground_station::GroundStation;
use crate::coords::HorizontalPosition;

/// Observation window, closed at `start` and open at `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
}

impl TimeWindow {
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: Duration,
    ) -> Result<Self, ConfigurationError> {
        if step <= Duration::zero() {
            return Err(ConfigurationError::NonPositiveStep(step));
        }
        if start > end {
            return Err(ConfigurationError::InvertedWindow { start, end });
        }
        Ok(Self { start, end, step })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// `start, start + step, ...` strictly below `end`.
    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> {
        let (step, end) = (self.step, self.end);
        std::iter::successors(Some(self.start), move |t| t.checked_add_signed(step))
            .take_while(move |t| *t < end)
    }

    pub fn len(&self) -> usize {
        self.timestamps().count()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Angular half-widths of the instrument window, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOfView {
    pub azimuth_half_width_deg: f64,
    pub elevation_half_width_deg: f64,
}

impl FieldOfView {
    /// Elevation first, the same order as [`ObserverBuilder::set_fov`].
    pub fn new(
        elevation_half_width_deg: f64,
        azimuth_half_width_deg: f64,
    ) -> Result<Self, ConfigurationError> {
        check_half_width("elevation", elevation_half_width_deg)?;
        check_half_width("azimuth", azimuth_half_width_deg)?;
        Ok(Self {
            azimuth_half_width_deg,
            elevation_half_width_deg,
        })
    }

    /// Square window of the given full width.
    pub fn from_width(width_deg: f64) -> Result<Self, ConfigurationError> {
        Self::new(0.5 * width_deg, 0.5 * width_deg)
    }
}

fn check_half_width(axis: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::NonPositiveHalfWidth { axis, value })
    }
}

/// A fully configured observer. Built once, then only read.
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    name: Option<String>,
    station: GroundStation,
    fov: FieldOfView,
    pointing: HorizontalPosition,
    window: TimeWindow,
}

impl Observer {
    pub fn new(
        name: Option<String>,
        station: GroundStation,
        fov: FieldOfView,
        pointing: HorizontalPosition,
        window: TimeWindow,
    ) -> Result<Self, ConfigurationError> {
        check_pointing(&pointing)?;
        Ok(Self {
            name,
            station,
            fov,
            pointing,
            window,
        })
    }

    pub fn builder(station: GroundStation) -> ObserverBuilder {
        ObserverBuilder::new(station)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn station(&self) -> &GroundStation {
        &self.station
    }

    pub fn fov(&self) -> &FieldOfView {
        &self.fov
    }

    pub fn pointing(&self) -> &HorizontalPosition {
        &self.pointing
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }
}

fn check_pointing(pointing: &HorizontalPosition) -> Result<(), ConfigurationError> {
    if (-90.0..=90.0).contains(&pointing.altitude_deg) {
        Ok(())
    } else {
        Err(ConfigurationError::PointingAltitude(pointing.altitude_deg))
    }
}

/// Incremental configuration of an [`Observer`]. Every setter validates its
/// own arguments; `build` fails if the time window or field of view were
/// never set.
#[derive(Debug, Clone)]
pub struct ObserverBuilder {
    name: Option<String>,
    station: GroundStation,
    fov: Option<FieldOfView>,
    pointing: HorizontalPosition,
    window: Option<TimeWindow>,
}

impl ObserverBuilder {
    pub fn new(station: GroundStation) -> Self {
        Self {
            name: None,
            station,
            fov: None,
            pointing: HorizontalPosition::ZENITH,
            window: None,
        }
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_time_window(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: Duration,
    ) -> Result<&mut Self, ConfigurationError> {
        self.window = Some(TimeWindow::new(start, end, step)?);
        Ok(self)
    }

    pub fn set_fov(
        &mut self,
        elevation_half_width_deg: f64,
        azimuth_half_width_deg: f64,
    ) -> Result<&mut Self, ConfigurationError> {
        self.fov = Some(FieldOfView::new(
            elevation_half_width_deg,
            azimuth_half_width_deg,
        )?);
        Ok(self)
    }

    pub fn set_pointing(
        &mut self,
        pointing: HorizontalPosition,
    ) -> Result<&mut Self, ConfigurationError> {
        check_pointing(&pointing)?;
        self.pointing = pointing;
        Ok(self)
    }

    pub fn build(&self) -> Result<Observer, ConfigurationError> {
        let window = self.window.ok_or(ConfigurationError::MissingTimeWindow)?;
        let fov = self.fov.ok_or(ConfigurationError::MissingFov)?;
        Observer::new(self.name.clone(), self.station, fov, self.pointing, window)
    }
}
