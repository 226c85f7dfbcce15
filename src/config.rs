use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::CatalogSource;
use crate::coords::HorizontalPosition;
use crate::observer::{ConfigurationError, GroundStation, Observer, TimeWindow};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid duration {0:?}: {1}")]
    Duration(String, String),
    #[error("invalid timestamp {0:?}")]
    Timestamp(String),
    #[error("invalid integration time: {0}")]
    Integration(String),
    #[error(transparent)]
    Invalid(#[from] ConfigurationError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub station: StationConfig,
    pub fov: FovConfig,
    #[serde(default)]
    pub pointing: PointingConfig,
    pub window: Option<WindowConfig>,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FovConfig {
    pub azimuth_half_width_deg: f64,
    pub elevation_half_width_deg: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointingConfig {
    pub azimuth_deg: f64,
    pub altitude_deg: f64,
}

impl Default for PointingConfig {
    fn default() -> Self {
        Self {
            azimuth_deg: HorizontalPosition::ZENITH.azimuth_deg,
            altitude_deg: HorizontalPosition::ZENITH.altitude_deg,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// humantime duration, e.g. "30s" or "5m"
    pub step: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CatalogConfig {
    Url {
        url: String,
        cache_dir: Option<PathBuf>,
        max_age: Option<String>,
    },
    Path {
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

/// Command-line or query-string replacements for the configured window.
#[derive(Debug, Clone, Default)]
pub struct WindowOverride {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub step: Option<Duration>,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn station(&self) -> Result<GroundStation, ConfigError> {
        Ok(GroundStation::from_coordinates(
            &self.station.coordinates,
            Some(self.station.altitude_m),
        )?)
    }

    /// Build the observer, taking each window field from `overrides` first.
    pub fn observer(&self, overrides: &WindowOverride) -> Result<Observer, ConfigError> {
        let mut builder = Observer::builder(self.station()?);
        if let Some(name) = &self.station.name {
            builder.name(name.clone());
        }
        builder.set_fov(
            self.fov.elevation_half_width_deg,
            self.fov.azimuth_half_width_deg,
        )?;
        builder.set_pointing(HorizontalPosition {
            azimuth_deg: self.pointing.azimuth_deg,
            altitude_deg: self.pointing.altitude_deg,
        })?;

        if let Some(window) = self.window(overrides)? {
            builder.set_time_window(window.start(), window.end(), window.step())?;
        }
        Ok(builder.build()?)
    }

    fn window(&self, overrides: &WindowOverride) -> Result<Option<TimeWindow>, ConfigError> {
        let configured = self.window.as_ref();
        let start = overrides.start.or(configured.map(|w| w.start));
        let end = overrides.end.or(configured.map(|w| w.end));
        let step = match overrides.step {
            Some(step) => Some(step),
            None => configured.map(|w| parse_duration(&w.step)).transpose()?,
        };

        match (start, end, step) {
            (Some(start), Some(end), Some(step)) => Ok(Some(TimeWindow::new(start, end, step)?)),
            _ => Ok(None),
        }
    }

    pub fn catalog_source(&self) -> Result<CatalogSource, ConfigError> {
        match &self.catalog {
            CatalogConfig::Path { path } => Ok(CatalogSource::Path(path.clone())),
            CatalogConfig::Url {
                url,
                cache_dir,
                max_age,
            } => {
                let max_age = match max_age {
                    Some(s) => parse_std_duration(s)?,
                    None => crate::catalog::DEFAULT_MAX_AGE,
                };
                Ok(CatalogSource::Url {
                    url: url.clone(),
                    cache_dir: cache_dir.clone(),
                    max_age,
                })
            }
        }
    }
}

pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    parse_std_duration(s).and_then(|d| {
        Duration::from_std(d).map_err(|e| ConfigError::Duration(s.to_string(), e.to_string()))
    })
}

fn parse_std_duration(s: &str) -> Result<std::time::Duration, ConfigError> {
    humantime::parse_duration(s.trim())
        .map_err(|e| ConfigError::Duration(s.to_string(), e.to_string()))
}

/// Accepts RFC 3339, or a naive UTC time such as "2023/09/04 00:55:37.0".
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, ConfigError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    const FORMATS: [&str; 3] = [
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ConfigError::Timestamp(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const YAML: &str = r#"
station:
  name: Adelaide
  coordinates: "-34.92123, 138.599503"
  altitude_m: 59
fov:
  azimuth_half_width_deg: 60
  elevation_half_width_deg: 60
window:
  start: 2023-09-06T21:50:00Z
  end: 2023-09-06T21:55:00Z
  step: 5m
catalog:
  url: https://celestrak.org/NORAD/elements/gp.php?GROUP=stations&FORMAT=tle
  cache_dir: /tmp/sategazer
  max_age: 1h
"#;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 9, 6, 21, minute, 0).unwrap()
    }

    #[test]
    fn builds_observer_from_yaml() {
        let config = Config::from_yaml(YAML).unwrap();
        let observer = config.observer(&WindowOverride::default()).unwrap();

        assert_eq!(observer.name(), Some("Adelaide"));
        assert_eq!(observer.station().altitude_m, 59.0);
        assert_eq!(observer.pointing(), &HorizontalPosition::ZENITH);
        assert_eq!(observer.window().start(), at(50));
        assert_eq!(observer.window().step(), Duration::minutes(5));
        assert_eq!(observer.window().len(), 1);
        assert_eq!(config.web.bind, "0.0.0.0:8080");
    }

    #[test]
    fn overrides_replace_window_fields() {
        let config = Config::from_yaml(YAML).unwrap();
        let overrides = WindowOverride {
            end: Some(at(59)),
            step: Some(Duration::minutes(1)),
            ..Default::default()
        };
        let observer = config.observer(&overrides).unwrap();
        assert_eq!(observer.window().start(), at(50));
        assert_eq!(observer.window().len(), 9);
    }

    #[test]
    fn missing_window_is_configuration_error() {
        let yaml = YAML.replace(
            "window:\n  start: 2023-09-06T21:50:00Z\n  end: 2023-09-06T21:55:00Z\n  step: 5m\n",
            "",
        );
        let config = Config::from_yaml(&yaml).unwrap();
        assert!(config.window.is_none());
        let err = config.observer(&WindowOverride::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(ConfigurationError::MissingTimeWindow)
        ));
    }

    #[test]
    fn invalid_fov_is_rejected() {
        let yaml = YAML.replace("elevation_half_width_deg: 60", "elevation_half_width_deg: 0");
        let err = Config::from_yaml(&yaml)
            .unwrap()
            .observer(&WindowOverride::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(ConfigurationError::NonPositiveHalfWidth {
                axis: "elevation",
                ..
            })
        ));
    }

    #[test]
    fn catalog_sources() {
        let config = Config::from_yaml(YAML).unwrap();
        match config.catalog_source().unwrap() {
            CatalogSource::Url {
                cache_dir, max_age, ..
            } => {
                assert_eq!(cache_dir, Some(PathBuf::from("/tmp/sategazer")));
                assert_eq!(max_age, std::time::Duration::from_secs(3600));
            }
            other => panic!("unexpected source {other:?}"),
        }

        let yaml = YAML.replace(
            "  url: https://celestrak.org/NORAD/elements/gp.php?GROUP=stations&FORMAT=tle\n  cache_dir: /tmp/sategazer\n  max_age: 1h\n",
            "  path: ./data/satellites.txt\n",
        );
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(
            config.catalog_source().unwrap(),
            CatalogSource::Path(PathBuf::from("./data/satellites.txt"))
        );
    }

    #[test]
    fn parses_timestamps() {
        let expected = Utc.with_ymd_and_hms(2023, 9, 4, 0, 55, 37).unwrap();
        assert_eq!(parse_timestamp("2023/09/04 00:55:37.0").unwrap(), expected);
        assert_eq!(parse_timestamp("2023-09-04T00:55:37Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2023-09-04T10:25:37+09:30").unwrap(), expected);
        assert_eq!(parse_timestamp("2023-09-04 00:55:37").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn parses_durations() {
        assert_eq!(parse_duration("5m").unwrap(), Duration::minutes(5));
        assert_eq!(parse_duration(" 90s ").unwrap(), Duration::seconds(90));
        assert!(matches!(parse_duration("soon"), Err(ConfigError::Duration(..))));
    }
}
