use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::Satellite;
use crate::config::{parse_duration, parse_timestamp, WindowOverride};
use crate::visibility::{PointingMode, VisibilityError, VisibilityScanner, VisibilityWindow};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VisibilityQuery {
    pub satellite: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub step: Option<String>,
    pub mode: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VisibilityResponse {
    pub satellite: String,
    pub policy: String,
    pub evaluated_steps: usize,
    pub windows: Vec<VisibilityWindow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SatellitesResponse {
    pub satellites: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/visibility",
    tag = "visibility",
    params(
        ("satellite" = String, Query, description = "Catalog name, e.g. ISS (ZARYA)"),
        ("start" = Option<String>, Query, description = "Window start (RFC3339), defaults to config"),
        ("end" = Option<String>, Query, description = "Window end (RFC3339), defaults to config"),
        ("step" = Option<String>, Query, description = "Step such as 30s or 5m, defaults to config"),
        ("mode" = Option<String>, Query, description = "absolute (default) or relative"),
        ("reference" = Option<String>, Query, description = "Relative reference: pointing, site:<lat>,<lon>[,<alt>] or RA/Dec")
    ),
    responses(
        (status = 200, description = "Timesteps with the satellite in the field of view", body = VisibilityResponse),
        (status = 400, description = "Invalid observer configuration", body = ErrorResponse),
        (status = 404, description = "Satellite not in catalog", body = ErrorResponse),
        (status = 500, description = "Propagation failed", body = ErrorResponse)
    )
)]
pub async fn visibility(
    State(state): State<AppState>,
    Query(query): Query<VisibilityQuery>,
) -> ApiResult<Json<VisibilityResponse>> {
    let overrides = WindowOverride {
        start: query.start.as_deref().map(parse_timestamp).transpose()?,
        end: query.end.as_deref().map(parse_timestamp).transpose()?,
        step: query.step.as_deref().map(parse_duration).transpose()?,
    };
    let observer = state.config.observer(&overrides)?;
    let mode = PointingMode::parse(
        query.mode.as_deref().unwrap_or("absolute"),
        query.reference.as_deref(),
    )?;

    let catalog = state.catalog.clone();
    let response = tokio::task::spawn_blocking(move || {
        let scanner = VisibilityScanner::new(catalog.as_ref(), mode);
        let satellite = Satellite::new(query.satellite);
        let windows = scanner.scan(&observer, &satellite)?;
        Ok::<_, VisibilityError>(VisibilityResponse {
            satellite: satellite.name().to_string(),
            policy: scanner.mode().policy().to_string(),
            evaluated_steps: observer.window().len(),
            windows,
        })
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/satellites",
    tag = "visibility",
    responses(
        (status = 200, description = "Names in the loaded catalog", body = SatellitesResponse)
    )
)]
pub async fn list_satellites(State(state): State<AppState>) -> Json<SatellitesResponse> {
    Json(SatellitesResponse {
        satellites: state
            .catalog
            .names()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use crate::config::Config;
    use std::sync::Arc;

    const YAML: &str = r#"
station:
  coordinates: "-34.92123, 138.599503"
  altitude_m: 59
fov:
  azimuth_half_width_deg: 180
  elevation_half_width_deg: 90
pointing:
  azimuth_deg: 0
  altitude_deg: 0
window:
  start: 2023-09-06T21:50:00Z
  end: 2023-09-06T21:55:00Z
  step: 5m
catalog:
  path: ./data/stations.txt
"#;

    fn state() -> AppState {
        AppState {
            config: Arc::new(Config::from_yaml(YAML).unwrap()),
            catalog: Arc::new(fixtures::stations()),
        }
    }

    fn query(satellite: &str) -> VisibilityQuery {
        VisibilityQuery {
            satellite: satellite.to_string(),
            start: None,
            end: None,
            step: None,
            mode: None,
            reference: None,
        }
    }

    #[tokio::test]
    async fn scans_configured_window() {
        let Json(response) = visibility(State(state()), Query(query("ISS (ZARYA)")))
            .await
            .unwrap();
        assert_eq!(response.satellite, "ISS (ZARYA)");
        assert_eq!(response.policy, "absolute_window");
        assert_eq!(response.evaluated_steps, 1);
        assert_eq!(response.windows.len(), 1);
    }

    #[tokio::test]
    async fn query_overrides_window() {
        let mut q = query("HST");
        q.end = Some("2023-09-06T22:00:00Z".into());
        q.step = Some("1m".into());
        q.mode = Some("relative".into());
        q.reference = Some("site:-34.92123,138.599503,59".into());

        let Json(response) = visibility(State(state()), Query(q)).await.unwrap();
        assert_eq!(response.policy, "half_width_difference");
        assert_eq!(response.evaluated_steps, 10);
        assert_eq!(response.windows.len(), 10);
    }

    #[tokio::test]
    async fn unknown_satellite_is_not_found() {
        let err = visibility(State(state()), Query(query("NONEXISTENT-SAT")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn bad_window_is_validation_error() {
        let mut q = query("ISS (ZARYA)");
        q.start = Some("2023-09-06T23:00:00Z".into());
        let err = visibility(State(state()), Query(q)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let mut q = query("ISS (ZARYA)");
        q.mode = Some("sideways".into());
        let err = visibility(State(state()), Query(q)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn lists_catalog_names() {
        let Json(response) = list_satellites(State(state())).await;
        assert_eq!(response.satellites, vec!["HST", "ISS (ZARYA)"]);
    }
}
